//! Digital input driver implementations.
//!
//! This module contains all input driver implementations:
//!
//! - [`sysfs`] - Linux sysfs GPIO driver (`/sys/class/gpio`)
//! - [`simulation`] - In-memory driver for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `DigitalInput` trait from `robstop_common::input`
//! 3. Register the driver in [`register_all_drivers`]

pub mod simulation;
pub mod sysfs;

use crate::driver_registry::InputDriverRegistry;

/// Register all built-in drivers.
pub fn register_all_drivers(registry: &mut InputDriverRegistry) {
    registry.register(
        "sysfs",
        "Linux sysfs GPIO (/sys/class/gpio)",
        sysfs::create_driver,
    );
    registry.register(
        "simulation",
        "in-memory lines driven through SimulatedLines",
        simulation::create_driver,
    );
}
