//! # Robstop HAL Library
//!
//! I/O leaves of the E-stop bridge: digital input drivers for the E-stop
//! line and the REST client that commands robot controllers.
//!
//! Drivers implement the `DigitalInput` trait defined in
//! `robstop_common::input`; robot clients implement `RobotControlClient`
//! from `robstop_common::robot`.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Input driver factory registration
//! - [`drivers`] - Input driver implementations (sysfs, simulation)
//! - [`mir`] - MiR-style REST robot client
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    robstop_hal (single crate)                 │
//! │  ┌─────────────────┐   ┌───────────────┐   ┌───────────────┐  │
//! │  │ Driver Registry │──►│ DigitalInput  │   │ MirRestClient │  │
//! │  │                 │   │ (trait obj)   │   │ (HTTP PUT)    │  │
//! │  └─────────────────┘   └───────┬───────┘   └───────┬───────┘  │
//! │                                │                   │          │
//! │                    sysfs GPIO / simulation     robot fleet    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;
pub mod mir;

// Re-export key types for convenience
pub use crate::driver_registry::InputDriverRegistry;
pub use crate::drivers::simulation::{SimulatedLines, SimulationInput};
pub use crate::drivers::sysfs::SysfsInput;
pub use crate::mir::MirRestClient;
