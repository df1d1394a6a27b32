//! Digital input trait and error types.
//!
//! This module defines:
//! - `DigitalInput` trait - Interface for pluggable input-line drivers
//! - `InputError` enum - Error types for input operations
//! - `InputDriverFactory` type alias - Factory function type

use crate::state::{Level, PinMode};
use thiserror::Error;

/// Error types for digital input operations.
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// The line could not be configured.
    #[error("Failed to configure pin {pin}: {reason}")]
    Configure { pin: u32, reason: String },

    /// Sampling the line failed.
    #[error("Failed to read pin {pin}: {reason}")]
    Read { pin: u32, reason: String },

    /// The line was read before being configured.
    #[error("Pin {0} is not configured")]
    NotConfigured(u32),

    /// Driver not found in the registry.
    #[error("Input driver not found: {0}")]
    DriverNotFound(String),
}

/// Factory function type for creating driver instances.
pub type InputDriverFactory = fn() -> Box<dyn DigitalInput>;

/// Trait defining the interface for digital input drivers.
///
/// The sampling loop owns exactly one driver and talks to it through this
/// trait, so the E-stop logic runs unchanged against real GPIO or the
/// simulation backend.
///
/// # Lifecycle
///
/// 1. `configure()` - Called once per line before sampling starts
/// 2. `read()` - Called every poll interval
/// 3. `release()` - Called when the bridge shuts down
pub trait DigitalInput: Send {
    /// Returns the driver's unique identifier (e.g., "sysfs", "simulation").
    fn name(&self) -> &'static str;

    /// Prepare `pin` as an input with the requested bias.
    ///
    /// # Errors
    /// Return `InputError::Configure` if the line cannot be claimed.
    fn configure(&mut self, pin: u32, mode: PinMode) -> Result<(), InputError>;

    /// Sample the current electrical level of `pin`.
    fn read(&mut self, pin: u32) -> Result<Level, InputError>;

    /// Give configured lines back to the system.
    /// Default: no-op
    fn release(&mut self) -> Result<(), InputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantInput {
        level: Level,
        configured: Option<u32>,
    }

    impl DigitalInput for ConstantInput {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn configure(&mut self, pin: u32, _mode: PinMode) -> Result<(), InputError> {
            self.configured = Some(pin);
            Ok(())
        }

        fn read(&mut self, pin: u32) -> Result<Level, InputError> {
            match self.configured {
                Some(p) if p == pin => Ok(self.level),
                _ => Err(InputError::NotConfigured(pin)),
            }
        }
    }

    #[test]
    fn test_input_error_display() {
        let err = InputError::Read {
            pin: 2,
            reason: "device busy".to_string(),
        };
        assert!(err.to_string().contains("pin 2"));
        assert!(err.to_string().contains("device busy"));

        let err = InputError::DriverNotFound("gpiod".to_string());
        assert!(err.to_string().contains("gpiod"));
    }

    #[test]
    fn test_default_release_is_noop() {
        let mut input = ConstantInput {
            level: Level::High,
            configured: None,
        };
        assert!(matches!(input.read(2), Err(InputError::NotConfigured(2))));
        input.configure(2, PinMode::InputPullUp).unwrap();
        assert_eq!(input.read(2).unwrap(), Level::High);
        assert!(input.release().is_ok());
    }
}
