//! Everything the bridge crates need from `robstop_common` in one import.
//!
//! # Usage
//!
//! ```rust
//! use robstop_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, ConfigStore, Configuration, RobotEndpoint};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{ESTOP_PIN, ESTOP_PIN_MODE, ESTOP_PRESSED_LEVEL, POLL_INTERVAL_MS};

// ─── I/O ────────────────────────────────────────────────────────────
pub use crate::input::{DigitalInput, InputError};
pub use crate::robot::{ClientError, RobotControlClient};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{ButtonState, DesiredState, DispatchOutcome, Level, PinMode};

/// E-stop sampling period as Duration.
pub const POLL_INTERVAL: Duration = Duration::from_millis(POLL_INTERVAL_MS);
