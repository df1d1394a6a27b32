//! System-wide constants for the robstop workspace.
//!
//! Pin assignment, cadences, default values and robot state identifiers.

use crate::state::{Level, PinMode};

/// Digital input line wired to the emergency-stop button.
pub const ESTOP_PIN: u32 = 2;

/// Electrical configuration of the E-stop line.
pub const ESTOP_PIN_MODE: PinMode = PinMode::InputPullUp;

/// Electrical level that counts as "pressed" on the E-stop line.
///
/// The installed wiring drives the line high while the button is pressed,
/// even though the line is configured with a pull-up. Conventional pull-up
/// wiring would read low on press; do not flip this without checking the
/// cabinet wiring.
pub const ESTOP_PRESSED_LEVEL: Level = Level::High;

/// Sampling period of the E-stop line in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Default per-robot request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3000;

/// Default configuration reload interval in seconds.
pub const DEFAULT_RELOAD_INTERVAL_SEC: u64 = 300;

/// Default configuration file name (working directory).
pub const DEFAULT_CONFIG_FILE: &str = "Config.toml";

/// Default log file name (working directory).
pub const DEFAULT_LOG_FILE: &str = "robstop.log";

/// Robot state identifier for "ready".
pub const STATE_ID_READY: u8 = 3;

/// Robot state identifier for "pause".
pub const STATE_ID_PAUSE: u8 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(POLL_INTERVAL_MS > 0);
        assert!(DEFAULT_REQUEST_TIMEOUT_MS > 0);
        assert!(DEFAULT_RELOAD_INTERVAL_SEC > 0);
        assert_ne!(STATE_ID_READY, STATE_ID_PAUSE);
    }

    #[test]
    fn estop_polarity_is_active_high_with_pull_up() {
        // Wiring-specific: pressed reads high although the line is pulled up.
        assert_eq!(ESTOP_PIN_MODE, PinMode::InputPullUp);
        assert_eq!(ESTOP_PRESSED_LEVEL, Level::High);
    }
}
