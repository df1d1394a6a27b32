//! Linux sysfs GPIO input driver.
//!
//! Uses the legacy `/sys/class/gpio` file interface:
//! - `export` / `unexport` claim and release a line
//! - `gpioN/direction` is set to `in`
//! - `gpioN/value` reads `0` or `1`
//!
//! sysfs has no bias control. Pull-up / pull-down has to be set by the board
//! configuration (device tree overlay, `raspi-gpio`, ...); the driver only
//! warns about it.

use robstop_common::input::{DigitalInput, InputError};
use robstop_common::state::{Level, PinMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default sysfs GPIO root.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// How many times to look for `gpioN/` after writing `export`.
const EXPORT_POLL_ATTEMPTS: u32 = 20;

/// Delay between two looks for `gpioN/`.
const EXPORT_POLL_DELAY: Duration = Duration::from_millis(10);

/// sysfs GPIO [`DigitalInput`] driver.
#[derive(Debug)]
pub struct SysfsInput {
    root: PathBuf,
    /// Pins this driver exported (and must unexport on release).
    exported: Vec<u32>,
    /// Pins ready for sampling.
    configured: Vec<u32>,
    bias_warned: bool,
}

impl SysfsInput {
    /// Create a driver on the default sysfs root.
    pub fn new() -> Self {
        Self::with_root(DEFAULT_SYSFS_ROOT)
    }

    /// Create a driver on a custom root (useful for tests and chroots).
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exported: Vec::new(),
            configured: Vec::new(),
            bias_warned: false,
        }
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn export(&mut self, pin: u32) -> Result<(), InputError> {
        let export = self.root.join("export");
        fs::write(&export, pin.to_string()).map_err(|e| InputError::Configure {
            pin,
            reason: format!("export via {:?} failed: {}", export, e),
        })?;
        self.exported.push(pin);

        // udev may need a moment to create the line directory.
        let dir = self.pin_dir(pin);
        for _ in 0..EXPORT_POLL_ATTEMPTS {
            if dir.is_dir() {
                debug!("Exported GPIO {} at {:?}", pin, dir);
                return Ok(());
            }
            thread::sleep(EXPORT_POLL_DELAY);
        }
        Err(InputError::Configure {
            pin,
            reason: format!("{:?} did not appear after export", dir),
        })
    }
}

impl Default for SysfsInput {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInput for SysfsInput {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn configure(&mut self, pin: u32, mode: PinMode) -> Result<(), InputError> {
        if !self.pin_dir(pin).is_dir() {
            self.export(pin)?;
        }

        let direction = self.pin_dir(pin).join("direction");
        fs::write(&direction, "in").map_err(|e| InputError::Configure {
            pin,
            reason: format!("setting {:?} failed: {}", direction, e),
        })?;

        if mode != PinMode::Input && !self.bias_warned {
            warn!(
                "sysfs GPIO cannot set {:?} on pin {}; bias must come from the board configuration",
                mode, pin
            );
            self.bias_warned = true;
        }

        if !self.configured.contains(&pin) {
            self.configured.push(pin);
        }
        info!("sysfs driver: GPIO {} configured as input", pin);
        Ok(())
    }

    fn read(&mut self, pin: u32) -> Result<Level, InputError> {
        if !self.configured.contains(&pin) {
            return Err(InputError::NotConfigured(pin));
        }

        let value = self.pin_dir(pin).join("value");
        let raw = fs::read_to_string(&value).map_err(|e| InputError::Read {
            pin,
            reason: e.to_string(),
        })?;

        match raw.trim() {
            "0" => Ok(Level::Low),
            "1" => Ok(Level::High),
            other => Err(InputError::Read {
                pin,
                reason: format!("unexpected value {other:?}"),
            }),
        }
    }

    fn release(&mut self) -> Result<(), InputError> {
        self.configured.clear();

        let unexport = self.root.join("unexport");
        let mut first_error = None;
        for pin in self.exported.drain(..) {
            if let Err(e) = fs::write(&unexport, pin.to_string()) {
                warn!("Failed to unexport GPIO {}: {}", pin, e);
                first_error.get_or_insert(InputError::Configure {
                    pin,
                    reason: format!("unexport failed: {e}"),
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Factory function to create a sysfs driver on the default root.
pub fn create_driver() -> Box<dyn DigitalInput> {
    Box::new(SysfsInput::new())
}
