//! Simulation input driver.
//!
//! Lines live in memory. A cloneable [`SimulatedLines`] handle lets a test
//! drive the levels the driver samples. Lines that were never set read
//! [`Level::Low`], whatever bias they were configured with.
//!
//! A driver built with [`SimulationInput::with_level_file`] samples a text
//! file instead, so an operator can press the button of a running process:
//!
//! ```bash
//! echo 1 > estop.level   # pressed
//! echo 0 > estop.level   # released
//! ```

use parking_lot::Mutex;
use robstop_common::input::{DigitalInput, InputError};
use robstop_common::state::{Level, PinMode};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to the simulated line levels.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLines {
    levels: Arc<Mutex<HashMap<u32, Level>>>,
}

impl SimulatedLines {
    /// Create an empty line bank; every line reads low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `pin` to `level`.
    pub fn set(&self, pin: u32, level: Level) {
        debug!("Simulated pin {} -> {}", pin, level);
        self.levels.lock().insert(pin, level);
    }

    /// Current level of `pin`.
    pub fn get(&self, pin: u32) -> Level {
        self.levels.lock().get(&pin).copied().unwrap_or(Level::Low)
    }
}

/// In-memory [`DigitalInput`] driver.
#[derive(Debug, Default)]
pub struct SimulationInput {
    lines: SimulatedLines,
    level_file: Option<PathBuf>,
    configured: HashMap<u32, PinMode>,
}

impl SimulationInput {
    /// Create a driver with its own, unshared line bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver sampling the given line bank.
    pub fn with_lines(lines: SimulatedLines) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Create a driver whose lines all follow the level written in `path`.
    ///
    /// The file holds `0` or `1`; a missing file reads low.
    pub fn with_level_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            level_file: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Handle to the line bank this driver samples.
    pub fn lines(&self) -> SimulatedLines {
        self.lines.clone()
    }

    /// Mode `pin` was configured with, if any.
    pub fn mode(&self, pin: u32) -> Option<PinMode> {
        self.configured.get(&pin).copied()
    }
}

impl DigitalInput for SimulationInput {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn configure(&mut self, pin: u32, mode: PinMode) -> Result<(), InputError> {
        info!("Simulation driver: pin {} configured as {:?}", pin, mode);
        self.configured.insert(pin, mode);
        Ok(())
    }

    fn read(&mut self, pin: u32) -> Result<Level, InputError> {
        if !self.configured.contains_key(&pin) {
            return Err(InputError::NotConfigured(pin));
        }
        match &self.level_file {
            Some(path) => read_level_file(path, pin),
            None => Ok(self.lines.get(pin)),
        }
    }

    fn release(&mut self) -> Result<(), InputError> {
        self.configured.clear();
        Ok(())
    }
}

fn read_level_file(path: &Path, pin: u32) -> Result<Level, InputError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Level::Low),
        Err(e) => {
            return Err(InputError::Read {
                pin,
                reason: format!("{}: {}", path.display(), e),
            });
        }
    };

    match raw.trim() {
        "0" => Ok(Level::Low),
        "1" => Ok(Level::High),
        other => Err(InputError::Read {
            pin,
            reason: format!("unexpected value {other:?} in {}", path.display()),
        }),
    }
}

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn DigitalInput> {
    Box::new(SimulationInput::new())
}
