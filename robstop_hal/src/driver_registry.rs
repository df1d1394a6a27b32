//! Name-based lookup of E-stop input drivers.
//!
//! The binary builds one registry at startup and resolves the `--driver`
//! (or `--simulate`) choice through it. Nothing is global: tests build
//! their own registry with whatever drivers they need.

use robstop_common::input::{DigitalInput, InputDriverFactory, InputError};
use std::collections::BTreeMap;
use tracing::debug;

use crate::drivers::register_all_drivers;

struct Entry {
    summary: &'static str,
    factory: InputDriverFactory,
}

/// Input drivers known to this build, by name.
#[derive(Default)]
pub struct InputDriverRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl InputDriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in driver.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        register_all_drivers(&mut registry);
        registry
    }

    /// Add a driver under `name`.
    ///
    /// # Panics
    /// Panics if `name` is already taken; driver names are fixed at build time.
    pub fn register(&mut self, name: &'static str, summary: &'static str, factory: InputDriverFactory) {
        let previous = self.entries.insert(name, Entry { summary, factory });
        assert!(previous.is_none(), "input driver '{name}' registered twice");
    }

    /// Instantiate the driver registered as `name`.
    ///
    /// # Errors
    /// Returns `InputError::DriverNotFound`, listing the known names, if
    /// `name` is not registered.
    pub fn create_driver(&self, name: &str) -> Result<Box<dyn DigitalInput>, InputError> {
        let entry = self.entries.get(name).ok_or_else(|| {
            InputError::DriverNotFound(format!(
                "{name} (available: {})",
                self.names().join(", ")
            ))
        })?;
        debug!("Creating input driver '{}': {}", name, entry.summary);
        Ok((entry.factory)())
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// One-line description of a registered driver.
    pub fn summary(&self, name: &str) -> Option<&'static str> {
        self.entries.get(name).map(|entry| entry.summary)
    }
}
