//! Configuration record, loading and persistence.
//!
//! This module provides the bridge configuration (`Configuration`), a
//! generic TOML loader (`ConfigLoader`) and the `ConfigStore` contract used
//! by the config manager to read and persist the record.
//!
//! # TOML Example
//!
//! ```toml
//! requestTimeoutMs = 3000
//! reloadIntervalSec = 300
//! verboseMode = false
//!
//! [[robots]]
//! address = "192.168.12.20"
//! credential = "Basic ZGlzdHJpYnV0b3I6NjJmMmYw"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use robstop_common::config::{ConfigError, ConfigStore, TomlFileStore};
//!
//! fn main() -> Result<(), ConfigError> {
//!     let store = TomlFileStore::new("Config.toml");
//!     let config = store.load()?;
//!     println!("{} robots", config.robots.len());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_RELOAD_INTERVAL_SEC, DEFAULT_REQUEST_TIMEOUT_MS};

/// Error type for configuration loading and persistence.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// The file exists but could not be read.
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Writing the record back to storage failed.
    #[error("Failed to persist configuration: {0}")]
    PersistError(String),
}

/// Network location and authorization of one robot.
///
/// Identity is positional within [`Configuration::robots`]; two entries may
/// share an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotEndpoint {
    /// Host or URL of the robot controller.
    pub address: String,
    /// Value sent as the `Authorization` header.
    pub credential: String,
}

impl RobotEndpoint {
    pub fn new(address: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            credential: credential.into(),
        }
    }
}

/// Live bridge configuration.
///
/// Replaced wholesale on every successful reload, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Per-robot request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Delay between two reload attempts in seconds.
    pub reload_interval_sec: u64,

    /// Log transitions at debug level and skip the real fan-out.
    pub verbose_mode: bool,

    /// Fleet, in dispatch order.
    pub robots: Vec<RobotEndpoint>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            reload_interval_sec: DEFAULT_RELOAD_INTERVAL_SEC,
            verbose_mode: false,
            robots: Vec::new(),
        }
    }
}

impl Configuration {
    /// Per-robot request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay between two reload attempts.
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_sec)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `requestTimeoutMs` is zero
    /// - `reloadIntervalSec` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "requestTimeoutMs must be greater than 0".to_string(),
            ));
        }
        if self.reload_interval_sec == 0 {
            return Err(ConfigError::ValidationError(
                "reloadIntervalSec must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Addresses that appear more than once in the fleet, in first-seen order.
    pub fn duplicate_addresses(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for robot in &self.robots {
            let address = robot.address.as_str();
            if !seen.insert(address) && !duplicates.contains(&address) {
                duplicates.push(address);
            }
        }
        duplicates
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ReadError` if the file cannot be read
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ReadError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Persistent storage for the configuration record.
///
/// Shared between the startup path and the background reload task.
pub trait ConfigStore: Send + Sync {
    /// Read and validate the persisted record.
    fn load(&self) -> Result<Configuration, ConfigError>;

    /// Persist the record, replacing whatever is stored.
    fn save(&self, config: &Configuration) -> Result<(), ConfigError>;

    /// Human-readable location, used in log lines.
    fn location(&self) -> String;

    /// Move an unusable record out of the way before defaults replace it.
    ///
    /// Returns where the record was kept, or `None` if nothing was kept.
    fn set_aside(&self) -> Result<Option<String>, ConfigError> {
        Ok(None)
    }
}

/// TOML file backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the record is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    /// Sibling file a rejected record is kept in.
    pub fn set_aside_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!("{name}.invalid"))
    }
}

impl ConfigStore for TomlFileStore {
    fn load(&self) -> Result<Configuration, ConfigError> {
        debug!("Loading configuration from {:?}", self.path);
        let config = Configuration::load(&self.path)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::PersistError(e.to_string()))?;

        // Stage then rename so a concurrent reader never sees a torn file.
        let staging = self.staging_path();
        fs::write(&staging, content).map_err(|e| {
            ConfigError::PersistError(format!("Failed to write {:?}: {}", staging, e))
        })?;
        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            ConfigError::PersistError(format!("Failed to replace {:?}: {}", self.path, e))
        })?;

        debug!("Saved configuration to {:?}", self.path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn set_aside(&self) -> Result<Option<String>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let kept = self.set_aside_path();
        fs::rename(&self.path, &kept).map_err(|e| {
            ConfigError::PersistError(format!("Failed to move {:?} to {:?}: {}", self.path, kept, e))
        })?;
        Ok(Some(kept.display().to_string()))
    }
}
