//! Startup error taxonomy.
//!
//! Every variant is fatal: the binary logs it at FATAL and exits with a
//! non-zero status. Steady-state failures never reach this type; they are
//! logged where they happen and the loops carry on.

use robstop_common::config::ConfigError;
use robstop_common::input::InputError;
use thiserror::Error;

/// Conditions that prevent the bridge from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Neither a stored nor a freshly persisted default configuration is available.
    #[error("Unable to obtain a usable configuration: {0}")]
    Config(#[from] ConfigError),

    /// The background reload thread could not be spawned.
    #[error("Config reloader has failed to start: {0}")]
    Reloader(#[source] std::io::Error),

    /// The E-stop line could not be claimed.
    #[error("E-stop input unavailable: {0}")]
    Input(#[from] InputError),

    /// SIGINT/SIGTERM handler installation failed.
    #[error("Failed to install shutdown handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
