//! Live configuration owner and background reloader.
//!
//! [`ConfigManager`] holds the live [`Configuration`] as an `Arc` behind one
//! mutex. Readers take a [`snapshot`](ConfigManager::snapshot): the lock is
//! held only long enough to clone the `Arc`, and the caller then works on an
//! immutable record. A reload swaps the `Arc` wholesale, so a holder sees
//! either the old record or the new one, never a mix.

use parking_lot::Mutex;
use robstop_common::config::{ConfigError, ConfigStore, Configuration};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::shutdown::{Pacer, ShutdownSignal};

/// Name of the background reload thread.
pub const RELOADER_THREAD_NAME: &str = "config-reloader";

/// Sole owner of the live configuration.
pub struct ConfigManager {
    store: Box<dyn ConfigStore>,
    live: Mutex<Arc<Configuration>>,
}

impl ConfigManager {
    /// Load the startup configuration from `store`.
    ///
    /// A missing or unusable record is replaced by the defaults, which are
    /// written back to the store. An unusable record is first set aside so
    /// its robot list can be recovered by hand.
    ///
    /// # Errors
    ///
    /// Returns the persistence error when the defaults cannot be written.
    /// The process has no safe configuration to run with in that case.
    pub fn load_initial(store: Box<dyn ConfigStore>) -> Result<Self, ConfigError> {
        let config = match store.load() {
            Ok(config) => {
                info!(
                    "Loaded configuration from {} ({} robots)",
                    store.location(),
                    config.robots.len()
                );
                config
            }
            Err(e) => {
                match e {
                    ConfigError::FileNotFound => {
                        warn!("No configuration found at {}", store.location())
                    }
                    _ => {
                        error!("Unable to use configuration at {}: {}", store.location(), e);
                        match store.set_aside() {
                            Ok(Some(kept)) => warn!("Rejected configuration kept as {}", kept),
                            Ok(None) => {}
                            Err(e) => warn!("Rejected configuration could not be kept: {}", e),
                        }
                    }
                }
                let config = Configuration::default();
                store.save(&config)?;
                info!("cannot find a config. A new one has been created with default setup.");
                config
            }
        };

        warn_on_duplicates(&config);

        Ok(Self {
            store,
            live: Mutex::new(Arc::new(config)),
        })
    }

    /// Current configuration.
    ///
    /// The returned record stays valid and unchanged for as long as the
    /// caller holds it, even if a reload replaces the live one meanwhile.
    pub fn snapshot(&self) -> Arc<Configuration> {
        Arc::clone(&self.live.lock())
    }

    /// Load a fresh record from the store and make it live.
    ///
    /// On error the live record is left untouched.
    pub fn reload(&self) -> Result<Arc<Configuration>, ConfigError> {
        let fresh = Arc::new(self.store.load()?);
        warn_on_duplicates(&fresh);

        *self.live.lock() = Arc::clone(&fresh);
        debug!(
            "Configuration reloaded: {} robots, timeout {}ms, interval {}s, verbose {}",
            fresh.robots.len(),
            fresh.request_timeout_ms,
            fresh.reload_interval_sec,
            fresh.verbose_mode
        );
        Ok(fresh)
    }

    /// Periodic reload loop.
    ///
    /// Each sleep uses the interval captured before it starts; an interval
    /// loaded during a cycle only governs the next one. Returns once `pacer`
    /// reports shutdown.
    pub fn run_reloader(&self, pacer: &dyn Pacer) {
        let mut interval = self.snapshot().reload_interval();
        info!("Config reloader started (interval {}s)", interval.as_secs());

        while !pacer.wait(interval) {
            match self.reload() {
                Ok(config) => interval = config.reload_interval(),
                Err(e) => error!("An error occurred while config reloading: {}", e),
            }
        }

        info!("Config reloader stopped");
    }

    /// Run [`run_reloader`](Self::run_reloader) on a dedicated thread paced by `shutdown`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn_reloader(self: &Arc<Self>, shutdown: ShutdownSignal) -> io::Result<JoinHandle<()>> {
        let manager = Arc::clone(self);
        thread::Builder::new()
            .name(RELOADER_THREAD_NAME.to_string())
            .spawn(move || manager.run_reloader(&shutdown))
    }
}

fn warn_on_duplicates(config: &Configuration) {
    for address in config.duplicate_addresses() {
        warn!("Robot address {} is listed more than once", address);
    }
}
