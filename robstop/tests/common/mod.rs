//! Shared doubles for the robstop integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use robstop::logging::LogLineFormat;
use robstop::{ConfigManager, FleetDispatcher, Orchestrator};
use robstop_common::config::{ConfigError, ConfigStore, Configuration, RobotEndpoint};
use robstop_common::consts::ESTOP_PRESSED_LEVEL;
use robstop_common::robot::{ClientError, RobotControlClient};
use robstop_common::state::{ButtonState, Level};
use robstop_hal::{SimulatedLines, SimulationInput};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ─── Config store ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryState {
    pub record: Option<Configuration>,
    pub load_error: Option<ConfigError>,
    pub save_error: Option<ConfigError>,
}

/// In-memory store; clones share the same record.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn with_record(config: Configuration) -> Self {
        let store = Self::default();
        store.set(config);
        store
    }

    pub fn set(&self, config: Configuration) {
        self.state.lock().record = Some(config);
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Configuration, ConfigError> {
        let state = self.state.lock();
        if let Some(e) = &state.load_error {
            return Err(e.clone());
        }
        state.record.clone().ok_or(ConfigError::FileNotFound)
    }

    fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        if let Some(e) = &state.save_error {
            return Err(e.clone());
        }
        state.record = Some(config.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

// ─── Robot client ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub address: String,
    pub state_id: u8,
}

/// Records every command; optionally slow, optionally failing per address.
#[derive(Default)]
pub struct RecordingClient {
    pub failing: HashSet<String>,
    pub delay: Duration,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingClient {
    pub fn failing(addresses: &[&str]) -> Self {
        Self {
            failing: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.address.clone()).collect()
    }
}

impl RobotControlClient for RecordingClient {
    fn set_state(
        &self,
        address: &str,
        _credential: &str,
        state_id: u8,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.calls.lock().push(Call {
            address: address.to_string(),
            state_id,
        });
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.failing.contains(address) {
            return Err(ClientError::Timeout(timeout));
        }
        Ok(())
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

pub fn fleet(addresses: &[&str]) -> Configuration {
    Configuration {
        robots: addresses
            .iter()
            .map(|a| RobotEndpoint::new(*a, "Basic ZGlzdHJpYnV0b3I6NjJmMmYw"))
            .collect(),
        ..Configuration::default()
    }
}

pub fn manager_for(config: Configuration) -> Arc<ConfigManager> {
    let store = MemoryStore::with_record(config);
    Arc::new(ConfigManager::load_initial(Box::new(store)).expect("load config"))
}

/// Orchestrator on a simulated line, already configured.
pub fn simulated_bridge(
    manager: Arc<ConfigManager>,
    client: Arc<RecordingClient>,
) -> (Orchestrator<Arc<RecordingClient>>, SimulatedLines) {
    let lines = SimulatedLines::new();
    let mut orchestrator = Orchestrator::new(
        Box::new(SimulationInput::with_lines(lines.clone())),
        manager,
        FleetDispatcher::new(client),
    );
    orchestrator.configure().expect("configure input");
    (orchestrator, lines)
}

/// Electrical level that reads back as `state`.
pub fn level_of(state: ButtonState) -> Level {
    match (state, ESTOP_PRESSED_LEVEL) {
        (ButtonState::Pressed, level) => level,
        (ButtonState::Released, Level::High) => Level::Low,
        (ButtonState::Released, Level::Low) => Level::High,
    }
}

// ─── Log capture ────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a thread-local subscriber using the log file line format.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .event_format(LogLineFormat)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().clone();
    (result, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn lines_with<'a>(out: &'a str, needle: &str) -> Vec<&'a str> {
    out.lines().filter(|l| l.contains(needle)).collect()
}
