//! # Configuration Lifecycle Tests
//!
//! `ConfigManager` on top of the real TOML file store:
//!
//! - First run creates the default file
//! - Unusable defaults location is reported as an error
//! - Periodic reload picks up edits with a one-cycle interval lag
//! - A broken edit keeps the last good configuration

mod common;

use common::*;
use parking_lot::Mutex;
use robstop::{ConfigManager, Pacer};
use robstop_common::config::{ConfigError, ConfigLoader, Configuration, TomlFileStore};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

// ─── Helpers ────────────────────────────────────────────────────────

/// Runs `edits[i]` during the i-th sleep; stops once they are used up.
struct EditingPacer {
    edits: Mutex<Vec<Edit>>,
    waits: Mutex<Vec<Duration>>,
}

impl EditingPacer {
    fn new(mut edits: Vec<Edit>) -> Self {
        edits.reverse();
        Self {
            edits: Mutex::new(edits),
            waits: Mutex::new(Vec::new()),
        }
    }
}

impl Pacer for EditingPacer {
    fn wait(&self, timeout: Duration) -> bool {
        self.waits.lock().push(timeout);
        match self.edits.lock().pop() {
            Some(edit) => {
                edit();
                false
            }
            None => true,
        }
    }
}

type Edit = Box<dyn FnOnce() + Send>;

fn edit(f: impl FnOnce() + Send + 'static) -> Edit {
    Box::new(f)
}

fn config_file(dir: &TempDir) -> PathBuf {
    dir.path().join("Config.toml")
}

fn write_interval(path: &PathBuf, interval_sec: u64) {
    let body = format!(
        "requestTimeoutMs = 3000\nreloadIntervalSec = {interval_sec}\nverboseMode = false\n\n\
         [[robots]]\naddress = \"10.0.0.1\"\ncredential = \"Basic abc\"\n"
    );
    fs::write(path, body).expect("write config");
}

// ─── First run ──────────────────────────────────────────────────────

#[test]
fn test_first_run_writes_default_file() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);

    let (manager, out) =
        capture_logs(|| ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))));
    let manager = manager.expect("defaults persisted");

    assert!(path.exists());
    let on_disk = Configuration::load(&path).expect("default file parses");
    assert_eq!(on_disk, Configuration::default());
    assert_eq!(on_disk.request_timeout_ms, 3000);
    assert_eq!(on_disk.reload_interval_sec, 300);
    assert!(!on_disk.verbose_mode);
    assert!(on_disk.robots.is_empty());
    assert_eq!(*manager.snapshot(), on_disk);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("requestTimeoutMs = 3000"), "{text}");
    assert!(text.contains("reloadIntervalSec = 300"), "{text}");
    assert!(
        out.contains("cannot find a config. A new one has been created with default setup."),
        "{out}"
    );
}

#[test]
fn test_existing_file_is_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);
    write_interval(&path, 42);
    let before = fs::read_to_string(&path).unwrap();

    let manager = ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))).unwrap();

    assert_eq!(manager.snapshot().reload_interval_sec, 42);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_invalid_values_are_replaced_by_defaults() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);
    write_interval(&path, 0);
    let rejected = fs::read_to_string(&path).unwrap();

    let (manager, out) =
        capture_logs(|| ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))));
    let manager = manager.unwrap();

    assert_eq!(*manager.snapshot(), Configuration::default());
    assert_eq!(Configuration::load(&path).unwrap(), Configuration::default());

    // The operator's robot list survives next to the new defaults.
    let kept = dir.path().join("Config.toml.invalid");
    assert_eq!(fs::read_to_string(&kept).unwrap(), rejected);
    assert_eq!(lines_with(&out, "[WARNING] Rejected configuration kept as").len(), 1, "{out}");
}

#[test]
fn test_missing_file_leaves_nothing_set_aside() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);

    ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_unwritable_location_fails_startup() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let result = ConfigManager::load_initial(Box::new(TomlFileStore::new(blocker.join("Config.toml"))));

    assert!(matches!(result, Err(ConfigError::PersistError(_))));
}

// ─── Periodic reload ────────────────────────────────────────────────

#[test]
fn test_interval_change_applies_one_cycle_late() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);
    write_interval(&path, 300);
    let manager = ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))).unwrap();

    let edited = path.clone();
    let pacer = EditingPacer::new(vec![
        // Edited while the 300 s sleep is pending.
        edit(move || write_interval(&edited, 10)),
        edit(|| {}),
    ]);
    manager.run_reloader(&pacer);

    assert_eq!(
        *pacer.waits.lock(),
        vec![
            Duration::from_secs(300),
            Duration::from_secs(10),
            Duration::from_secs(10)
        ]
    );
    assert_eq!(manager.snapshot().reload_interval_sec, 10);
}

#[test]
fn test_broken_edit_keeps_last_good_config() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);
    write_interval(&path, 300);
    let manager = ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))).unwrap();

    let edited = path.clone();
    let pacer = EditingPacer::new(vec![edit(move || {
        fs::write(&edited, "robots = [ this is not toml").unwrap()
    })]);
    let ((), out) = capture_logs(|| manager.run_reloader(&pacer));

    let errors = lines_with(&out, "[ERROR] An error occurred while config reloading:");
    assert_eq!(errors.len(), 1, "{out}");
    assert_eq!(manager.snapshot().robots.len(), 1);
    assert_eq!(manager.snapshot().reload_interval_sec, 300);
    assert_eq!(
        *pacer.waits.lock(),
        vec![Duration::from_secs(300), Duration::from_secs(300)]
    );
}

#[test]
fn test_deleted_file_is_a_reload_error() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir);
    write_interval(&path, 300);
    let manager = ConfigManager::load_initial(Box::new(TomlFileStore::new(&path))).unwrap();

    fs::remove_file(&path).unwrap();

    assert!(matches!(manager.reload(), Err(ConfigError::FileNotFound)));
    assert_eq!(manager.snapshot().robots.len(), 1);
    // Reload never recreates the file.
    assert!(!path.exists());
}
