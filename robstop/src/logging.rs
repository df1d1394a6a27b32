//! Log sink setup and line format.
//!
//! Events go to two layers:
//! - the console, using the stock `tracing_subscriber::fmt` layout
//! - an append-only log file, one event per line:
//!
//! ```text
//! 17-10-2026 | 02:41:07 PM [ERROR] An error occurred while robot state change: ...
//! ```
//!
//! Level labels are TRACE, DEBUG, INFO, WARNING, ERROR and FATAL. `tracing`
//! has no FATAL level; fatal events are ERROR events on [`FATAL_TARGET`],
//! emitted through the [`fatal!`](crate::fatal) macro.

use chrono::Local;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Target carried by FATAL events.
pub const FATAL_TARGET: &str = "robstop::fatal";

/// Timestamp layout: day-month-year, 12-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y | %I:%M:%S %p";

/// Log an event at FATAL severity.
///
/// Accepts the same arguments as `tracing::error!`.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        ::tracing::error!(target: $crate::logging::FATAL_TARGET, $($arg)+)
    };
}

/// Error opening the log sink.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("log file appender: {0}")]
    Appender(#[from] InitError),

    #[error("subscriber already installed: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Severity label written in brackets on each log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Map a `tracing` level and event target onto a severity.
    pub fn of(level: &Level, target: &str) -> Self {
        match *level {
            Level::TRACE => Self::Trace,
            Level::DEBUG => Self::Debug,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warning,
            _ if target == FATAL_TARGET => Self::Fatal,
            _ => Self::Error,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

/// `<timestamp> [<LEVEL>] <message>` event formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let severity = Severity::of(meta.level(), meta.target());
        write!(
            writer,
            "{} [{}] ",
            Local::now().format(TIMESTAMP_FORMAT),
            severity.label()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the console + file subscriber.
///
/// `default_level` is the most verbose level let through when `RUST_LOG`
/// does not say otherwise.
pub fn init(log_path: &Path, default_level: Level) -> Result<(), LoggingError> {
    write_header_if_new(log_path)?;

    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| robstop_common::consts::DEFAULT_LOG_FILE.to_string());

    // Blocking writer: a fatal exit must not lose its last line.
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;

    let filter = EnvFilter::from_default_env().add_directive(default_level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LogLineFormat)
                .with_ansi(false)
                .with_writer(appender),
        )
        .try_init()?;

    Ok(())
}

/// Start a fresh log file with a creation header line.
fn write_header_if_new(log_path: &Path) -> Result<(), LoggingError> {
    if log_path.exists() {
        return Ok(());
    }
    let name = log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    writeln!(
        file,
        "{} {} is created.",
        Local::now().format(TIMESTAMP_FORMAT),
        name
    )?;
    Ok(())
}
