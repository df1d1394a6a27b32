//! # Robstop
//!
//! Emergency-stop bridge: samples the E-stop line and pauses or readies
//! every robot listed in the configuration file.
//!
//! # Usage
//!
//! ```bash
//! # Hardware input, Config.toml and robstop.log in the working directory
//! robstop
//!
//! # Simulation driver, custom files
//! robstop --simulate --config /etc/robstop/Config.toml --log-file /var/log/robstop.log
//!
//! # Simulation driver pressed by writing 1 (released: 0) to estop.level
//! robstop --simulate --sim-line estop.level
//!
//! # Trace-level logging
//! robstop -v
//! ```

use clap::Parser;
use robstop::logging;
use robstop::{ConfigManager, FleetDispatcher, Orchestrator, ShutdownSignal, StartupError};
use robstop_common::config::TomlFileStore;
use robstop_common::consts::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE, ESTOP_PIN};
use robstop_common::input::DigitalInput;
use robstop_hal::{InputDriverRegistry, MirRestClient, SimulationInput};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};

/// Robstop - mirror an emergency-stop input onto a robot fleet
#[derive(Parser, Debug)]
#[command(name = "robstop")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Mirrors an emergency-stop input onto a fleet of networked mobile robots")]
#[command(long_about = None)]
struct Args {
    /// Configuration file, created with defaults when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Append-only log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Input driver for the E-stop line
    #[arg(short, long, default_value = "sysfs")]
    driver: String,

    /// E-stop input line
    #[arg(long, default_value_t = ESTOP_PIN)]
    pin: u32,

    /// Force simulation driver (ignores --driver)
    #[arg(short = 's', long)]
    simulate: bool,

    /// File holding the simulated E-stop level (0 or 1), re-read every poll
    #[arg(long, requires = "simulate")]
    sim_line: Option<PathBuf>,

    /// Enable trace-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::TRACE } else { Level::DEBUG };
    if let Err(e) = logging::init(&args.log_file, level) {
        eprintln!("robstop: cannot open log {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        robstop::fatal!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), StartupError> {
    info!("Robstop v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = TomlFileStore::new(&args.config);
    let config = Arc::new(ConfigManager::load_initial(Box::new(store))?);

    let shutdown = ShutdownSignal::new();
    let reloader = config
        .spawn_reloader(shutdown.clone())
        .map_err(StartupError::Reloader)?;

    // From here on the reloader must be stopped on every exit path.
    let result = monitor(args, &config, &shutdown);

    shutdown.trigger();
    if reloader.join().is_err() {
        warn!("Config reloader panicked");
    }

    result?;
    info!("Robstop shutdown complete");
    Ok(())
}

fn monitor(
    args: &Args,
    config: &Arc<ConfigManager>,
    shutdown: &ShutdownSignal,
) -> Result<(), StartupError> {
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        signal.trigger();
    })?;

    let driver_name = if args.simulate {
        info!("Simulation mode enabled");
        "simulation"
    } else {
        args.driver.as_str()
    };

    let input: Box<dyn DigitalInput> = match &args.sim_line {
        Some(path) => {
            info!("Simulated E-stop level is read from {}", path.display());
            Box::new(SimulationInput::with_level_file(path))
        }
        None => InputDriverRegistry::with_builtin().create_driver(driver_name)?,
    };

    let mut orchestrator = Orchestrator::new(
        input,
        Arc::clone(config),
        FleetDispatcher::new(MirRestClient::new()),
    )
    .with_pin(args.pin);

    orchestrator.serve(shutdown)?;
    Ok(())
}
