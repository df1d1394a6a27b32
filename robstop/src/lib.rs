//! # Robstop
//!
//! Safety-interlock bridge between a physical emergency-stop input and a
//! fleet of networked mobile robots. Pressing the E-stop pauses every
//! configured robot; releasing it returns them to ready.
//!
//! # Module Structure
//!
//! - [`config_manager`] - Live configuration owner and background reloader
//! - [`dispatcher`] - Failure-isolated fan-out of one target state
//! - [`orchestrator`] - E-stop sampling loop and edge detection
//! - [`shutdown`] - Cancellable pacing shared by both loops
//! - [`logging`] - Line-oriented log sink
//! - [`error`] - Startup error taxonomy
//!
//! # Data flow
//!
//! ```text
//! DigitalInput ──► Orchestrator (edge detect) ──► ConfigManager (snapshot)
//!                                                        │
//!                         RobotControlClient ×N ◄── FleetDispatcher
//!
//! ConfigManager reloader thread ──► ConfigStore (every reloadIntervalSec)
//! ```

pub mod config_manager;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod shutdown;

pub use crate::config_manager::ConfigManager;
pub use crate::dispatcher::FleetDispatcher;
pub use crate::error::StartupError;
pub use crate::orchestrator::{DispatchMode, EdgeDetector, Orchestrator, Transition};
pub use crate::shutdown::{Pacer, ShutdownSignal};
