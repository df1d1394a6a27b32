//! E-stop sampling loop.
//!
//! The [`Orchestrator`] samples the E-stop line every
//! [`POLL_INTERVAL`](robstop_common::prelude::POLL_INTERVAL), feeds the
//! logical state to an [`EdgeDetector`] and, on each transition, dispatches
//! the matching target state to the fleet found in a fresh configuration
//! snapshot.
//!
//! # State machine
//!
//! ```text
//!            sample == pressed
//!   ┌──────────┐ ─────────────► ┌─────────┐
//!   │ Released │                │ Pressed │
//!   └──────────┘ ◄───────────── └─────────┘
//!   (initial)    sample != pressed
//!
//!   entering Pressed  → dispatch Pause
//!   entering Released → dispatch Ready
//! ```

use robstop_common::config::Configuration;
use robstop_common::consts::{ESTOP_PIN, ESTOP_PIN_MODE, ESTOP_PRESSED_LEVEL};
use robstop_common::input::{DigitalInput, InputError};
use robstop_common::prelude::POLL_INTERVAL;
use robstop_common::robot::RobotControlClient;
use robstop_common::state::{ButtonState, DesiredState, DispatchOutcome, Level};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config_manager::ConfigManager;
use crate::dispatcher::FleetDispatcher;
use crate::shutdown::Pacer;

pub const PRESS_DETECTED: &str = "Emergency button press has been detected! Stopping robots...";
pub const ROBOTS_STOPPED: &str = "Robots have been stopped.";
pub const RELEASE_DETECTED: &str =
    "Emergency button has been released. Setting ready status for robots...";
pub const ROBOTS_READY: &str = "Robots have been returned to ready state.";

// ─── DispatchMode ───────────────────────────────────────────────────

/// Whether a transition actually commands the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Log at INFO and send the command to every robot.
    Live,
    /// Log the transition at DEBUG and command nobody.
    ///
    /// Selected by `verboseMode`. While it is on, pressing the E-stop does
    /// NOT pause the fleet.
    DryRun,
}

impl DispatchMode {
    pub fn for_config(config: &Configuration) -> Self {
        if config.verbose_mode {
            Self::DryRun
        } else {
            Self::Live
        }
    }
}

// ─── EdgeDetector ───────────────────────────────────────────────────

/// Reports a logical state only when it differs from the previous sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last: ButtonState,
}

impl EdgeDetector {
    /// Detector starting in [`ButtonState::Released`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample; returns the new state on a transition.
    pub fn update(&mut self, sample: ButtonState) -> Option<ButtonState> {
        if sample == self.last {
            return None;
        }
        self.last = sample;
        Some(sample)
    }

    pub fn state(&self) -> ButtonState {
        self.last
    }
}

// ─── Transition ─────────────────────────────────────────────────────

/// What happened on one logical transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State the button entered.
    pub state: ButtonState,
    /// Target state derived from it.
    pub target: DesiredState,
    pub mode: DispatchMode,
    /// `None` in dry-run mode.
    pub outcome: Option<DispatchOutcome>,
}

// ─── Orchestrator ───────────────────────────────────────────────────

/// Drives the sample / detect / dispatch cycle.
pub struct Orchestrator<C> {
    input: Box<dyn DigitalInput>,
    pin: u32,
    pressed_level: Level,
    config: Arc<ConfigManager>,
    dispatcher: FleetDispatcher<C>,
    edges: EdgeDetector,
    /// Consecutive failed reads.
    read_failures: u64,
}

impl<C: RobotControlClient> Orchestrator<C> {
    /// Orchestrator on the fixed E-stop line.
    pub fn new(
        input: Box<dyn DigitalInput>,
        config: Arc<ConfigManager>,
        dispatcher: FleetDispatcher<C>,
    ) -> Self {
        Self {
            input,
            pin: ESTOP_PIN,
            pressed_level: ESTOP_PRESSED_LEVEL,
            config,
            dispatcher,
            edges: EdgeDetector::new(),
            read_failures: 0,
        }
    }

    /// Sample `pin` instead of [`ESTOP_PIN`].
    pub fn with_pin(mut self, pin: u32) -> Self {
        self.pin = pin;
        self
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Current logical state of the button.
    pub fn state(&self) -> ButtonState {
        self.edges.state()
    }

    pub fn dispatcher(&self) -> &FleetDispatcher<C> {
        &self.dispatcher
    }

    /// Claim the E-stop line as a pulled-up input.
    pub fn configure(&mut self) -> Result<(), InputError> {
        self.input.configure(self.pin, ESTOP_PIN_MODE)?;
        info!(
            "E-stop input ready (driver '{}', pin {}, pressed when {})",
            self.input.name(),
            self.pin,
            self.pressed_level
        );
        Ok(())
    }

    /// Take one sample and act on it.
    ///
    /// A failed read is logged and skipped; the previous state is kept.
    pub fn poll_once(&mut self) -> Option<Transition> {
        let level = match self.input.read(self.pin) {
            Ok(level) => {
                if self.read_failures > 0 {
                    info!(
                        "E-stop input recovered after {} failed reads",
                        self.read_failures
                    );
                    self.read_failures = 0;
                }
                level
            }
            Err(e) => {
                self.read_failures += 1;
                if self.read_failures <= 10 || self.read_failures % 1000 == 0 {
                    error!("E-stop read failure #{}: {}", self.read_failures, e);
                }
                return None;
            }
        };

        let sample = ButtonState::from_level(level, self.pressed_level);
        let entered = self.edges.update(sample)?;
        Some(self.handle_transition(entered))
    }

    /// Dispatch the target state for a button that just entered `state`.
    pub fn handle_transition(&self, state: ButtonState) -> Transition {
        let target = state.desired_state();
        let (before, after) = match state {
            ButtonState::Pressed => (PRESS_DETECTED, ROBOTS_STOPPED),
            ButtonState::Released => (RELEASE_DETECTED, ROBOTS_READY),
        };

        let snapshot = self.config.snapshot();
        let mode = DispatchMode::for_config(&snapshot);

        let outcome = match mode {
            DispatchMode::Live => {
                info!("{}", before);
                let outcome = self.dispatcher.dispatch(&snapshot, target);
                info!(
                    "{} of {} robots have been affected.",
                    outcome.success_count, outcome.attempted
                );
                info!("{}", after);
                Some(outcome)
            }
            DispatchMode::DryRun => {
                debug!("{}", before);
                debug!(
                    "verboseMode is on: {} not sent to {} robots",
                    target,
                    snapshot.robots.len()
                );
                debug!("{}", after);
                None
            }
        };

        Transition {
            state,
            target,
            mode,
            outcome,
        }
    }

    /// Sample at a fixed cadence until `pacer` reports shutdown.
    pub fn run(&mut self, pacer: &dyn Pacer) {
        info!(
            "Monitoring E-stop (pin {}, every {}ms)",
            self.pin,
            POLL_INTERVAL.as_millis()
        );

        loop {
            let cycle_start = Instant::now();
            self.poll_once();

            let remaining = POLL_INTERVAL.saturating_sub(cycle_start.elapsed());
            if pacer.wait(remaining) {
                break;
            }
        }

        info!("E-stop monitoring stopped (button {})", self.edges.state());
    }

    /// Configure the line, sample until `pacer` reports shutdown, release.
    ///
    /// The line is released on every path, including a configure that
    /// failed after claiming it. The configure error wins over a release
    /// error.
    pub fn serve(&mut self, pacer: &dyn Pacer) -> Result<(), InputError> {
        let configured = self.configure();
        if configured.is_ok() {
            self.run(pacer);
        }
        let released = self.shutdown();
        configured.and(released)
    }

    /// Release the input line.
    pub fn shutdown(&mut self) -> Result<(), InputError> {
        info!("Releasing E-stop input '{}'", self.input.name());
        self.input.release()
    }
}
