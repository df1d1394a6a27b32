//! Failure-isolated fan-out of one target state over a fleet snapshot.

use robstop_common::config::Configuration;
use robstop_common::robot::RobotControlClient;
use robstop_common::state::{DesiredState, DispatchOutcome};
use tracing::{error, trace};

/// Applies a [`DesiredState`] to every robot of a configuration snapshot.
///
/// Robots are contacted one after another, in configuration order. A failing
/// robot is logged and skipped; it never stops the rest of the fleet.
#[derive(Debug)]
pub struct FleetDispatcher<C> {
    client: C,
}

impl<C: RobotControlClient> FleetDispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Send `target` to every robot in `snapshot`.
    ///
    /// Never fails: the outcome counts how many robots confirmed.
    pub fn dispatch(&self, snapshot: &Configuration, target: DesiredState) -> DispatchOutcome {
        let state_id = target.state_id();
        let timeout = snapshot.request_timeout();
        let mut outcome = DispatchOutcome {
            success_count: 0,
            attempted: snapshot.robots.len(),
        };

        for (index, robot) in snapshot.robots.iter().enumerate() {
            match self
                .client
                .set_state(&robot.address, &robot.credential, state_id, timeout)
            {
                Ok(()) => {
                    outcome.success_count += 1;
                    trace!("robot #{} ({}) set to {}", index + 1, robot.address, target);
                }
                Err(e) => error!(
                    "An error occurred while robot state change: robot #{} ({}): {}",
                    index + 1,
                    robot.address,
                    e
                ),
            }
        }

        outcome
    }
}
