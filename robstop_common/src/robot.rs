//! Robot control client trait and error types.
//!
//! A `RobotControlClient` sends one state-change command to one robot and
//! reports success or failure. Failure reasons are kept for log context
//! only; the dispatcher treats every variant the same way.

use std::time::Duration;
use thiserror::Error;

/// Error types for a single state-change command.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No response within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, DNS or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The robot answered with a non-success status.
    #[error("robot rejected the command with HTTP {0}")]
    Status(u16),

    /// The endpoint address cannot be turned into a request URL.
    #[error("invalid robot address {0:?}")]
    InvalidAddress(String),
}

/// Sends state-change commands to robot controllers.
pub trait RobotControlClient: Send + Sync {
    /// Command the robot at `address` into the state identified by `state_id`.
    ///
    /// Blocks for at most `timeout` (plus connection setup jitter).
    fn set_state(
        &self,
        address: &str,
        credential: &str,
        state_id: u8,
        timeout: Duration,
    ) -> Result<(), ClientError>;
}

impl<T: RobotControlClient + ?Sized> RobotControlClient for std::sync::Arc<T> {
    fn set_state(
        &self,
        address: &str,
        credential: &str,
        state_id: u8,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        (**self).set_state(address, credential, state_id, timeout)
    }
}
