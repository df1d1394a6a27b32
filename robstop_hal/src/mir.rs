//! MiR-style REST robot client.
//!
//! One state change is one blocking HTTP request:
//!
//! ```text
//! PUT http://<address>/api/v2.0.0/status
//! Authorization: <credential>
//! Accept-Language: en_US
//! Content-Type: application/json
//!
//! {"state_id": 4}
//! ```
//!
//! Any 2xx answer counts as success. The request runs under a global
//! timeout equal to the configured per-robot timeout.

use robstop_common::robot::{ClientError, RobotControlClient};
use std::time::Duration;
use tracing::{debug, trace};

/// REST path of the robot status resource.
pub const STATUS_PATH: &str = "/api/v2.0.0/status";

/// Language header value expected by the controllers.
const ACCEPT_LANGUAGE: &str = "en_US";

/// Blocking REST client for MiR-style robot controllers.
#[derive(Debug, Clone, Default)]
pub struct MirRestClient;

impl MirRestClient {
    /// Create a new client.
    pub fn new() -> Self {
        Self
    }

    /// Build the status URL for a configured address.
    ///
    /// Bare hosts get an `http://` scheme; addresses that already carry a
    /// scheme are used as base URL.
    pub fn status_url(address: &str) -> Result<String, ClientError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClientError::InvalidAddress(address.to_string()));
        }

        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address.trim_end_matches('/'))
        };
        Ok(format!("{base}{STATUS_PATH}"))
    }
}

impl RobotControlClient for MirRestClient {
    fn set_state(
        &self,
        address: &str,
        credential: &str,
        state_id: u8,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        let url = Self::status_url(address)?;
        let body = serde_json::json!({ "state_id": state_id }).to_string();

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent = ureq::Agent::new_with_config(config);

        debug!("PUT {} state_id={}", url, state_id);
        let response = agent
            .put(url.as_str())
            .header("Authorization", credential)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| classify_error(e, timeout))?;

        trace!("{} answered HTTP {}", url, response.status().as_u16());
        Ok(())
    }
}

/// Map a ureq error onto the client error taxonomy.
fn classify_error(error: ureq::Error, timeout: Duration) -> ClientError {
    match error {
        ureq::Error::StatusCode(status) => ClientError::Status(status),
        ureq::Error::Timeout(_) => ClientError::Timeout(timeout),
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            ClientError::Timeout(timeout)
        }
        other => ClientError::Transport(other.to_string()),
    }
}
