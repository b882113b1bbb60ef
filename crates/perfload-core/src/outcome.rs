// Per-request outcomes and the terminal state of a run

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result of one dispatched request: status, round-trip time, and a derived
/// success flag. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// HTTP status code, `None` when the request failed at the transport
    /// level (connection refused, DNS failure, timeout)
    pub status: Option<u16>,
    /// Wall-clock round-trip time of the call itself, excluding queue wait
    pub elapsed: Duration,
    /// `true` iff the status is in 200..300
    pub success: bool,
}

impl Outcome {
    /// Record a completed request.
    pub fn from_status(status: u16, elapsed: Duration) -> Self {
        Self {
            status: Some(status),
            elapsed,
            success: (200..300).contains(&status),
        }
    }

    /// Record a request that never produced a status. Transport errors are
    /// failed outcomes, not run failures.
    pub fn transport_failure(elapsed: Duration) -> Self {
        Self {
            status: None,
            elapsed,
            success: false,
        }
    }
}

/// How a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Every planned request was submitted and drained
    Completed,
    /// The global deadline expired before all requests were submitted
    Aborted,
}
