//! Poll parameters: status loop control.
//!
//! [`PollParams`] groups the static parameters that drive
//! [`SimulationPoller`](crate::use_cases::poll_simulation::SimulationPoller).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll loop control parameters.
///
/// The interval is fixed (no backoff growth). The timeout is advisory: it
/// stops new polls from being scheduled but never aborts an in-flight call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollParams {
    /// Wall-clock budget for reaching a terminal status.
    pub timeout: Duration,
    /// Pause between two status requests.
    pub interval: Duration,
    /// Consecutive transport failures tolerated before the poll fails.
    pub max_transport_retries: u32,
}

impl Default for PollParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
            max_transport_retries: 3,
        }
    }
}

impl PollParams {
    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_transport_retries(mut self, max: u32) -> Self {
        self.max_transport_retries = max;
        self
    }
}
