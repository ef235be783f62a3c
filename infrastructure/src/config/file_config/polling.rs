//! Polling configuration from TOML (`[polling]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use survey_sim_application::PollParams;
use survey_sim_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollingConfig {
    /// Wall-clock budget for a simulation to finish
    pub timeout_secs: u64,
    /// Pause between status requests
    pub interval_secs: u64,
    /// Consecutive transport failures tolerated while polling
    pub max_transport_retries: u32,
}

impl Default for FilePollingConfig {
    fn default() -> Self {
        let defaults = PollParams::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            interval_secs: defaults.interval.as_secs(),
            max_transport_retries: defaults.max_transport_retries,
        }
    }
}

impl FilePollingConfig {
    /// Convert to [`PollParams`], replacing unusable values with defaults
    pub fn to_poll_params(&self) -> (PollParams, Vec<ConfigIssue>) {
        let defaults = PollParams::default();
        let mut issues = Vec::new();

        let timeout = if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "polling.timeout_secs".to_string(),
                },
                format!(
                    "polling.timeout_secs must be at least 1, using {}",
                    defaults.timeout.as_secs()
                ),
            ));
            defaults.timeout
        } else {
            Duration::from_secs(self.timeout_secs)
        };

        let interval = if self.interval_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "polling.interval_secs".to_string(),
                },
                format!(
                    "polling.interval_secs must be at least 1, using {}",
                    defaults.interval.as_secs()
                ),
            ));
            defaults.interval
        } else {
            Duration::from_secs(self.interval_secs)
        };

        if interval > timeout {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "polling.interval_secs".to_string(),
                },
                format!(
                    "polling.interval_secs ({}) exceeds polling.timeout_secs ({}), only one poll will run",
                    interval.as_secs(),
                    timeout.as_secs()
                ),
            ));
        }

        let params = PollParams::default()
            .with_timeout(timeout)
            .with_interval(interval)
            .with_max_transport_retries(self.max_transport_retries);
        (params, issues)
    }
}
