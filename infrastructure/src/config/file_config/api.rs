//! API configuration from TOML (`[api]` section)

use crate::providers::TransportKind;
use crate::semilattice::{ApiCredentials, ApiSettings, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use survey_sim_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Service endpoint
    pub base_url: String,
    /// Environment variable holding the bearer key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    /// Adapter used to talk to the service: "http" or "sdk"
    pub transport: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            transport: TransportKind::default().as_str().to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl FileApiConfig {
    /// Parse the transport string into a [`TransportKind`]
    ///
    /// Accepts: "http", "raw", "sdk", "client"
    pub fn parse_transport(&self) -> (TransportKind, Vec<ConfigIssue>) {
        match self.transport.parse::<TransportKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "api.transport".to_string(),
                        value: self.transport.clone(),
                        valid_values: TransportKind::ALL
                            .iter()
                            .map(|k| k.as_str().to_string())
                            .collect(),
                    },
                    format!(
                        "api.transport: unknown value '{}', falling back to '{}'",
                        self.transport,
                        TransportKind::default()
                    ),
                );
                (TransportKind::default(), vec![issue])
            }
        }
    }

    pub fn credentials(&self) -> ApiCredentials {
        match self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => ApiCredentials::fixed(key),
            None => ApiCredentials::from_env(self.api_key_env.trim()),
        }
    }

    pub fn to_api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.trim().to_string(),
            credentials: self.credentials(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub(super) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_transport().1;

        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "api.base_url".to_string(),
                },
                "api.base_url is empty",
            ));
        }
        if self.api_key.is_none() && self.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "api.api_key_env".to_string(),
                },
                "api.api_key_env is empty and no api.api_key is set",
            ));
        }
        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "api.request_timeout_secs".to_string(),
                },
                "api.request_timeout_secs is 0, using 1 second",
            ));
        }

        issues
    }
}
