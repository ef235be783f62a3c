//! API credential resolution
//!
//! The bearer key is looked up on every call rather than captured at start-up,
//! so a missing key surfaces as a configuration error at the first request
//! and a key exported later is picked up without rebuilding the client.

use survey_sim_application::ports::simulation_gateway::GatewayError;

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "SEMILATTICE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    env_var: String,
    explicit: Option<String>,
}

impl Default for ApiCredentials {
    fn default() -> Self {
        Self::from_env(DEFAULT_API_KEY_ENV)
    }
}

impl ApiCredentials {
    /// Read the key from `env_var` at call time.
    pub fn from_env(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            explicit: None,
        }
    }

    /// Use a fixed key, ignoring the environment.
    pub fn fixed(key: impl Into<String>) -> Self {
        Self {
            env_var: DEFAULT_API_KEY_ENV.to_string(),
            explicit: Some(key.into()),
        }
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Resolve the key, failing with [`GatewayError::Configuration`] when absent.
    pub fn resolve(&self) -> Result<String, GatewayError> {
        if let Some(key) = self.explicit.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.trim().to_string());
        }
        match std::env::var(&self.env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(GatewayError::Configuration(format!(
                "API key not found: set the {} environment variable",
                self.env_var
            ))),
        }
    }

    pub fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }
}
