//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod api;
mod logging;
mod output;
mod polling;
mod population;
mod schema;
mod storage;

pub use api::FileApiConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use polling::FilePollingConfig;
pub use population::FilePopulationConfig;
pub use schema::FileSchemaConfig;
pub use storage::FileStorageConfig;

use serde::{Deserialize, Serialize};
use survey_sim_application::SimulationParams;
use survey_sim_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote service settings
    pub api: FileApiConfig,
    /// Status polling settings
    pub polling: FilePollingConfig,
    /// Response checking settings
    pub schema: FileSchemaConfig,
    /// Population lookup settings
    pub population: FilePopulationConfig,
    /// Local database settings
    pub storage: FileStorageConfig,
    /// Log file settings
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Credential availability is not checked here: it depends on the
    /// command being run and is verified by the gateway before any request.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.api.issues();
        issues.extend(self.polling.to_poll_params().1);
        issues.extend(self.schema.parse_sum_tolerance().1);
        issues
    }

    /// Orchestration parameters derived from `[polling]`, `[schema]` and `[population]`
    pub fn to_simulation_params(&self) -> SimulationParams {
        SimulationParams::default()
            .with_poll(self.polling.to_poll_params().0)
            .with_sum_tolerance(self.schema.parse_sum_tolerance().0)
            .with_strict_schema(self.schema.strict)
            .with_verify_remote_population(self.population.verify_remote)
    }
}
