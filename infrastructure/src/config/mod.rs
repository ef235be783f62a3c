//! Configuration file loading for survey-sim
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `SURVEY_SIM_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./survey-sim.toml` or `./.survey-sim.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/survey-sim/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileApiConfig, FileConfig, FileLoggingConfig, FileOutputConfig, FilePollingConfig,
    FilePopulationConfig, FileSchemaConfig, FileStorageConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
