//! Population configuration from TOML (`[population]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePopulationConfig {
    /// Look unknown population ids up remotely and register them on success
    pub verify_remote: bool,
}
