//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "survey-sim";
const DB_FILE: &str = "survey-sim.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// SQLite database file; `~/` is expanded
    pub path: Option<String>,
}

impl FileStorageConfig {
    /// Default location: `<data_dir>/survey-sim/survey-sim.db`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR).join(DB_FILE))
    }

    /// Database path to open, or `None` when no location can be determined
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => Some(expand_home(path)),
            None => Self::default_path(),
        }
    }
}

pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
