//! Logging configuration from TOML (`[logging]` section)

use super::storage::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail of simulation events
    pub event_log: Option<String>,
    /// Diagnostic log file (same as `--log-file`)
    pub file: Option<String>,
}

impl FileLoggingConfig {
    pub fn event_log_path(&self) -> Option<PathBuf> {
        non_blank(&self.event_log).map(expand_home)
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        non_blank(&self.file).map(expand_home)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
