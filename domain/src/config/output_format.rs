//! Output format value object

use serde::{Deserialize, Serialize};

/// How simulation results are rendered for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text with percentage bars (default)
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}
