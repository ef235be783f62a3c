//! Schema checking configuration from TOML (`[schema]` section)

use serde::{Deserialize, Serialize};
use survey_sim_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_SUM_TOLERANCE};

/// Tolerances above this are accepted but almost certainly a typo
const SUSPICIOUS_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchemaConfig {
    /// Allowed distance of a percentage sum from 1.0
    pub sum_tolerance: f64,
    /// Treat sum warnings as hard schema mismatches
    pub strict: bool,
}

impl Default for FileSchemaConfig {
    fn default() -> Self {
        Self {
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
            strict: false,
        }
    }
}

impl FileSchemaConfig {
    pub fn parse_sum_tolerance(&self) -> (f64, Vec<ConfigIssue>) {
        let field = || ConfigIssueCode::OutOfRange {
            field: "schema.sum_tolerance".to_string(),
        };

        if !self.sum_tolerance.is_finite() || self.sum_tolerance < 0.0 {
            let issue = ConfigIssue::error(
                field(),
                format!(
                    "schema.sum_tolerance must be a non-negative number, using {DEFAULT_SUM_TOLERANCE}"
                ),
            );
            return (DEFAULT_SUM_TOLERANCE, vec![issue]);
        }
        if self.sum_tolerance > SUSPICIOUS_TOLERANCE {
            let issue = ConfigIssue::warning(
                field(),
                format!(
                    "schema.sum_tolerance is {}, percentage sums are effectively unchecked",
                    self.sum_tolerance
                ),
            );
            return (self.sum_tolerance, vec![issue]);
        }
        (self.sum_tolerance, vec![])
    }
}
