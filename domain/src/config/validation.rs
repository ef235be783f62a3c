//! Structured configuration issues.
//!
//! Config loading never fails on a questionable value; it reports a
//! [`ConfigIssue`] and the caller decides whether to abort (errors) or
//! just print it (warnings).

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A field only accepts a fixed set of values.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A required value is empty.
    EmptyValue { field: String },
    /// A numeric value is outside its usable range.
    OutOfRange { field: String },
    /// The API credential cannot be resolved.
    MissingCredential { env_var: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::EmptyValue {
                field: "api.base_url".to_string(),
            },
            "api.base_url is empty",
        );
        assert!(issue.is_error());

        let issue = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "schema.sum_tolerance".to_string(),
            },
            "tolerance is unusually large",
        );
        assert!(!issue.is_error());
        assert_eq!(issue.severity, Severity::Warning);
    }
}
