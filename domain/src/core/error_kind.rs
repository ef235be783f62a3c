//! Error classification shared by every layer
//!
//! The presentation layer never sees a raw error: each failure path is
//! reduced to an [`ErrorKind`] and a human-readable message.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classified failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid credentials / settings
    Configuration,
    /// Malformed question or options
    Validation,
    /// Unknown population (or result / question)
    NotFound,
    /// Network, HTTP or response parse failure
    Transport,
    /// No terminal status within the polling budget
    Timeout,
    /// Remote payload does not match the submitted question
    SchemaMismatch,
    /// Local store failure
    Persistence,
    /// Polling interrupted by the user
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Transport => "transport",
            ErrorKind::Timeout => "timeout",
            ErrorKind::SchemaMismatch => "schema_mismatch",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Cancelled => "cancelled",
        }
    }

    /// Message shown to end users, independent of the underlying detail
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => {
                "The simulation service is not configured. Check the API key and base URL."
            }
            ErrorKind::Validation => "The question or its answer options are invalid.",
            ErrorKind::NotFound => "The requested population could not be found.",
            ErrorKind::Transport => "The simulation service could not be reached.",
            ErrorKind::Timeout => "The simulation did not finish in time.",
            ErrorKind::SchemaMismatch => {
                "The simulation returned results that do not match the question."
            }
            ErrorKind::Persistence => "The result could not be saved.",
            ErrorKind::Cancelled => "Polling was interrupted.",
        }
    }

    /// Whether the user can fix the problem by changing their input
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, ErrorKind::Validation | ErrorKind::NotFound)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "configuration" => Ok(ErrorKind::Configuration),
            "validation" => Ok(ErrorKind::Validation),
            "not_found" => Ok(ErrorKind::NotFound),
            "transport" => Ok(ErrorKind::Transport),
            "timeout" => Ok(ErrorKind::Timeout),
            "schema_mismatch" => Ok(ErrorKind::SchemaMismatch),
            "persistence" => Ok(ErrorKind::Persistence),
            "cancelled" => Ok(ErrorKind::Cancelled),
            other => Err(format!("unknown error kind: {}", other)),
        }
    }
}
