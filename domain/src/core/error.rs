//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Everything except [`DomainError::IllegalTransition`] is a validation
/// failure: the caller supplied input that can never be submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid population id: {0}")]
    InvalidPopulationId(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid answer options: {0}")]
    InvalidOptions(String),

    #[error("Unknown question kind: {0}")]
    UnknownQuestionKind(String),

    #[error("Unknown simulation status: {0:?}")]
    UnknownStatus(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was caused by malformed user input
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            DomainError::IllegalTransition { .. } | DomainError::UnknownStatus(_)
        )
    }
}
