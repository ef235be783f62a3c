//! Answer options value object

use super::kind::QuestionKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered answer options for a question (Value Object)
///
/// Construction through [`AnswerOptions::for_kind`] enforces the shape rules:
/// choice questions need at least one option, every option is non-blank and
/// unique (case-sensitive); free-text questions carry no options at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerOptions(Vec<String>);

impl AnswerOptions {
    pub fn for_kind(kind: QuestionKind, options: Vec<String>) -> Result<Self, DomainError> {
        if !kind.is_choice() {
            if !options.is_empty() {
                return Err(DomainError::InvalidOptions(format!(
                    "{} questions cannot have answer options ({} given)",
                    kind,
                    options.len()
                )));
            }
            return Ok(Self::default());
        }

        if options.is_empty() {
            return Err(DomainError::InvalidOptions(format!(
                "{} questions need at least one answer option",
                kind
            )));
        }

        let mut seen = HashSet::with_capacity(options.len());
        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(DomainError::InvalidOptions(format!(
                    "option {} is empty",
                    index + 1
                )));
            }
            if !seen.insert(option.as_str()) {
                return Err(DomainError::InvalidOptions(format!(
                    "duplicate option: {:?}",
                    option
                )));
            }
        }

        Ok(Self(options))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a AnswerOptions {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
