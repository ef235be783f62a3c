//! Question kind value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of question posed to a population
///
/// The kebab-case strings are the values the remote API expects in
/// `question_options.question_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    FreeText,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "single-choice",
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::FreeText => "free-text",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "Single Choice",
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::FreeText => "Free Text",
        }
    }

    /// Choice questions need answer options and yield percentages
    pub fn is_choice(&self) -> bool {
        !matches!(self, QuestionKind::FreeText)
    }
}

impl Default for QuestionKind {
    fn default() -> Self {
        Self::SingleChoice
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single-choice" | "single_choice" => Ok(QuestionKind::SingleChoice),
            "multiple-choice" | "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "free-text" | "free_text" => Ok(QuestionKind::FreeText),
            other => Err(DomainError::UnknownQuestionKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_choice() {
        assert_eq!(QuestionKind::default(), QuestionKind::SingleChoice);
    }

    #[test]
    fn test_serialize_kebab_case() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "free-text".parse::<QuestionKind>().unwrap(),
            QuestionKind::FreeText
        );
        assert_eq!(
            "single_choice".parse::<QuestionKind>().unwrap(),
            QuestionKind::SingleChoice
        );
        assert!("ranking".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn test_is_choice() {
        assert!(QuestionKind::SingleChoice.is_choice());
        assert!(QuestionKind::MultipleChoice.is_choice());
        assert!(!QuestionKind::FreeText.is_choice());
    }
}
