//! Normalized result payload and schema mismatch reporting

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized simulation output
///
/// Choice questions yield a probability per submitted option, kept in the
/// submitted order. Free-text questions yield the answer text(s) verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultPayload {
    Percentages(IndexMap<String, f64>),
    Text(Vec<String>),
}

impl ResultPayload {
    pub fn percentages(&self) -> Option<&IndexMap<String, f64>> {
        match self {
            ResultPayload::Percentages(map) => Some(map),
            ResultPayload::Text(_) => None,
        }
    }

    pub fn texts(&self) -> Option<&[String]> {
        match self {
            ResultPayload::Text(texts) => Some(texts),
            ResultPayload::Percentages(_) => None,
        }
    }

    /// Sum of all probabilities (choice payloads only)
    pub fn percentage_sum(&self) -> Option<f64> {
        self.percentages().map(|map| map.values().sum())
    }

    /// Option with the highest probability; ties keep the earliest option
    pub fn leading_option(&self) -> Option<(&str, f64)> {
        let map = self.percentages()?;
        let mut best: Option<(&str, f64)> = None;
        for (option, &value) in map {
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((option.as_str(), value)),
            }
        }
        best
    }
}

/// Ways a remote payload can deviate from the submitted question
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaMismatch {
    #[error("response contains no answer percentages")]
    MissingPercentages,

    #[error("response contains no text answer")]
    MissingText,

    #[error(
        "percentages do not match the submitted options (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    OptionMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("percentage for {option:?} is not a number")]
    NotANumber { option: String },

    #[error("percentage for {option:?} is out of range: {value}")]
    OutOfRange { option: String, value: f64 },

    #[error("percentages sum to {sum:.4}, expected 1.0 ± {tolerance}")]
    SumOutOfTolerance { sum: f64, tolerance: f64 },
}

impl SchemaMismatch {
    /// Soft mismatches still allow the payload to be stored
    pub fn is_warning(&self) -> bool {
        matches!(self, SchemaMismatch::SumOutOfTolerance { .. })
    }
}

/// Normalizer output: the payload plus any soft mismatches found
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub payload: ResultPayload,
    pub warnings: Vec<SchemaMismatch>,
}

impl NormalizedResult {
    pub fn new(payload: ResultPayload) -> Self {
        Self {
            payload,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentages(pairs: &[(&str, f64)]) -> ResultPayload {
        ResultPayload::Percentages(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_leading_option() {
        let payload = percentages(&[("A", 0.3), ("B", 0.5), ("C", 0.2)]);
        assert_eq!(payload.leading_option(), Some(("B", 0.5)));
    }

    #[test]
    fn test_leading_option_tie_keeps_first() {
        let payload = percentages(&[("A", 0.5), ("B", 0.5)]);
        assert_eq!(payload.leading_option(), Some(("A", 0.5)));
    }

    #[test]
    fn test_text_has_no_leading_option() {
        let payload = ResultPayload::Text(vec!["Because".to_string()]);
        assert!(payload.leading_option().is_none());
        assert!(payload.percentage_sum().is_none());
    }

    #[test]
    fn test_serialized_shape_keeps_order() {
        let payload = percentages(&[("B", 0.4), ("A", 0.6)]);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"type":"percentages","value":{"B":0.4,"A":0.6}}"#
        );
        let back: ResultPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_only_sum_mismatch_is_warning() {
        assert!(SchemaMismatch::SumOutOfTolerance { sum: 0.9, tolerance: 0.01 }.is_warning());
        assert!(!SchemaMismatch::MissingPercentages.is_warning());
        assert!(
            !SchemaMismatch::OptionMismatch {
                missing: vec!["B".to_string()],
                unexpected: vec![]
            }
            .is_warning()
        );
    }
}
