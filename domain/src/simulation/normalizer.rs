//! Response normalizer
//!
//! Maps the raw answer returned by the remote service onto a
//! [`NormalizedResult`]. The two transport adapters do not agree on field
//! names or nesting (`data` as an object, `data` as a list, camelCase keys
//! from the SDK-style client), so every field is looked up under a set of
//! aliases. Unknown fields are ignored.

use super::payload::{NormalizedResult, ResultPayload, SchemaMismatch};
use crate::question::kind::QuestionKind;
use crate::question::options::AnswerOptions;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Allowed deviation of the percentage sum from 1.0
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.01;

const PERCENTAGE_FIELDS: &[&str] = &[
    "simulated_answer_percentages",
    "simulatedAnswerPercentages",
    "answer_percentages",
    "percentages",
];

const TEXT_FIELDS: &[&str] = &[
    "simulated_answer_text",
    "simulatedAnswerText",
    "simulated_answers",
    "simulatedAnswers",
    "answer_text",
    "answers",
];

/// Normalize a raw answer payload for a question of `kind`.
///
/// Hard mismatches are returned as `Err`; a percentage sum outside
/// `tolerance` is attached to the result as a warning instead.
pub fn normalize(
    kind: QuestionKind,
    options: &AnswerOptions,
    raw: &Value,
    tolerance: f64,
) -> Result<NormalizedResult, SchemaMismatch> {
    let answer = answer_root(raw);
    if kind.is_choice() {
        normalize_choice(options, answer, tolerance)
    } else {
        normalize_text(answer)
    }
}

/// Unwrap the `{data: ...}` envelope if present
fn answer_root(raw: &Value) -> &Value {
    match raw.get("data") {
        Some(Value::Array(items)) => items.first().unwrap_or(raw),
        Some(data @ Value::Object(_)) => data,
        _ => raw,
    }
}

fn field<'a>(answer: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .find_map(|key| answer.get(*key))
        .filter(|value| !value.is_null())
}

fn percentage_map(answer: &Value) -> Option<&Map<String, Value>> {
    field(answer, PERCENTAGE_FIELDS).and_then(Value::as_object)
}

fn normalize_choice(
    options: &AnswerOptions,
    answer: &Value,
    tolerance: f64,
) -> Result<NormalizedResult, SchemaMismatch> {
    let map = percentage_map(answer).ok_or(SchemaMismatch::MissingPercentages)?;

    let missing: Vec<String> = options
        .iter()
        .filter(|option| !map.contains_key(option.as_str()))
        .cloned()
        .collect();
    let unexpected: Vec<String> = map
        .keys()
        .filter(|key| !options.contains(key))
        .cloned()
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(SchemaMismatch::OptionMismatch {
            missing,
            unexpected,
        });
    }

    let mut percentages = IndexMap::with_capacity(options.len());
    for option in options {
        let value = map
            .get(option.as_str())
            .and_then(Value::as_f64)
            .ok_or_else(|| SchemaMismatch::NotANumber {
                option: option.clone(),
            })?;
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(SchemaMismatch::OutOfRange {
                option: option.clone(),
                value,
            });
        }
        percentages.insert(option.clone(), value);
    }

    let mut result = NormalizedResult::new(ResultPayload::Percentages(percentages));
    let sum = result.payload.percentage_sum().unwrap_or_default();
    if (sum - 1.0).abs() > tolerance {
        result
            .warnings
            .push(SchemaMismatch::SumOutOfTolerance { sum, tolerance });
    }
    Ok(result)
}

fn normalize_text(answer: &Value) -> Result<NormalizedResult, SchemaMismatch> {
    let texts: Vec<String> = match field(answer, TEXT_FIELDS) {
        Some(Value::String(text)) => vec![text.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => percentage_map(answer)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default(),
    };

    if texts.is_empty() {
        return Err(SchemaMismatch::MissingText);
    }
    Ok(NormalizedResult::new(ResultPayload::Text(texts)))
}
