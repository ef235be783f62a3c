//! Wire format of the Semilattice API
//!
//! Requests are typed structs; responses arrive in a `{data, errors}`
//! envelope where `data` is either one record or a list of records.
//! Status strings are the exact tags `Queued`, `Running`, `Predicted`,
//! `Failed` and are parsed case-sensitively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_sim_application::ports::simulation_gateway::GatewayError;
use survey_sim_domain::{SimulationRequest, SimulationStatus};

// ==================== Requests ====================

/// `POST /v1/answers` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateAnswerRequest {
    pub population_id: String,
    pub answers: AnswerSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSpec {
    pub question: String,
    pub question_options: QuestionOptions,
    /// Omitted for free-text questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOptions {
    /// `single-choice`, `multiple-choice` or `free-text`
    pub question_type: String,
}

impl From<&SimulationRequest> for SimulateAnswerRequest {
    fn from(request: &SimulationRequest) -> Self {
        let options = request.options();
        Self {
            population_id: request.population_id().as_str().to_string(),
            answers: AnswerSpec {
                question: request.question_text().to_string(),
                question_options: QuestionOptions {
                    question_type: request.kind().as_str().to_string(),
                },
                answer_options: if options.is_empty() {
                    None
                } else {
                    Some(options.as_slice().to_vec())
                },
            },
        }
    }
}

// ==================== Responses ====================

/// Response envelope; `data` may hold one record or a list
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<OneOrMany<T>>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Envelope<T> {
    /// The first record, or a malformed-response error when there is none
    pub fn into_first(self) -> Result<T, GatewayError> {
        match self.data {
            Some(OneOrMany::One(record)) => Ok(record),
            Some(OneOrMany::Many(records)) => records
                .into_iter()
                .next()
                .ok_or_else(|| GatewayError::MalformedResponse("empty data list".to_string())),
            None => Err(GatewayError::MalformedResponse(
                "response has no data".to_string(),
            )),
        }
    }
}

/// One answer (simulation job) as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: String,
    pub status: String,
    #[serde(
        default,
        alias = "simulatedAnswerPercentages",
        skip_serializing_if = "Option::is_none"
    )]
    pub simulated_answer_percentages: Option<IndexMap<String, Value>>,
    /// A string or an object with a `message`; read through [`record_error`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Fields this client does not model, kept for the raw response
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Population metadata as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ==================== Untyped helpers ====================

/// Map a status tag onto the state machine; unknown tags are malformed.
pub fn parse_status(raw: &str) -> Result<SimulationStatus, GatewayError> {
    raw.parse()
        .map_err(|_| GatewayError::MalformedResponse(format!("unknown status {raw:?}")))
}

/// Messages from a non-empty `errors` array
pub fn envelope_errors(body: &Value) -> Vec<String> {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return Vec::new();
    };
    errors
        .iter()
        .map(|error| match error {
            Value::String(message) => message.clone(),
            other => other
                .get("message")
                .or_else(|| other.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        })
        .collect()
}

/// The record inside `data` (object, or first element of a list)
pub fn first_record(body: &Value) -> Result<&Value, GatewayError> {
    match body.get("data") {
        Some(record @ Value::Object(_)) => Ok(record),
        Some(Value::Array(items)) => items
            .first()
            .filter(|item| item.is_object())
            .ok_or_else(|| GatewayError::MalformedResponse("empty data list".to_string())),
        _ => Err(GatewayError::MalformedResponse(
            "response has no data".to_string(),
        )),
    }
}

/// A required string field of a record
pub fn string_field<'a>(record: &'a Value, name: &str) -> Result<&'a str, GatewayError> {
    record
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GatewayError::MalformedResponse(format!("record has no {name:?}")))
}

/// Error message of a failed record, if the service gave one.
///
/// Accepts `error`, `errorMessage` or `error_message`, each either a plain
/// string or an object carrying `message` (or `detail`).
pub fn record_error(record: &Value) -> Option<String> {
    ["error", "errorMessage", "error_message"]
        .iter()
        .filter_map(|name| record.get(*name))
        .find_map(|field| match field {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::Object(_) => field
                .get("message")
                .or_else(|| field.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
}
