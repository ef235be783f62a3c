//! Simulation result entity

use super::payload::{NormalizedResult, ResultPayload};
use super::status::SimulationStatus;
use crate::core::error::DomainError;
use crate::core::error_kind::ErrorKind;
use crate::core::ids::{QuestionId, ResultId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job identifier assigned by the remote service (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "job id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// Classified failure recorded on a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one simulation submission (Entity)
///
/// The status field is private: it only moves through
/// [`SimulationResult::advance_to`], [`SimulationResult::mark_predicted`] and
/// [`SimulationResult::mark_failed`], which enforce the monotonic lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub id: ResultId,
    pub question_id: QuestionId,
    pub job_id: Option<JobId>,
    status: SimulationStatus,
    pub payload: Option<ResultPayload>,
    /// Last raw response seen from the remote service
    pub raw_response: Option<serde_json::Value>,
    pub warnings: Vec<String>,
    pub failure: Option<SimulationFailure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SimulationResult {
    /// A fresh record in `Queued`, created before the job is submitted
    pub fn queued(question_id: QuestionId) -> Self {
        let now = Utc::now();
        Self {
            id: ResultId::new(),
            question_id,
            job_id: None,
            status: SimulationStatus::Queued,
            payload: None,
            raw_response: None,
            warnings: Vec::new(),
            failure: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record loaded from storage
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ResultId,
        question_id: QuestionId,
        job_id: Option<JobId>,
        status: SimulationStatus,
        payload: Option<ResultPayload>,
        raw_response: Option<serde_json::Value>,
        warnings: Vec<String>,
        failure: Option<SimulationFailure>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            question_id,
            job_id,
            status,
            payload,
            raw_response,
            warnings,
            failure,
            created_at,
            updated_at,
        }
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_complete(&self) -> bool {
        self.status == SimulationStatus::Predicted
    }

    pub fn assign_job(&mut self, job_id: JobId) {
        self.job_id = Some(job_id);
        self.touch();
    }

    /// Move to `next`; returns whether the status actually changed
    pub fn advance_to(&mut self, next: SimulationStatus) -> Result<bool, DomainError> {
        let next = self.status.transition_to(next)?;
        let changed = next != self.status;
        if changed {
            self.status = next;
            self.touch();
        }
        Ok(changed)
    }

    pub fn mark_predicted(&mut self, normalized: NormalizedResult) -> Result<(), DomainError> {
        self.advance_to(SimulationStatus::Predicted)?;
        self.warnings = normalized.warning_messages();
        self.payload = Some(normalized.payload);
        Ok(())
    }

    pub fn mark_failed(
        &mut self,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.advance_to(SimulationStatus::Failed)?;
        self.failure = Some(SimulationFailure {
            kind,
            message: message.into(),
        });
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
