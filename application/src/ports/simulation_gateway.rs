//! Simulation gateway port
//!
//! Defines the interface for talking to the remote survey-simulation service.
//! Adapters (raw HTTP, SDK-style client) live in the infrastructure layer and
//! must be interchangeable: same success/failure contract, same status
//! vocabulary.

use async_trait::async_trait;
use serde_json::Value;
use survey_sim_domain::{JobId, PopulationId, SimulationRequest, SimulationStatus};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Credential or endpoint missing. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body was not JSON, or lacked the fields the contract promises
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The service answered 2xx but reported errors in its envelope
    #[error("API error: {}", .0.join("; "))]
    Api(Vec<String>),
}

impl GatewayError {
    /// Whether a poll loop may try again after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Configuration(_) => false,
            GatewayError::Http { status, .. } => !matches!(status, 400 | 401 | 403 | 404 | 422),
            GatewayError::Network(_) | GatewayError::MalformedResponse(_) | GatewayError::Api(_) => {
                true
            }
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedJob {
    pub job_id: JobId,
    pub status: SimulationStatus,
    pub raw: Value,
}

/// One observation of a remote job
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub job_id: JobId,
    pub status: SimulationStatus,
    /// The answer object as returned, unmodified. Normalization reads from here.
    pub answer: Value,
    /// Error message reported by the service for `Failed` jobs
    pub error: Option<String>,
}

/// Population metadata as known to the remote service
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePopulation {
    pub id: PopulationId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub raw: Value,
}

/// Gateway to the survey-simulation service
///
/// This port defines how the application layer reaches the remote API.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait SimulationGateway: Send + Sync {
    /// Short adapter name for logs ("http", "sdk")
    fn name(&self) -> &'static str;

    /// Fail fast when the credential is missing, before any I/O is attempted
    fn check_configuration(&self) -> Result<(), GatewayError>;

    /// Create a simulation job
    async fn submit(&self, request: &SimulationRequest) -> Result<SubmittedJob, GatewayError>;

    /// Fetch the current state of a job
    async fn get_status(&self, job_id: &JobId) -> Result<StatusSnapshot, GatewayError>;

    /// Fetch population metadata
    async fn get_population(&self, id: &PopulationId) -> Result<RemotePopulation, GatewayError>;

    /// Trigger the remote accuracy test for a population
    async fn test_population(&self, id: &PopulationId) -> Result<Value, GatewayError>;
}
