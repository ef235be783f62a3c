//! Refresh Result use case.
//!
//! One status request for a stored result: advances its status and, when the
//! job has finished, normalizes and persists the answer. Used to pick up jobs
//! whose original run timed out or was interrupted.

use crate::config::SimulationParams;
use crate::ports::simulation_gateway::{GatewayError, SimulationGateway};
use crate::ports::simulation_store::{SimulationStore, StoreError};
use crate::use_cases::shared::{apply_observed, complete_from_snapshot, record_failure};
use std::sync::Arc;
use survey_sim_domain::{ErrorKind, ResultId, SimulationResult};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RefreshResultError {
    #[error("Result not found: {0}")]
    ResultNotFound(ResultId),

    #[error("Question for result {0} is missing")]
    QuestionMissing(ResultId),

    #[error("Result {0} was never accepted by the remote service")]
    NotSubmitted(ResultId),

    #[error("Status request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RefreshResultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefreshResultError::ResultNotFound(_) | RefreshResultError::QuestionMissing(_) => {
                ErrorKind::NotFound
            }
            RefreshResultError::NotSubmitted(_) => ErrorKind::Validation,
            RefreshResultError::Gateway(GatewayError::Configuration(_)) => ErrorKind::Configuration,
            RefreshResultError::Gateway(_) => ErrorKind::Transport,
            RefreshResultError::Storage(_) => ErrorKind::Persistence,
        }
    }
}

pub struct RefreshResultUseCase {
    gateway: Arc<dyn SimulationGateway>,
    store: Arc<dyn SimulationStore>,
    params: SimulationParams,
}

impl RefreshResultUseCase {
    pub fn new(
        gateway: Arc<dyn SimulationGateway>,
        store: Arc<dyn SimulationStore>,
        params: SimulationParams,
    ) -> Self {
        Self {
            gateway,
            store,
            params,
        }
    }

    /// Fetch the job status once and persist whatever changed.
    ///
    /// Terminal results are returned untouched without a remote call.
    pub async fn execute(&self, id: &ResultId) -> Result<SimulationResult, RefreshResultError> {
        let mut result = self
            .store
            .get_result(id)
            .await?
            .ok_or(RefreshResultError::ResultNotFound(*id))?;
        if result.is_terminal() {
            return Ok(result);
        }

        let job_id = result
            .job_id
            .clone()
            .ok_or(RefreshResultError::NotSubmitted(*id))?;
        let question = self
            .store
            .get_question(&result.question_id)
            .await?
            .ok_or(RefreshResultError::QuestionMissing(*id))?;

        self.gateway.check_configuration()?;
        let snapshot = self.gateway.get_status(&job_id).await?;

        if snapshot.status.is_terminal() {
            if let Err(failure) =
                complete_from_snapshot(&mut result, &question, &snapshot, &self.params)
            {
                warn!("Result {} failed on refresh: {}", id, failure.message());
                record_failure(&mut result, failure.kind(), &failure.message());
            }
        } else {
            apply_observed(&mut result, snapshot.status);
            result.raw_response = Some(snapshot.answer);
        }

        self.store.update_result(&result).await?;
        info!("Refreshed result {}: {}", id, result.status());
        Ok(result)
    }
}
