//! Shared utilities for use cases.
//!
//! Status application and terminal-snapshot handling used by both the run
//! and refresh use cases, so a job finished through either path ends in the
//! same persisted shape.

use crate::config::SimulationParams;
use crate::ports::simulation_gateway::StatusSnapshot;
use survey_sim_domain::{
    ErrorKind, Question, SchemaMismatch, SimulationResult, SimulationStatus, normalize,
};
use tracing::{debug, warn};

/// Why a terminal snapshot could not be stored as `Predicted`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TerminalFailure {
    /// The remote job itself failed
    Remote(String),
    /// The payload did not fit the submitted question
    Schema(SchemaMismatch),
}

impl TerminalFailure {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            TerminalFailure::Remote(_) => ErrorKind::Transport,
            TerminalFailure::Schema(_) => ErrorKind::SchemaMismatch,
        }
    }

    pub(crate) fn message(&self) -> String {
        match self {
            TerminalFailure::Remote(message) => message.clone(),
            TerminalFailure::Schema(mismatch) => mismatch.to_string(),
        }
    }
}

/// Move `result` forward to a non-terminal `status`; returns whether it changed.
///
/// Out-of-order observations (e.g. `Queued` after `Running`) are ignored.
pub(crate) fn apply_observed(result: &mut SimulationResult, status: SimulationStatus) -> bool {
    if status.is_terminal() {
        return false;
    }
    match result.advance_to(status) {
        Ok(changed) => changed,
        Err(e) => {
            debug!("Ignoring status {} for result {}: {}", status, result.id, e);
            false
        }
    }
}

/// Record a failure on `result` unless it is already terminal.
pub(crate) fn record_failure(result: &mut SimulationResult, kind: ErrorKind, message: &str) {
    if let Err(e) = result.mark_failed(kind, message) {
        warn!("Result {} already terminal, failure not recorded: {}", result.id, e);
    }
}

/// Apply a terminal snapshot: normalize on `Predicted`, report on `Failed`.
///
/// The raw answer is kept on the result in every case. On `Err` the caller
/// is expected to record the failure.
pub(crate) fn complete_from_snapshot(
    result: &mut SimulationResult,
    question: &Question,
    snapshot: &StatusSnapshot,
    params: &SimulationParams,
) -> Result<(), TerminalFailure> {
    result.raw_response = Some(snapshot.answer.clone());

    if snapshot.status == SimulationStatus::Failed {
        let message = snapshot
            .error
            .clone()
            .unwrap_or_else(|| format!("Simulation failed with status: {}", snapshot.status));
        return Err(TerminalFailure::Remote(message));
    }

    let normalized = normalize(
        question.kind,
        &question.options,
        &snapshot.answer,
        params.sum_tolerance,
    )
    .map_err(TerminalFailure::Schema)?;

    for warning in &normalized.warnings {
        warn!("Result {}: {}", result.id, warning);
    }
    if params.strict_schema
        && let Some(first) = normalized.warnings.first()
    {
        return Err(TerminalFailure::Schema(first.clone()));
    }

    if let Err(e) = result.mark_predicted(normalized) {
        warn!("Result {} already terminal, payload not recorded: {}", result.id, e);
    }
    Ok(())
}
