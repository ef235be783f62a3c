//! Simulation status state machine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a remote simulation job
///
/// The variant names are the exact strings of the remote contract
/// (`Queued`, `Running`, `Predicted`, `Failed`). They are never lowercased
/// and parsing is case-sensitive.
///
/// ```text
/// Queued ──▶ Running ──▶ Predicted
///    │          │
///    └──────────┴──────▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SimulationStatus {
    #[default]
    Queued,
    Running,
    Predicted,
    Failed,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Queued => "Queued",
            SimulationStatus::Running => "Running",
            SimulationStatus::Predicted => "Predicted",
            SimulationStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SimulationStatus::Predicted | SimulationStatus::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            SimulationStatus::Queued => 0,
            SimulationStatus::Running => 1,
            SimulationStatus::Predicted | SimulationStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    ///
    /// Staying in the same non-terminal status is allowed (a poll that
    /// observed no change). Skipping forward is allowed because a poll may
    /// never observe `Running`. Nothing leaves a terminal status.
    pub fn can_transition_to(&self, next: SimulationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next.rank() >= self.rank()
    }

    /// Validate a transition, returning the illegal pair as an error
    pub fn transition_to(&self, next: SimulationStatus) -> Result<SimulationStatus, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::IllegalTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SimulationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Queued" => Ok(SimulationStatus::Queued),
            "Running" => Ok(SimulationStatus::Running),
            "Predicted" => Ok(SimulationStatus::Predicted),
            "Failed" => Ok(SimulationStatus::Failed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
