//! Simulation parameters: orchestration policy.

use super::poll_params::PollParams;
use serde::{Deserialize, Serialize};
use survey_sim_domain::DEFAULT_SUM_TOLERANCE;

/// Parameters shared by the run and refresh use cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub poll: PollParams,
    /// Allowed distance of a percentage sum from 1.0.
    pub sum_tolerance: f64,
    /// Treat soft schema warnings as failures.
    pub strict_schema: bool,
    /// Look unknown populations up remotely before rejecting them.
    pub verify_remote_population: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            poll: PollParams::default(),
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
            strict_schema: false,
            verify_remote_population: false,
        }
    }
}

impl SimulationParams {
    // ==================== Builder Methods ====================

    pub fn with_poll(mut self, poll: PollParams) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Self {
        self.sum_tolerance = tolerance;
        self
    }

    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    pub fn with_verify_remote_population(mut self, verify: bool) -> Self {
        self.verify_remote_population = verify;
        self
    }
}
