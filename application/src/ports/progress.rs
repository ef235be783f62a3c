//! Progress notification port
//!
//! Defines the interface for reporting progress while a simulation is
//! submitted and polled.

use super::simulation_gateway::GatewayError;
use survey_sim_domain::{JobId, SimulationStatus};

/// Callback for progress updates during a simulation run
///
/// Implementations live in the presentation layer (spinner, plain log lines).
pub trait SimulationProgressNotifier: Send + Sync {
    /// Called once the remote service has accepted the job
    fn on_submitted(&self, job_id: &JobId, status: SimulationStatus);

    /// Called after each successful status poll
    fn on_poll(&self, attempt: u32, status: SimulationStatus);

    /// Called when a terminal status was reached or polling gave up
    fn on_finished(&self, status: SimulationStatus);

    /// Called when a transient transport error will be retried
    fn on_transport_retry(&self, _retry: u32, _max_retries: u32, _error: &GatewayError) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoSimulationProgress;

impl SimulationProgressNotifier for NoSimulationProgress {
    fn on_submitted(&self, _job_id: &JobId, _status: SimulationStatus) {}
    fn on_poll(&self, _attempt: u32, _status: SimulationStatus) {}
    fn on_finished(&self, _status: SimulationStatus) {}
}
