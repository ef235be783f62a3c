//! Poll Simulation use case.
//!
//! Drives a submitted job to a terminal status by repeatedly asking the
//! gateway for its state, sleeping a fixed interval in between and giving up
//! once the wall-clock budget is spent.
//!
//! The poller never returns a non-terminal status: the result is either a
//! [`PollOutcome`] whose snapshot is `Predicted` or `Failed`, or a
//! [`PollError`].

use crate::config::PollParams;
use crate::ports::progress::SimulationProgressNotifier;
use crate::ports::simulation_gateway::{GatewayError, SimulationGateway, StatusSnapshot};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use survey_sim_domain::{JobId, SimulationStatus};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

fn status_label(status: &Option<SimulationStatus>) -> &'static str {
    status.map(|s| s.as_str()).unwrap_or("unknown")
}

/// Errors that end a poll without a terminal status.
#[derive(Error, Debug)]
pub enum PollError {
    #[error(
        "no terminal status after {:.1}s ({attempts} polls, last status: {})",
        .elapsed.as_secs_f64(),
        status_label(.last_status)
    )]
    Timeout {
        last_status: Option<SimulationStatus>,
        last_response: Option<Value>,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("status request failed after {attempts} polls: {source}")]
    Transport {
        #[source]
        source: GatewayError,
        last_status: Option<SimulationStatus>,
        attempts: u32,
    },

    #[error("polling interrupted by user after {attempts} polls")]
    Cancelled {
        last_status: Option<SimulationStatus>,
        attempts: u32,
    },
}

impl PollError {
    /// Last non-terminal status seen before the poll gave up
    pub fn last_status(&self) -> Option<SimulationStatus> {
        match self {
            PollError::Timeout { last_status, .. }
            | PollError::Transport { last_status, .. }
            | PollError::Cancelled { last_status, .. } => *last_status,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollError::Timeout { attempts, .. }
            | PollError::Transport { attempts, .. }
            | PollError::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn last_response(&self) -> Option<&Value> {
        match self {
            PollError::Timeout { last_response, .. } => last_response.as_ref(),
            _ => None,
        }
    }
}

/// A job that reached a terminal status.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// The terminal snapshot, payload included
    pub snapshot: StatusSnapshot,
    /// Distinct non-terminal statuses seen on the way, in order
    pub observed: Vec<SimulationStatus>,
    pub attempts: u32,
    pub elapsed: Duration,
}

impl PollOutcome {
    pub fn status(&self) -> SimulationStatus {
        self.snapshot.status
    }
}

/// Status poll loop over a [`SimulationGateway`].
pub struct SimulationPoller {
    gateway: Arc<dyn SimulationGateway>,
    cancellation_token: Option<CancellationToken>,
}

impl SimulationPoller {
    pub fn new(gateway: Arc<dyn SimulationGateway>) -> Self {
        Self {
            gateway,
            cancellation_token: None,
        }
    }

    /// Stop scheduling polls once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    /// Sleep for `pause`, returning `false` if cancelled meanwhile.
    async fn pause(&self, pause: Duration) -> bool {
        match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => false,
                    _ = tokio::time::sleep(pause) => true,
                }
            }
            None => {
                tokio::time::sleep(pause).await;
                true
            }
        }
    }

    /// Poll `job_id` until it is `Predicted` or `Failed`.
    pub async fn await_result(
        &self,
        job_id: &JobId,
        params: &PollParams,
        progress: &dyn SimulationProgressNotifier,
    ) -> Result<PollOutcome, PollError> {
        let started = Instant::now();
        let mut attempts = 0u32;
        let mut consecutive_failures = 0u32;
        let mut last_status = None;
        let mut last_response = None;
        let mut observed = Vec::new();

        debug!(
            "Polling job {} via {} (timeout {:?}, interval {:?})",
            job_id,
            self.gateway.name(),
            params.timeout,
            params.interval
        );

        while started.elapsed() < params.timeout {
            if self.is_cancelled() {
                return Err(PollError::Cancelled {
                    last_status,
                    attempts,
                });
            }

            attempts += 1;
            match self.gateway.get_status(job_id).await {
                Ok(snapshot) => {
                    consecutive_failures = 0;
                    debug!("Job {} poll #{}: {}", job_id, attempts, snapshot.status);
                    progress.on_poll(attempts, snapshot.status);

                    if snapshot.status.is_terminal() {
                        info!(
                            "Job {} reached {} after {} polls",
                            job_id, snapshot.status, attempts
                        );
                        return Ok(PollOutcome {
                            snapshot,
                            observed,
                            attempts,
                            elapsed: started.elapsed(),
                        });
                    }

                    if !observed.contains(&snapshot.status) {
                        observed.push(snapshot.status);
                    }
                    last_status = Some(snapshot.status);
                    last_response = Some(snapshot.answer);
                }
                Err(e) if e.is_retryable() && consecutive_failures < params.max_transport_retries => {
                    consecutive_failures += 1;
                    warn!(
                        "Status request for job {} failed ({}/{}), retrying: {}",
                        job_id, consecutive_failures, params.max_transport_retries, e
                    );
                    progress.on_transport_retry(consecutive_failures, params.max_transport_retries, &e);
                }
                Err(e) => {
                    warn!("Giving up on job {} after {} polls: {}", job_id, attempts, e);
                    return Err(PollError::Transport {
                        source: e,
                        last_status,
                        attempts,
                    });
                }
            }

            let remaining = params.timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            if !self.pause(params.interval.min(remaining)).await {
                return Err(PollError::Cancelled {
                    last_status,
                    attempts,
                });
            }
        }

        let elapsed = started.elapsed();
        warn!(
            "Job {} still {} after {:?} ({} polls)",
            job_id,
            status_label(&last_status),
            elapsed,
            attempts
        );
        Err(PollError::Timeout {
            last_status,
            last_response,
            attempts,
            elapsed,
        })
    }
}
