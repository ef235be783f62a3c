//! Port for structured simulation event logging.
//!
//! Defines the [`SimulationEventLogger`] trait for recording the lifecycle of
//! each simulation (submission, observed statuses, completion, failure) to a
//! structured audit log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! record (JSONL) of every job the tool has driven.

use serde_json::Value;

/// A structured simulation event for logging.
pub struct SimulationEvent {
    /// Event type identifier (e.g., "submitted", "status_observed", "failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SimulationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging simulation events.
///
/// `log` is synchronous and infallible; sinks swallow their own I/O errors.
pub trait SimulationEventLogger: Send + Sync {
    fn log(&self, event: SimulationEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoEventLogger;

impl SimulationEventLogger for NoEventLogger {
    fn log(&self, _event: SimulationEvent) {}
}
