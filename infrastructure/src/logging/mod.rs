//! Logging infrastructure: structured simulation event logging.
//!
//! Provides [`JsonlSimulationLogger`], a JSONL file writer that implements
//! the [`SimulationEventLogger`](survey_sim_application::SimulationEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSimulationLogger;
