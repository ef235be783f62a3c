//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`PollParams`]: poll loop control (timeout, interval, transport retries)
//! - [`SimulationParams`]: orchestration policy (schema strictness, remote checks)

pub mod poll_params;
pub mod simulation_params;

pub use poll_params::PollParams;
pub use simulation_params::SimulationParams;
