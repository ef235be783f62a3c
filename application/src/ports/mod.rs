//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod event_logger;
pub mod progress;
pub mod simulation_gateway;
pub mod simulation_store;
