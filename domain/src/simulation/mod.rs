//! Simulation domain.
//!
//! - [`status::SimulationStatus`]: remote lifecycle state machine
//! - [`entities::SimulationResult`]: the persisted outcome of one submission
//! - [`payload::ResultPayload`]: normalized percentages or text
//! - [`normalizer::normalize`]: raw remote payload → [`payload::NormalizedResult`]

pub mod entities;
pub mod normalizer;
pub mod payload;
pub mod status;
