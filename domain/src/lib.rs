//! Domain layer for survey-sim
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Simulation lifecycle
//!
//! A [`Question`] asked of a [`Population`] becomes one remote simulation job.
//! Its [`SimulationResult`] moves monotonically through
//! `Queued → Running → Predicted`, or to `Failed` from any non-terminal state.
//!
//! ## Normalization
//!
//! Raw remote answers are mapped onto a single [`ResultPayload`] shape by
//! [`normalize`]: percentages keyed by the submitted options, or free text.

pub mod config;
pub mod core;
pub mod population;
pub mod question;
pub mod simulation;
pub mod util;

// Re-export commonly used types
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::{
    error::DomainError,
    error_kind::ErrorKind,
    ids::{QuestionId, ResultId},
};
pub use population::entities::{Population, PopulationId};
pub use question::{
    entities::Question, kind::QuestionKind, options::AnswerOptions, request::SimulationRequest,
};
pub use simulation::{
    entities::{JobId, SimulationFailure, SimulationResult},
    normalizer::{DEFAULT_SUM_TOLERANCE, normalize},
    payload::{NormalizedResult, ResultPayload, SchemaMismatch},
    status::SimulationStatus,
};
