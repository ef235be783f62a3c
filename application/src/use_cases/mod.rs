//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod manage_populations;
pub mod poll_simulation;
pub mod question_history;
pub mod refresh_result;
pub mod run_simulation;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
