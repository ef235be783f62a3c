//! Simulation store port
//!
//! Persistence for populations, questions and simulation results. Each
//! result row has a single writer (the use case that created it), so updates
//! are plain last-writer-wins.

use async_trait::async_trait;
use survey_sim_domain::{
    Population, PopulationId, Question, QuestionId, ResultId, SimulationResult,
};
use thiserror::Error;

/// Errors that can occur in the persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Record not found: {0}")]
    Missing(String),
}

#[async_trait]
pub trait SimulationStore: Send + Sync {
    // ==================== Populations ====================

    /// Insert or update; returns `true` when the population was created
    async fn upsert_population(&self, population: &Population) -> Result<bool, StoreError>;

    async fn get_population(&self, id: &PopulationId) -> Result<Option<Population>, StoreError>;

    /// All populations, oldest first
    async fn list_populations(&self) -> Result<Vec<Population>, StoreError>;

    /// Delete a population with its questions and results.
    ///
    /// Returns the number of questions removed, or `None` if the population
    /// did not exist.
    async fn delete_population(&self, id: &PopulationId) -> Result<Option<usize>, StoreError>;

    // ==================== Questions ====================

    async fn insert_question(&self, question: &Question) -> Result<(), StoreError>;

    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError>;

    /// Most recent questions first
    async fn recent_questions(&self, limit: usize) -> Result<Vec<Question>, StoreError>;

    /// Delete a question and its results; returns whether it existed
    async fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError>;

    // ==================== Results ====================

    async fn insert_result(&self, result: &SimulationResult) -> Result<(), StoreError>;

    /// Overwrite an existing result row; `StoreError::Missing` if absent
    async fn update_result(&self, result: &SimulationResult) -> Result<(), StoreError>;

    async fn get_result(&self, id: &ResultId) -> Result<Option<SimulationResult>, StoreError>;

    /// Results for a question, newest first
    async fn results_for_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Vec<SimulationResult>, StoreError>;

    async fn latest_result(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<SimulationResult>, StoreError> {
        Ok(self
            .results_for_question(question_id)
            .await?
            .into_iter()
            .next())
    }
}
