//! Question History use case.
//!
//! Read-side views over past submissions, and removal of a question with its
//! results.

use crate::ports::simulation_store::{SimulationStore, StoreError};
use std::sync::Arc;
use survey_sim_domain::{Question, QuestionId, ResultId, SimulationResult};
use tracing::info;

/// Number of questions shown when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// A question with its most recent result
#[derive(Debug, Clone)]
pub struct QuestionSummary {
    pub question: Question,
    pub latest: Option<SimulationResult>,
}

/// A stored result with the question it answers
#[derive(Debug, Clone)]
pub struct ResultView {
    pub question: Question,
    pub result: SimulationResult,
}

pub struct QuestionHistoryUseCase {
    store: Arc<dyn SimulationStore>,
}

impl QuestionHistoryUseCase {
    pub fn new(store: Arc<dyn SimulationStore>) -> Self {
        Self { store }
    }

    /// Most recent questions first, each with its latest result.
    pub async fn recent(&self, limit: usize) -> Result<Vec<QuestionSummary>, StoreError> {
        let questions = self.store.recent_questions(limit).await?;
        let mut summaries = Vec::with_capacity(questions.len());
        for question in questions {
            let latest = self.store.latest_result(&question.id).await?;
            summaries.push(QuestionSummary { question, latest });
        }
        Ok(summaries)
    }

    pub async fn result(&self, id: &ResultId) -> Result<Option<ResultView>, StoreError> {
        let Some(result) = self.store.get_result(id).await? else {
            return Ok(None);
        };
        let question = self
            .store
            .get_question(&result.question_id)
            .await?
            .ok_or_else(|| StoreError::Corrupt {
                id: id.to_string(),
                reason: format!("question {} is missing", result.question_id),
            })?;
        Ok(Some(ResultView { question, result }))
    }

    /// Delete a question and its results; returns whether it existed.
    pub async fn forget(&self, id: &QuestionId) -> Result<bool, StoreError> {
        let removed = self.store.delete_question(id).await?;
        if removed {
            info!("Deleted question {}", id);
        }
        Ok(removed)
    }
}
