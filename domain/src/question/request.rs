//! Simulation request value object

use super::kind::QuestionKind;
use super::options::AnswerOptions;
use crate::core::error::DomainError;
use crate::population::entities::PopulationId;
use serde::{Deserialize, Serialize};

/// A simulation submission that passed shape validation
///
/// Transport adapters accept only this type, so a malformed submission is
/// rejected before any network call can be made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    population_id: PopulationId,
    question_text: String,
    kind: QuestionKind,
    options: AnswerOptions,
}

impl SimulationRequest {
    pub fn new(
        population_id: &str,
        question_text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
    ) -> Result<Self, DomainError> {
        let population_id = PopulationId::new(population_id)?;
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question text cannot be empty".to_string(),
            ));
        }
        let options = AnswerOptions::for_kind(kind, options)?;

        Ok(Self {
            population_id,
            question_text: question_text.trim().to_string(),
            kind,
            options,
        })
    }

    pub fn population_id(&self) -> &PopulationId {
        &self.population_id
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &AnswerOptions {
        &self.options
    }
}
