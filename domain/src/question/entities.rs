//! Question entity

use super::kind::QuestionKind;
use super::options::AnswerOptions;
use super::request::SimulationRequest;
use crate::core::ids::QuestionId;
use crate::population::entities::PopulationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question submitted against a population (Entity)
///
/// Created once per submission and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub population_id: PopulationId,
    pub text: String,
    pub kind: QuestionKind,
    pub options: AnswerOptions,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn from_request(request: &SimulationRequest) -> Self {
        Self {
            id: QuestionId::new(),
            population_id: request.population_id().clone(),
            text: request.question_text().to_string(),
            kind: request.kind(),
            options: request.options().clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_copies_fields() {
        let request = SimulationRequest::new(
            "pop-9",
            "Tea or coffee?",
            QuestionKind::SingleChoice,
            vec!["Tea".to_string(), "Coffee".to_string()],
        )
        .unwrap();
        let question = Question::from_request(&request);
        assert_eq!(question.population_id.as_str(), "pop-9");
        assert_eq!(question.text, "Tea or coffee?");
        assert_eq!(question.kind, QuestionKind::SingleChoice);
        assert_eq!(question.options.as_slice(), &["Tea", "Coffee"]);
    }
}
