//! Question domain.
//!
//! - [`kind::QuestionKind`]: single-choice, multiple-choice or free-text
//! - [`options::AnswerOptions`]: validated, ordered answer options
//! - [`request::SimulationRequest`]: a submission that passed shape validation
//! - [`entities::Question`]: a stored question

pub mod entities;
pub mod kind;
pub mod options;
pub mod request;
