//! Presentation layer for survey-sim
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    AskArgs, Cli, Command, OutputFormatArg, PopulationCommand, QuestionKindArg, ResultCommand,
};
pub use cli::options::{collect_answer_options, parse_answer_options};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
