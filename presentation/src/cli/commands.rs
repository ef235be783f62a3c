//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use survey_sim_application::DEFAULT_HISTORY_LIMIT;
use survey_sim_domain::{OutputFormat, QuestionKind};

use super::options::collect_answer_options;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Human-readable text with percentage bars
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Kind of question to ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuestionKindArg {
    SingleChoice,
    MultipleChoice,
    FreeText,
}

impl From<QuestionKindArg> for QuestionKind {
    fn from(arg: QuestionKindArg) -> Self {
        match arg {
            QuestionKindArg::SingleChoice => QuestionKind::SingleChoice,
            QuestionKindArg::MultipleChoice => QuestionKind::MultipleChoice,
            QuestionKindArg::FreeText => QuestionKind::FreeText,
        }
    }
}

/// CLI arguments for survey-sim
#[derive(Parser, Debug)]
#[command(name = "survey-sim")]
#[command(author, version, about = "Ask simulated populations survey questions")]
#[command(long_about = r#"
survey-sim submits a survey question to the Semilattice population
simulation service, waits for the prediction and shows how the simulated
population would answer.

Choice questions return one percentage per answer option; free-text
questions return the simulated answer text. Every question and result is
kept in a local database so it can be inspected or refreshed later.

Configuration files are loaded from (in priority order):
1. SURVEY_SIM_<SECTION>__<KEY>              Environment variables
2. --config <path>                           Explicit config file
3. ./survey-sim.toml                         Project-level config
4. ~/.config/survey-sim/config.toml          Global config

The API key is read from SEMILATTICE_API_KEY unless configured otherwise.

Example:
  survey-sim population add pop-123 "US adults"
  survey-sim ask -p pop-123 -o Tea -o Coffee "Tea or coffee?"
  survey-sim ask -p pop-123 --kind free-text "Why do you drink coffee?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Output format (defaults to the configured format, then text)
    #[arg(long, value_enum, global = true)]
    pub output: Option<OutputFormatArg>,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a population a question and wait for the simulated answer
    Ask(AskArgs),

    /// Manage registered populations
    Population {
        #[command(subcommand)]
        action: PopulationCommand,
    },

    /// Inspect stored results
    Result {
        #[command(subcommand)]
        action: ResultCommand,
    },

    /// Show recently asked questions with their latest result
    History {
        /// Number of questions to show
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },

    /// Delete a question and all of its results
    Forget {
        /// Question id
        question_id: String,
    },

    /// Show configuration sources and problems
    Config,
}

impl Command {
    /// Whether the command talks to the remote service
    pub fn needs_api(&self) -> bool {
        match self {
            Command::Ask(_) => true,
            Command::Population { action } => matches!(
                action,
                PopulationCommand::Test { .. } | PopulationCommand::Show { remote: true, .. }
            ),
            Command::Result { action } => matches!(action, ResultCommand::Refresh { .. }),
            Command::History { .. } | Command::Forget { .. } | Command::Config => false,
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Population id to ask
    #[arg(short, long, value_name = "ID")]
    pub population: String,

    /// Question kind
    #[arg(short, long, value_enum, default_value_t = QuestionKindArg::SingleChoice)]
    pub kind: QuestionKindArg,

    /// Answer option (can be specified multiple times)
    #[arg(short = 'o', long = "option", value_name = "OPTION")]
    pub option: Vec<String>,

    /// Answer options separated by newlines or commas
    #[arg(long, value_name = "LIST")]
    pub options: Option<String>,

    /// Override the polling timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Override the configured transport ("http" or "sdk")
    #[arg(long, value_name = "KIND")]
    pub transport: Option<String>,
}

impl AskArgs {
    pub fn answer_options(&self) -> Vec<String> {
        collect_answer_options(&self.option, self.options.as_deref())
    }
}

#[derive(Subcommand, Debug)]
pub enum PopulationCommand {
    /// Register a population, or update its name and description
    Add {
        /// Remote population id
        id: String,
        /// Display name
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List registered populations
    List,

    /// Show a registered population
    Show {
        id: String,
        /// Also fetch the population's metadata from the remote service
        #[arg(long)]
        remote: bool,
    },

    /// Delete a population with all of its questions and results
    Remove { id: String },

    /// Trigger a remote accuracy test for a population
    Test { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ResultCommand {
    /// Show a stored result
    Show { id: String },

    /// Fetch the current status of a pending result once
    Refresh { id: String },
}
