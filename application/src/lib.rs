//! Application layer for survey-sim
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PollParams, SimulationParams};
pub use ports::{
    event_logger::{NoEventLogger, SimulationEvent, SimulationEventLogger},
    progress::{NoSimulationProgress, SimulationProgressNotifier},
    simulation_gateway::{
        GatewayError, RemotePopulation, SimulationGateway, StatusSnapshot, SubmittedJob,
    },
    simulation_store::{SimulationStore, StoreError},
};
pub use use_cases::manage_populations::{
    ManagePopulationsError, ManagePopulationsUseCase, Registration,
};
pub use use_cases::poll_simulation::{PollError, PollOutcome, SimulationPoller};
pub use use_cases::question_history::{
    DEFAULT_HISTORY_LIMIT, QuestionHistoryUseCase, QuestionSummary, ResultView,
};
pub use use_cases::refresh_result::{RefreshResultError, RefreshResultUseCase};
pub use use_cases::run_simulation::{
    OrchestrationError, RunSimulationError, RunSimulationInput, RunSimulationUseCase,
    SimulationReport,
};
