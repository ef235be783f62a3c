//! Command dispatch and dependency wiring

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use survey_sim_application::{
    GatewayError, ManagePopulationsError, ManagePopulationsUseCase, NoSimulationProgress,
    OrchestrationError, QuestionHistoryUseCase, RefreshResultError, RefreshResultUseCase,
    RunSimulationInput, RunSimulationUseCase, SimulationEventLogger, SimulationGateway,
    SimulationProgressNotifier, SimulationStore, StoreError,
};
use survey_sim_domain::{DomainError, ErrorKind, OutputFormat, QuestionId, ResultId};
use survey_sim_infrastructure::{
    ConfigLoader, FileConfig, JsonlSimulationLogger, SqliteSimulationStore, TransportKind,
    build_gateway,
};
use survey_sim_presentation::{
    AskArgs, Command, ConsoleFormatter, PopulationCommand, ProgressReporter, ResultCommand,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A classified command failure, ready to be rendered
#[derive(Debug)]
pub struct Failure {
    pub kind: ErrorKind,
    pub detail: String,
    pub result_id: Option<ResultId>,
}

impl Failure {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            result_id: None,
        }
    }
}

impl From<OrchestrationError> for Failure {
    fn from(e: OrchestrationError) -> Self {
        Self {
            kind: e.kind(),
            detail: e.error.to_string(),
            result_id: e.result_id,
        }
    }
}

impl From<ManagePopulationsError> for Failure {
    fn from(e: ManagePopulationsError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<RefreshResultError> for Failure {
    fn from(e: RefreshResultError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        Self::new(ErrorKind::Persistence, e.to_string())
    }
}

impl From<GatewayError> for Failure {
    fn from(e: GatewayError) -> Self {
        let kind = match e {
            GatewayError::Configuration(_) => ErrorKind::Configuration,
            _ => ErrorKind::Transport,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<DomainError> for Failure {
    fn from(e: DomainError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

pub struct App {
    config: FileConfig,
    format: OutputFormat,
    quiet: bool,
    cancellation: CancellationToken,
}

impl App {
    pub fn new(
        config: FileConfig,
        format: OutputFormat,
        quiet: bool,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            config,
            format,
            quiet,
            cancellation,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub async fn run(&self, command: Command) -> Result<(), Failure> {
        match command {
            Command::Ask(args) => self.ask(args).await,
            Command::Population { action } => self.population(action).await,
            Command::Result { action } => self.result(action).await,
            Command::History { limit } => {
                let history = QuestionHistoryUseCase::new(self.store()?);
                let summaries = history.recent(limit).await?;
                self.emit(
                    || ConsoleFormatter::format_history(&summaries),
                    || ConsoleFormatter::history_json(&summaries),
                );
                Ok(())
            }
            Command::Forget { question_id } => {
                let id: QuestionId = question_id.parse()?;
                let history = QuestionHistoryUseCase::new(self.store()?);
                if !history.forget(&id).await? {
                    return Err(Failure::new(
                        ErrorKind::NotFound,
                        format!("question {id} not found"),
                    ));
                }
                self.emit(
                    || format!("Deleted question {id} and its results.\n"),
                    || json!({"deleted": id}),
                );
                Ok(())
            }
            Command::Config => {
                self.show_config();
                Ok(())
            }
        }
    }

    // ==================== Wiring ====================

    fn store(&self) -> Result<Arc<dyn SimulationStore>, Failure> {
        let path = self.config.storage.resolved_path().ok_or_else(|| {
            Failure::new(
                ErrorKind::Configuration,
                "cannot determine a data directory, set storage.path",
            )
        })?;
        Ok(Arc::new(SqliteSimulationStore::open(path)?))
    }

    fn gateway(&self, transport: Option<&str>) -> Result<Arc<dyn SimulationGateway>, Failure> {
        let kind = match transport {
            Some(raw) => raw.parse::<TransportKind>().map_err(|e| {
                Failure::new(ErrorKind::Configuration, format!("--transport: {e}"))
            })?,
            None => self.config.api.parse_transport().0,
        };
        debug!(transport = %kind, "Building simulation gateway");
        Ok(build_gateway(kind, &self.config.api.to_api_settings())?)
    }

    /// A gateway whose credential is known to resolve
    fn checked_gateway(
        &self,
        transport: Option<&str>,
    ) -> Result<Arc<dyn SimulationGateway>, Failure> {
        let gateway = self.gateway(transport)?;
        gateway.check_configuration()?;
        Ok(gateway)
    }

    fn event_logger(&self) -> Option<Arc<dyn SimulationEventLogger>> {
        let path = self.config.logging.event_log_path()?;
        match JsonlSimulationLogger::new(&path) {
            Some(logger) => Some(Arc::new(logger)),
            None => {
                warn!("Event log {} could not be opened", path.display());
                None
            }
        }
    }

    fn progress(&self) -> Box<dyn SimulationProgressNotifier> {
        if self.quiet || self.format == OutputFormat::Json || !self.config.output.progress {
            Box::new(NoSimulationProgress)
        } else {
            Box::new(ProgressReporter::new())
        }
    }

    fn emit(&self, text: impl FnOnce() -> String, value: impl FnOnce() -> serde_json::Value) {
        match self.format {
            OutputFormat::Text => print!("{}", text()),
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&value())),
        }
    }

    // ==================== Commands ====================

    async fn ask(&self, args: AskArgs) -> Result<(), Failure> {
        let gateway = self.checked_gateway(args.transport.as_deref())?;
        let store = self.store()?;

        let mut use_case =
            RunSimulationUseCase::new(gateway, store, self.config.to_simulation_params())
                .with_cancellation(self.cancellation.clone());
        if let Some(logger) = self.event_logger() {
            use_case = use_case.with_event_logger(logger);
        }

        let mut input = RunSimulationInput::new(
            args.population.clone(),
            args.question.clone(),
            args.kind.into(),
            args.answer_options(),
        );
        if let Some(secs) = args.timeout {
            input = input.with_timeout(Duration::from_secs(secs));
        }

        let progress = self.progress();
        let report = use_case.execute(input, progress.as_ref()).await?;
        self.emit(
            || ConsoleFormatter::format_report(&report),
            || ConsoleFormatter::report_json(&report),
        );
        Ok(())
    }

    async fn population(&self, action: PopulationCommand) -> Result<(), Failure> {
        let needs_api = matches!(
            action,
            PopulationCommand::Test { .. } | PopulationCommand::Show { remote: true, .. }
        );
        let gateway = if needs_api {
            self.checked_gateway(None)?
        } else {
            self.gateway(None)?
        };
        let populations = ManagePopulationsUseCase::new(gateway, self.store()?);

        match action {
            PopulationCommand::Add {
                id,
                name,
                description,
            } => {
                let registration = populations
                    .register(&id, &name, description.as_deref())
                    .await?;
                let verb = if registration.created { "Registered" } else { "Updated" };
                self.emit(
                    || format!("{} population {}\n", verb, registration.population.label()),
                    || json!({"created": registration.created, "population": registration.population}),
                );
            }
            PopulationCommand::List => {
                let list = populations.list().await?;
                self.emit(
                    || ConsoleFormatter::format_populations(&list),
                    || json!(list),
                );
            }
            PopulationCommand::Show { id, remote } => {
                let population = populations.get(&id).await?;
                let details = if remote {
                    Some(populations.remote_details(&id).await?)
                } else {
                    None
                };
                self.emit(
                    || ConsoleFormatter::format_population(&population, details.as_ref()),
                    || json!({"population": population, "remote": details.as_ref().map(|d| &d.raw)}),
                );
            }
            PopulationCommand::Remove { id } => {
                let removed = populations.remove(&id).await?;
                self.emit(
                    || format!("Deleted population {id} and {removed} question(s).\n"),
                    || json!({"deleted": id, "questions_removed": removed}),
                );
            }
            PopulationCommand::Test { id } => {
                let response = populations.run_accuracy_test(&id).await?;
                self.emit(
                    || {
                        format!(
                            "Accuracy test requested for {id}:\n{}\n",
                            ConsoleFormatter::indent(&ConsoleFormatter::format_json(&response), "  ")
                        )
                    },
                    || response.clone(),
                );
            }
        }
        Ok(())
    }

    async fn result(&self, action: ResultCommand) -> Result<(), Failure> {
        let store = self.store()?;
        let history = QuestionHistoryUseCase::new(store.clone());

        let id: ResultId = match &action {
            ResultCommand::Show { id } | ResultCommand::Refresh { id } => id.parse()?,
        };
        if let ResultCommand::Refresh { .. } = action {
            let refresh = RefreshResultUseCase::new(
                self.checked_gateway(None)?,
                store,
                self.config.to_simulation_params(),
            );
            refresh.execute(&id).await?;
        }

        let view = history
            .result(&id)
            .await?
            .ok_or_else(|| Failure::new(ErrorKind::NotFound, format!("result {id} not found")))?;
        self.emit(
            || ConsoleFormatter::format_result(&view.question, &view.result),
            || ConsoleFormatter::result_json(&view.question, &view.result),
        );
        Ok(())
    }

    fn show_config(&self) {
        let sources = ConfigLoader::config_sources(None);
        let issues = self.config.validate();
        let credentials = self.config.api.credentials();
        let store_path = self.config.storage.resolved_path();
        let mut effective = self.config.clone();
        if effective.api.api_key.is_some() {
            effective.api.api_key = Some("<redacted>".to_string());
        }

        self.emit(
            || {
                let mut out = String::from("Configuration sources (in priority order):\n");
                for source in &sources {
                    let mark = if source.found { "FOUND" } else { "     " };
                    out.push_str(&format!("  [{mark}] {:<8} {}\n", source.label, source.location));
                }
                out.push_str(&format!(
                    "\nAPI key ({}): {}\n",
                    credentials.env_var(),
                    if credentials.is_available() { "available" } else { "missing" }
                ));
                if let Some(path) = &store_path {
                    out.push_str(&format!("Database: {}\n", path.display()));
                }
                if issues.is_empty() {
                    out.push_str("\nNo configuration issues.\n");
                } else {
                    out.push_str("\nIssues:\n");
                    for issue in &issues {
                        let level = if issue.is_error() { "error" } else { "warning" };
                        out.push_str(&format!("  {level}: {}\n", issue.message));
                    }
                }
                out
            },
            || {
                json!({
                    "sources": sources.iter().map(|s| json!({
                        "label": s.label,
                        "location": s.location,
                        "found": s.found,
                    })).collect::<Vec<_>>(),
                    "api_key_available": credentials.is_available(),
                    "database": store_path.as_ref().map(|p| p.display().to_string()),
                    "issues": issues.iter().map(|i| json!({
                        "error": i.is_error(),
                        "message": i.message,
                    })).collect::<Vec<_>>(),
                    "effective": effective,
                })
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_sim_application::RunSimulationError;

    #[test]
    fn test_gateway_failures_are_classified() {
        let failure = Failure::from(GatewayError::Configuration("no key".to_string()));
        assert_eq!(failure.kind, ErrorKind::Configuration);
        let failure = Failure::from(GatewayError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(failure.kind, ErrorKind::Transport);
    }

    #[test]
    fn test_orchestration_failure_keeps_result_id() {
        let id = ResultId::new();
        let failure = Failure::from(OrchestrationError {
            error: RunSimulationError::RemoteFailure("model unavailable".to_string()),
            result_id: Some(id),
        });
        assert_eq!(failure.kind, ErrorKind::Transport);
        assert_eq!(failure.result_id, Some(id));
        assert!(failure.detail.contains("model unavailable"));
    }

    #[test]
    fn test_bad_identifier_is_validation() {
        let failure = Failure::from("not-a-uuid".parse::<ResultId>().unwrap_err());
        assert_eq!(failure.kind, ErrorKind::Validation);
    }
}
