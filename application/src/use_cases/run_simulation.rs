//! Run Simulation use case.
//!
//! The entry point consumed by the presentation layer: validates the
//! submission, records it, submits it, polls it to a terminal status,
//! normalizes the answer and persists the outcome.
//!
//! Every failure after the question is recorded leaves a `Failed` result row
//! with a classified [`ErrorKind`] and message; nothing is dropped silently
//! and nothing is deleted.

use crate::config::{PollParams, SimulationParams};
use crate::ports::event_logger::{NoEventLogger, SimulationEvent, SimulationEventLogger};
use crate::ports::progress::SimulationProgressNotifier;
use crate::ports::simulation_gateway::{GatewayError, SimulationGateway};
use crate::ports::simulation_store::{SimulationStore, StoreError};
use crate::use_cases::poll_simulation::{PollError, SimulationPoller};
use crate::use_cases::shared::{
    TerminalFailure, apply_observed, complete_from_snapshot, record_failure,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use survey_sim_domain::util::preview;
use survey_sim_domain::{
    DomainError, ErrorKind, Population, PopulationId, Question, QuestionKind, ResultId,
    SchemaMismatch, SimulationRequest, SimulationResult,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Errors that can occur while running a simulation.
#[derive(Error, Debug)]
pub enum RunSimulationError {
    #[error("Invalid submission: {0}")]
    Validation(#[source] DomainError),

    #[error("Polling timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Configuration error: {0}")]
    Configuration(#[source] GatewayError),

    #[error("Population not found: {0}")]
    PopulationNotFound(String),

    #[error("Transport error: {0}")]
    Transport(#[source] GatewayError),

    #[error("Simulation failed remotely: {0}")]
    RemoteFailure(String),

    #[error("Polling stopped: {0}")]
    Poll(#[source] PollError),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[source] SchemaMismatch),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RunSimulationError {
    /// The taxonomy kind the presentation layer renders.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunSimulationError::Validation(_) | RunSimulationError::ZeroTimeout => {
                ErrorKind::Validation
            }
            RunSimulationError::Configuration(_) => ErrorKind::Configuration,
            RunSimulationError::PopulationNotFound(_) => ErrorKind::NotFound,
            RunSimulationError::Transport(_) | RunSimulationError::RemoteFailure(_) => {
                ErrorKind::Transport
            }
            RunSimulationError::Poll(PollError::Timeout { .. }) => ErrorKind::Timeout,
            RunSimulationError::Poll(PollError::Transport { .. }) => ErrorKind::Transport,
            RunSimulationError::Poll(PollError::Cancelled { .. }) => ErrorKind::Cancelled,
            RunSimulationError::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            RunSimulationError::Storage(_) => ErrorKind::Persistence,
        }
    }
}

impl From<TerminalFailure> for RunSimulationError {
    fn from(failure: TerminalFailure) -> Self {
        match failure {
            TerminalFailure::Remote(message) => RunSimulationError::RemoteFailure(message),
            TerminalFailure::Schema(mismatch) => RunSimulationError::SchemaMismatch(mismatch),
        }
    }
}

/// A [`RunSimulationError`] together with the result row it was recorded on.
///
/// `result_id` is `None` when the run was rejected before anything was
/// persisted (validation, configuration, unknown population).
#[derive(Error, Debug)]
#[error("{error}")]
pub struct OrchestrationError {
    #[source]
    pub error: RunSimulationError,
    pub result_id: Option<ResultId>,
}

impl OrchestrationError {
    fn rejected(error: RunSimulationError) -> Self {
        Self {
            error,
            result_id: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Input for the [`RunSimulationUseCase`].
#[derive(Debug, Clone)]
pub struct RunSimulationInput {
    pub population_id: String,
    pub question_text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    /// Overrides the configured poll timeout
    pub timeout: Option<Duration>,
}

impl RunSimulationInput {
    pub fn new(
        population_id: impl Into<String>,
        question_text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
    ) -> Self {
        Self {
            population_id: population_id.into(),
            question_text: question_text.into(),
            kind,
            options,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A finished (`Predicted`) simulation, ready for display.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub population: Population,
    pub question: Question,
    pub result: SimulationResult,
    pub polls: u32,
    pub elapsed: Duration,
}

/// Use case for running one simulation end to end.
///
/// 1. Validate the submission into a [`SimulationRequest`]
/// 2. Check gateway configuration
/// 3. Resolve the population (locally, optionally remotely)
/// 4. Persist the question and a `Queued` result
/// 5. Submit, record the job id
/// 6. Poll to a terminal status, normalize, persist
pub struct RunSimulationUseCase {
    gateway: Arc<dyn SimulationGateway>,
    store: Arc<dyn SimulationStore>,
    params: SimulationParams,
    event_logger: Arc<dyn SimulationEventLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Clone for RunSimulationUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            store: self.store.clone(),
            params: self.params.clone(),
            event_logger: self.event_logger.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl RunSimulationUseCase {
    pub fn new(
        gateway: Arc<dyn SimulationGateway>,
        store: Arc<dyn SimulationStore>,
        params: SimulationParams,
    ) -> Self {
        Self {
            gateway,
            store,
            params,
            event_logger: Arc::new(NoEventLogger),
            cancellation_token: None,
        }
    }

    /// Create with a simulation event logger.
    pub fn with_event_logger(mut self, logger: Arc<dyn SimulationEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    /// Stop polling once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Run the simulation with progress callbacks.
    pub async fn execute(
        &self,
        input: RunSimulationInput,
        progress: &dyn SimulationProgressNotifier,
    ) -> Result<SimulationReport, OrchestrationError> {
        let request = SimulationRequest::new(
            &input.population_id,
            input.question_text,
            input.kind,
            input.options,
        )
        .map_err(|e| OrchestrationError::rejected(RunSimulationError::Validation(e)))?;

        let mut poll_params = self.params.poll.clone();
        if let Some(timeout) = input.timeout {
            poll_params.timeout = timeout;
        }
        if poll_params.timeout.is_zero() {
            return Err(OrchestrationError::rejected(RunSimulationError::ZeroTimeout));
        }

        self.gateway
            .check_configuration()
            .map_err(|e| OrchestrationError::rejected(RunSimulationError::Configuration(e)))?;

        let population = self
            .resolve_population(request.population_id())
            .await
            .map_err(OrchestrationError::rejected)?;

        info!(
            "Simulating {} question for {}: {}",
            request.kind(),
            population.label(),
            preview(request.question_text(), 80)
        );

        let question = Question::from_request(&request);
        self.store
            .insert_question(&question)
            .await
            .map_err(|e| OrchestrationError::rejected(e.into()))?;

        let mut result = SimulationResult::queued(question.id);
        self.store
            .insert_result(&result)
            .await
            .map_err(|e| OrchestrationError::rejected(e.into()))?;

        match self
            .drive(&request, &question, &mut result, &poll_params, progress)
            .await
        {
            Ok((polls, elapsed)) => {
                progress.on_finished(result.status());
                self.event_logger.log(SimulationEvent::new(
                    "completed",
                    json!({
                        "result_id": result.id.to_string(),
                        "job_id": result.job_id.as_ref().map(|j| j.as_str()),
                        "status": result.status().as_str(),
                        "polls": polls,
                        "elapsed_ms": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        "warnings": result.warnings,
                    }),
                ));
                Ok(SimulationReport {
                    population,
                    question,
                    result,
                    polls,
                    elapsed,
                })
            }
            Err(err) => Err(self.fail(&mut result, err, progress).await),
        }
    }

    async fn resolve_population(
        &self,
        id: &PopulationId,
    ) -> Result<Population, RunSimulationError> {
        if let Some(population) = self.store.get_population(id).await? {
            return Ok(population);
        }
        if !self.params.verify_remote_population {
            return Err(RunSimulationError::PopulationNotFound(id.to_string()));
        }

        info!("Population {} unknown locally, checking remote service", id);
        match self.gateway.get_population(id).await {
            Ok(remote) => {
                let mut population =
                    Population::new(remote.id, remote.name.unwrap_or_default());
                if let Some(description) = remote.description {
                    population = population.with_description(description);
                }
                self.store.upsert_population(&population).await?;
                Ok(population)
            }
            Err(e) if e.is_not_found() => Err(RunSimulationError::PopulationNotFound(id.to_string())),
            Err(e) => Err(RunSimulationError::Transport(e)),
        }
    }

    /// Submit and poll; on success `result` is `Predicted` and persisted.
    async fn drive(
        &self,
        request: &SimulationRequest,
        question: &Question,
        result: &mut SimulationResult,
        poll_params: &PollParams,
        progress: &dyn SimulationProgressNotifier,
    ) -> Result<(u32, Duration), RunSimulationError> {
        let submitted = self
            .gateway
            .submit(request)
            .await
            .map_err(RunSimulationError::Transport)?;

        info!("Submitted result {} as job {}", result.id, submitted.job_id);
        result.assign_job(submitted.job_id.clone());
        result.raw_response = Some(submitted.raw);
        apply_observed(result, submitted.status);
        self.store.update_result(result).await?;

        progress.on_submitted(&submitted.job_id, submitted.status);
        self.event_logger.log(SimulationEvent::new(
            "submitted",
            json!({
                "result_id": result.id.to_string(),
                "question_id": question.id.to_string(),
                "population_id": question.population_id.as_str(),
                "job_id": submitted.job_id.as_str(),
                "status": submitted.status.as_str(),
                "transport": self.gateway.name(),
            }),
        ));

        let mut poller = SimulationPoller::new(self.gateway.clone());
        if let Some(token) = &self.cancellation_token {
            poller = poller.with_cancellation(token.clone());
        }
        let outcome = poller
            .await_result(&submitted.job_id, poll_params, progress)
            .await
            .map_err(RunSimulationError::Poll)?;

        for status in &outcome.observed {
            if !apply_observed(result, *status) {
                continue;
            }
            self.store.update_result(result).await?;
            self.event_logger.log(SimulationEvent::new(
                "status_observed",
                json!({
                    "result_id": result.id.to_string(),
                    "status": status.as_str(),
                }),
            ));
        }

        complete_from_snapshot(result, question, &outcome.snapshot, &self.params)?;
        self.store.update_result(result).await?;

        info!(
            "Result {} is {} after {} polls",
            result.id,
            result.status(),
            outcome.attempts
        );
        Ok((outcome.attempts, outcome.elapsed))
    }

    /// Record `err` on the result row and wrap it for the caller.
    async fn fail(
        &self,
        result: &mut SimulationResult,
        err: RunSimulationError,
        progress: &dyn SimulationProgressNotifier,
    ) -> OrchestrationError {
        if let RunSimulationError::Poll(poll_err) = &err {
            if let Some(status) = poll_err.last_status() {
                apply_observed(result, status);
            }
            if let Some(raw) = poll_err.last_response() {
                result.raw_response = Some(raw.clone());
            }
        }

        let kind = err.kind();
        let message = err.to_string();
        error!("Result {} failed ({}): {}", result.id, kind, message);
        record_failure(result, kind, &message);

        if let Err(store_err) = self.store.update_result(result).await {
            warn!(
                "Could not persist failure of result {}: {}",
                result.id, store_err
            );
        }

        progress.on_finished(result.status());
        self.event_logger.log(SimulationEvent::new(
            "failed",
            json!({
                "result_id": result.id.to_string(),
                "job_id": result.job_id.as_ref().map(|j| j.as_str()),
                "kind": kind.as_str(),
                "message": message,
            }),
        ));

        OrchestrationError {
            error: err,
            result_id: Some(result.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoSimulationProgress;
    use crate::ports::simulation_gateway::RemotePopulation;
    use crate::use_cases::test_support::{
        InMemoryStore, ScriptedGateway, journal, snapshot, status_only,
    };
    use serde_json::json;
    use std::sync::Mutex;
    use survey_sim_domain::SimulationStatus;

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        store: Arc<InMemoryStore>,
        use_case: RunSimulationUseCase,
    }

    fn harness(
        gateway: ScriptedGateway,
        store: InMemoryStore,
        params: SimulationParams,
    ) -> Harness {
        let gateway = Arc::new(gateway);
        let store = Arc::new(store);
        let use_case = RunSimulationUseCase::new(gateway.clone(), store.clone(), params);
        Harness {
            gateway,
            store,
            use_case,
        }
    }

    fn ab_input() -> RunSimulationInput {
        RunSimulationInput::new(
            "pop-123",
            "A or B?",
            QuestionKind::SingleChoice,
            vec!["A".into(), "B".into()],
        )
    }

    #[derive(Default)]
    struct RecordingEvents {
        events: Mutex<Vec<&'static str>>,
    }

    impl SimulationEventLogger for RecordingEvents {
        fn log(&self, event: SimulationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_persists_predicted_result() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Running)))
                .then(Ok(snapshot(
                    "job-1",
                    SimulationStatus::Predicted,
                    json!({"data": {"id": "job-1", "status": "Predicted",
                        "simulated_answer_percentages": {"A": 0.6, "B": 0.4}}}),
                ))),
            InMemoryStore::new(journal.clone()).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );
        let events = Arc::new(RecordingEvents::default());
        let use_case = h.use_case.clone().with_event_logger(events.clone());

        let report = use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap();

        assert_eq!(report.result.status(), SimulationStatus::Predicted);
        assert_eq!(report.result.job_id.as_ref().unwrap().as_str(), "job-1");
        assert_eq!(report.polls, 2);
        let map = report.result.payload.as_ref().unwrap().percentages().unwrap();
        assert_eq!(map.get("A"), Some(&0.6));
        assert_eq!(map.get("B"), Some(&0.4));
        assert_eq!(map.len(), 2);

        let stored = h.store.results();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], report.result);
        assert_eq!(h.store.questions().len(), 1);

        // queued row exists before the network submission
        let journal = journal.lock().unwrap().clone();
        let submit_at = journal.iter().position(|e| e == "submit").unwrap();
        let queued_at = journal
            .iter()
            .position(|e| e == "insert_result:Queued")
            .unwrap();
        assert!(queued_at < submit_at);
        assert_eq!(journal.last().unwrap(), "update_result:Predicted");

        assert_eq!(
            *events.events.lock().unwrap(),
            vec!["submitted", "status_observed", "completed"]
        );
        assert_eq!(h.gateway.submitted.lock().unwrap()[0].population_id().as_str(), "pop-123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_writes_are_monotonic() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Running)))
                .then(Ok(status_only("job-1", SimulationStatus::Queued)))
                .then(Ok(snapshot(
                    "job-1",
                    SimulationStatus::Predicted,
                    json!({"simulated_answer_percentages": {"A": 0.5, "B": 0.5}}),
                ))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        h.use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap();

        let writes = h.store.writes.lock().unwrap().clone();
        assert_eq!(
            writes,
            vec![
                SimulationStatus::Queued,
                SimulationStatus::Queued,
                SimulationStatus::Running,
                SimulationStatus::Predicted
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_marks_result_failed() {
        let journal = journal();
        let params = SimulationParams::default().with_poll(
            PollParams::default()
                .with_timeout(Duration::from_secs(2))
                .with_interval(Duration::from_secs(1)),
        );
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Running))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            params,
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(h.gateway.calls("get_status"), 2);
        let stored = h.store.results();
        assert_eq!(err.result_id, Some(stored[0].id));
        assert_eq!(stored[0].status(), SimulationStatus::Failed);
        let failure = stored[0].failure.as_ref().unwrap();
        assert_eq!(failure.kind, ErrorKind::Timeout);
        assert!(failure.message.contains("no terminal status"));
        assert!(stored[0].raw_response.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_timeout_overrides_params() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Queued))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(
                ab_input().with_timeout(Duration::from_secs(3)),
                &NoSimulationProgress,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(h.gateway.calls("get_status"), 3);
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected_before_any_io() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Predicted))),
            InMemoryStore::new(journal.clone()).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(
                ab_input().with_timeout(Duration::ZERO),
                &NoSimulationProgress,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.result_id.is_none());
        assert!(journal.lock().unwrap().is_empty());
        assert!(h.store.results().is_empty());

        let zero_params = SimulationParams::default()
            .with_poll(PollParams::default().with_timeout(Duration::ZERO));
        let h = harness(
            ScriptedGateway::new(journal.clone()).accepting("job-1", SimulationStatus::Queued),
            InMemoryStore::new(journal.clone()).with_population("pop-123", "Panel"),
            zero_params,
        );
        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.gateway.calls("submit"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_transport_retries_mark_result_failed() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Err(GatewayError::Network("connection reset".into()))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        // first failure plus three retries
        assert_eq!(h.gateway.calls("get_status"), 4);
        let stored = h.store.results();
        assert_eq!(stored.len(), 1);
        assert_eq!(err.result_id, Some(stored[0].id));
        assert_eq!(stored[0].status(), SimulationStatus::Failed);
        assert_eq!(stored[0].job_id.as_ref().unwrap().as_str(), "job-1");
        let failure = stored[0].failure.as_ref().unwrap();
        assert_eq!(failure.kind, ErrorKind::Transport);
        assert!(failure.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_options_rejected_before_any_io() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone()).accepting("job-1", SimulationStatus::Queued),
            InMemoryStore::new(journal.clone()).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );
        let input = RunSimulationInput::new("pop-123", "A or B?", QuestionKind::SingleChoice, vec![]);

        let err = h
            .use_case
            .execute(input, &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.result_id.is_none());
        assert!(journal.lock().unwrap().is_empty());
        assert!(h.gateway.submitted.lock().unwrap().is_empty());
        assert!(h.store.results().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_before_any_io() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone()).unconfigured(),
            InMemoryStore::new(journal.clone()).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(journal.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_population_is_not_found() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone()),
            InMemoryStore::new(journal.clone()),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(h.gateway.calls("get_population"), 0);
        assert!(h.store.questions().is_empty());
    }

    #[tokio::test]
    async fn test_remote_verification_returns_not_found_on_404() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone()),
            InMemoryStore::new(journal.clone()),
            SimulationParams::default().with_verify_remote_population(true),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(h.gateway.calls("get_population"), 1);
        assert_eq!(h.gateway.calls("submit"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_verification_registers_population() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .with_remote_population(Ok(RemotePopulation {
                    id: PopulationId::new("pop-123").unwrap(),
                    name: Some("US adults".into()),
                    description: None,
                    raw: json!({}),
                }))
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(snapshot(
                    "job-1",
                    SimulationStatus::Predicted,
                    json!({"simulated_answer_percentages": {"A": 0.6, "B": 0.4}}),
                ))),
            InMemoryStore::new(journal),
            SimulationParams::default().with_verify_remote_population(true),
        );

        let report = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap();

        assert_eq!(report.population.name, "US adults");
        let stored = h
            .store
            .get_population(&PopulationId::new("pop-123").unwrap())
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_option_is_schema_mismatch() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(snapshot(
                    "job-1",
                    SimulationStatus::Predicted,
                    json!({"simulated_answer_percentages": {"A": 1.0}}),
                ))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        let stored = &h.store.results()[0];
        assert_eq!(stored.status(), SimulationStatus::Failed);
        assert!(stored.payload.is_none());
        assert_eq!(
            stored.raw_response,
            Some(json!({"simulated_answer_percentages": {"A": 1.0}}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_is_recorded() {
        let journal = journal();
        let mut failed = status_only("job-1", SimulationStatus::Failed);
        failed.error = Some("model unavailable".into());
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(status_only("job-1", SimulationStatus::Running)))
                .then(Ok(failed)),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert!(matches!(err.error, RunSimulationError::RemoteFailure(_)));
        let stored = &h.store.results()[0];
        assert_eq!(stored.status(), SimulationStatus::Failed);
        assert_eq!(stored.failure.as_ref().unwrap().message, "Simulation failed remotely: model unavailable");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_audit_row() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone()).rejecting(GatewayError::Http {
                status: 500,
                body: "boom".into(),
            }),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );

        let err = h
            .use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        let stored = &h.store.results()[0];
        assert!(stored.job_id.is_none());
        assert_eq!(stored.status(), SimulationStatus::Failed);
        assert!(stored.failure.as_ref().unwrap().message.contains("HTTP 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_marks_result_failed() {
        let journal = journal();
        let token = CancellationToken::new();
        token.cancel();
        let h = harness(
            ScriptedGateway::new(journal.clone()).accepting("job-1", SimulationStatus::Running),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );
        let use_case = h.use_case.clone().with_cancellation(token);

        let err = use_case
            .execute(ab_input(), &NoSimulationProgress)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(h.gateway.calls("get_status"), 0);
        let stored = &h.store.results()[0];
        assert_eq!(stored.status(), SimulationStatus::Failed);
        assert_eq!(stored.failure.as_ref().unwrap().kind, ErrorKind::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_text_answers_are_stored_verbatim() {
        let journal = journal();
        let h = harness(
            ScriptedGateway::new(journal.clone())
                .accepting("job-1", SimulationStatus::Queued)
                .then(Ok(snapshot(
                    "job-1",
                    SimulationStatus::Predicted,
                    json!({"simulated_answer_text": "  Because it is cheaper. "}),
                ))),
            InMemoryStore::new(journal).with_population("pop-123", "Panel"),
            SimulationParams::default(),
        );
        let input = RunSimulationInput::new("pop-123", "Why?", QuestionKind::FreeText, vec![]);

        let report = h
            .use_case
            .execute(input, &NoSimulationProgress)
            .await
            .unwrap();

        assert_eq!(
            report.result.payload.as_ref().unwrap().texts().unwrap(),
            &["  Because it is cheaper. ".to_string()]
        );
    }
}
