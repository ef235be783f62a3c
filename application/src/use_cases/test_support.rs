//! Hand-written port doubles shared by the use case tests.

use crate::ports::simulation_gateway::{
    GatewayError, RemotePopulation, SimulationGateway, StatusSnapshot, SubmittedJob,
};
use crate::ports::simulation_store::{SimulationStore, StoreError};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use survey_sim_domain::{
    JobId, Population, PopulationId, Question, QuestionId, ResultId, SimulationRequest,
    SimulationResult, SimulationStatus,
};

/// Ordered record of port calls, shared between doubles
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn job(id: &str) -> JobId {
    JobId::new(id).unwrap()
}

pub(crate) fn snapshot(job_id: &str, status: SimulationStatus, answer: Value) -> StatusSnapshot {
    StatusSnapshot {
        job_id: job(job_id),
        status,
        answer,
        error: None,
    }
}

pub(crate) fn status_only(job_id: &str, status: SimulationStatus) -> StatusSnapshot {
    snapshot(job_id, status, json!({"id": job_id, "status": status.as_str()}))
}

// ==================== Gateway ====================

pub(crate) struct ScriptedGateway {
    pub configured: bool,
    submit: Mutex<Option<Result<SubmittedJob, GatewayError>>>,
    statuses: Mutex<VecDeque<Result<StatusSnapshot, GatewayError>>>,
    /// Replayed once the scripted statuses run out
    last_status: Mutex<Option<Result<StatusSnapshot, GatewayError>>>,
    population: Mutex<Option<Result<RemotePopulation, GatewayError>>>,
    pub submitted: Mutex<Vec<SimulationRequest>>,
    pub journal: Journal,
}

impl ScriptedGateway {
    pub fn new(journal: Journal) -> Self {
        Self {
            configured: true,
            submit: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(None),
            population: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn accepting(self, job_id: &str, status: SimulationStatus) -> Self {
        *self.submit.lock().unwrap() = Some(Ok(SubmittedJob {
            job_id: job(job_id),
            status,
            raw: json!({"data": [{"id": job_id, "status": status.as_str()}], "errors": []}),
        }));
        self
    }

    pub fn rejecting(self, error: GatewayError) -> Self {
        *self.submit.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn then(self, response: Result<StatusSnapshot, GatewayError>) -> Self {
        self.statuses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_remote_population(self, response: Result<RemotePopulation, GatewayError>) -> Self {
        *self.population.lock().unwrap() = Some(response);
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.journal
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.as_str() == name)
            .count()
    }

    fn record(&self, entry: &str) {
        self.journal.lock().unwrap().push(entry.to_string());
    }
}

#[async_trait]
impl SimulationGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn check_configuration(&self) -> Result<(), GatewayError> {
        if self.configured {
            Ok(())
        } else {
            Err(GatewayError::Configuration(
                "SEMILATTICE_API_KEY is not set".to_string(),
            ))
        }
    }

    async fn submit(&self, request: &SimulationRequest) -> Result<SubmittedJob, GatewayError> {
        self.record("submit");
        self.submitted.lock().unwrap().push(request.clone());
        self.submit
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted submission".into())))
    }

    async fn get_status(&self, _job_id: &JobId) -> Result<StatusSnapshot, GatewayError> {
        self.record("get_status");
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(response) => {
                *self.last_status.lock().unwrap() = Some(response.clone());
                response
            }
            None => self
                .last_status
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(GatewayError::Network("no scripted status".into()))),
        }
    }

    async fn get_population(&self, id: &PopulationId) -> Result<RemotePopulation, GatewayError> {
        self.record("get_population");
        self.population.lock().unwrap().clone().unwrap_or_else(|| {
            Err(GatewayError::Http {
                status: 404,
                body: format!("population {id} not found"),
            })
        })
    }

    async fn test_population(&self, id: &PopulationId) -> Result<Value, GatewayError> {
        self.record("test_population");
        Ok(json!({"data": {"population_id": id.as_str(), "status": "Queued"}}))
    }
}

// ==================== Store ====================

#[derive(Default)]
struct Tables {
    populations: Vec<Population>,
    questions: Vec<Question>,
    results: Vec<SimulationResult>,
}

pub(crate) struct InMemoryStore {
    tables: Mutex<Tables>,
    /// Status of every result write, in order
    pub writes: Mutex<Vec<SimulationStatus>>,
    pub journal: Journal,
}

impl InMemoryStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            writes: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn with_population(self, id: &str, name: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .populations
            .push(Population::new(PopulationId::new(id).unwrap(), name));
        self
    }

    pub fn results(&self) -> Vec<SimulationResult> {
        self.tables.lock().unwrap().results.clone()
    }

    pub fn questions(&self) -> Vec<Question> {
        self.tables.lock().unwrap().questions.clone()
    }

    pub fn insert_result_sync(&self, result: SimulationResult) {
        self.tables.lock().unwrap().results.push(result);
    }

    pub fn insert_question_sync(&self, question: Question) {
        self.tables.lock().unwrap().questions.push(question);
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl SimulationStore for InMemoryStore {
    async fn upsert_population(&self, population: &Population) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.populations.iter_mut().find(|p| p.id == population.id) {
            Some(existing) => {
                existing.name = population.name.clone();
                existing.description = population.description.clone();
                Ok(false)
            }
            None => {
                tables.populations.push(population.clone());
                Ok(true)
            }
        }
    }

    async fn get_population(&self, id: &PopulationId) -> Result<Option<Population>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.populations.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_populations(&self) -> Result<Vec<Population>, StoreError> {
        Ok(self.tables.lock().unwrap().populations.clone())
    }

    async fn delete_population(&self, id: &PopulationId) -> Result<Option<usize>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.populations.len();
        tables.populations.retain(|p| &p.id != id);
        if tables.populations.len() == before {
            return Ok(None);
        }
        let doomed: Vec<QuestionId> = tables
            .questions
            .iter()
            .filter(|q| &q.population_id == id)
            .map(|q| q.id)
            .collect();
        tables.questions.retain(|q| !doomed.contains(&q.id));
        tables.results.retain(|r| !doomed.contains(&r.question_id));
        Ok(Some(doomed.len()))
    }

    async fn insert_question(&self, question: &Question) -> Result<(), StoreError> {
        self.record("insert_question".to_string());
        self.tables.lock().unwrap().questions.push(question.clone());
        Ok(())
    }

    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.questions.iter().find(|q| &q.id == id).cloned())
    }

    async fn recent_questions(&self, limit: usize) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.questions.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.questions.len();
        tables.questions.retain(|q| &q.id != id);
        tables.results.retain(|r| &r.question_id != id);
        Ok(tables.questions.len() != before)
    }

    async fn insert_result(&self, result: &SimulationResult) -> Result<(), StoreError> {
        self.record(format!("insert_result:{}", result.status()));
        self.writes.lock().unwrap().push(result.status());
        self.tables.lock().unwrap().results.push(result.clone());
        Ok(())
    }

    async fn update_result(&self, result: &SimulationResult) -> Result<(), StoreError> {
        self.record(format!("update_result:{}", result.status()));
        self.writes.lock().unwrap().push(result.status());
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .results
            .iter_mut()
            .find(|r| r.id == result.id)
            .ok_or_else(|| StoreError::Missing(result.id.to_string()))?;
        *slot = result.clone();
        Ok(())
    }

    async fn get_result(&self, id: &ResultId) -> Result<Option<SimulationResult>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.results.iter().find(|r| &r.id == id).cloned())
    }

    async fn results_for_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Vec<SimulationResult>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .results
            .iter()
            .rev()
            .filter(|r| &r.question_id == question_id)
            .cloned()
            .collect())
    }
}
