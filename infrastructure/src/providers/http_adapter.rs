//! Raw HTTP gateway
//!
//! Builds request bodies with `json!` and reads responses by navigating
//! `serde_json::Value`, without typed wire structs.

use crate::semilattice::protocol::{first_record, parse_status, record_error, string_field};
use crate::semilattice::{ApiSettings, HttpTransport};
use async_trait::async_trait;
use serde_json::{Value, json};
use survey_sim_application::ports::simulation_gateway::{
    GatewayError, RemotePopulation, SimulationGateway, StatusSnapshot, SubmittedJob,
};
use survey_sim_domain::{JobId, PopulationId, SimulationRequest};
use tracing::debug;

pub struct HttpSimulationGateway {
    transport: HttpTransport,
}

impl HttpSimulationGateway {
    pub fn new(settings: &ApiSettings) -> Result<Self, GatewayError> {
        Ok(Self {
            transport: HttpTransport::new(settings)?,
        })
    }
}

fn job_id_of(record: &Value) -> Result<JobId, GatewayError> {
    JobId::new(string_field(record, "id")?)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl SimulationGateway for HttpSimulationGateway {
    fn name(&self) -> &'static str {
        "http"
    }

    fn check_configuration(&self) -> Result<(), GatewayError> {
        self.transport.credentials().resolve().map(|_| ())
    }

    async fn submit(&self, request: &SimulationRequest) -> Result<SubmittedJob, GatewayError> {
        let mut answers = json!({
            "question": request.question_text(),
            "question_options": {"question_type": request.kind().as_str()},
        });
        if !request.options().is_empty() {
            answers["answer_options"] = json!(request.options().as_slice());
        }
        let body = json!({
            "population_id": request.population_id().as_str(),
            "answers": answers,
        });

        let response = self.transport.post(&["v1", "answers"], &body).await?;
        let record = first_record(&response)?;
        let job_id = job_id_of(record)?;
        let status = parse_status(string_field(record, "status")?)?;
        debug!("Job {} accepted with status {}", job_id, status);

        Ok(SubmittedJob {
            job_id,
            status,
            raw: record.clone(),
        })
    }

    async fn get_status(&self, job_id: &JobId) -> Result<StatusSnapshot, GatewayError> {
        let response = self
            .transport
            .get(&["v1", "answers", job_id.as_str()])
            .await?;
        let record = first_record(&response)?.clone();
        let status = parse_status(string_field(&record, "status")?)?;

        Ok(StatusSnapshot {
            job_id: job_id.clone(),
            status,
            error: record_error(&record),
            answer: record,
        })
    }

    async fn get_population(&self, id: &PopulationId) -> Result<RemotePopulation, GatewayError> {
        let response = self
            .transport
            .get(&["v1", "populations", id.as_str()])
            .await?;
        let record = first_record(&response)?;
        let remote_id = PopulationId::new(string_field(record, "id")?)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        let text = |name: &str| record.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(RemotePopulation {
            id: remote_id,
            name: text("name"),
            description: text("description"),
            raw: record.clone(),
        })
    }

    async fn test_population(&self, id: &PopulationId) -> Result<Value, GatewayError> {
        self.transport
            .post(&["v1", "populations", id.as_str(), "test"], &json!({}))
            .await
    }
}
