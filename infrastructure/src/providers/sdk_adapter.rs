//! SDK-style gateway
//!
//! Goes through the typed [`SemilatticeClient`] resources and converts its
//! records into port types.

use crate::semilattice::protocol::{SimulateAnswerRequest, parse_status, record_error};
use crate::semilattice::{ApiSettings, SemilatticeClient};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use survey_sim_application::ports::simulation_gateway::{
    GatewayError, RemotePopulation, SimulationGateway, StatusSnapshot, SubmittedJob,
};
use survey_sim_domain::{JobId, PopulationId, SimulationRequest};
use tracing::debug;

pub struct SdkSimulationGateway {
    client: SemilatticeClient,
}

impl SdkSimulationGateway {
    pub fn new(settings: &ApiSettings) -> Result<Self, GatewayError> {
        Ok(Self {
            client: SemilatticeClient::new(settings)?,
        })
    }

    pub fn client(&self) -> &SemilatticeClient {
        &self.client
    }
}

fn to_raw<T: Serialize>(record: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(record).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

fn malformed(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::MalformedResponse(e.to_string())
}

#[async_trait]
impl SimulationGateway for SdkSimulationGateway {
    fn name(&self) -> &'static str {
        "sdk"
    }

    fn check_configuration(&self) -> Result<(), GatewayError> {
        self.client.transport().credentials().resolve().map(|_| ())
    }

    async fn submit(&self, request: &SimulationRequest) -> Result<SubmittedJob, GatewayError> {
        let record = self
            .client
            .answers()
            .simulate(&SimulateAnswerRequest::from(request))
            .await?;
        let job_id = JobId::new(record.id.clone()).map_err(malformed)?;
        let status = parse_status(&record.status)?;
        debug!("Job {} accepted with status {}", job_id, status);

        Ok(SubmittedJob {
            job_id,
            status,
            raw: to_raw(&record)?,
        })
    }

    async fn get_status(&self, job_id: &JobId) -> Result<StatusSnapshot, GatewayError> {
        let record = self.client.answers().get(job_id.as_str()).await?;
        let status = parse_status(&record.status)?;
        let answer = to_raw(&record)?;

        Ok(StatusSnapshot {
            job_id: job_id.clone(),
            status,
            error: record_error(&answer),
            answer,
        })
    }

    async fn get_population(&self, id: &PopulationId) -> Result<RemotePopulation, GatewayError> {
        let record = self.client.populations().get(id.as_str()).await?;

        Ok(RemotePopulation {
            id: PopulationId::new(record.id.clone()).map_err(malformed)?,
            name: record.name.clone(),
            description: record.description.clone(),
            raw: to_raw(&record)?,
        })
    }

    async fn test_population(&self, id: &PopulationId) -> Result<Value, GatewayError> {
        self.client.populations().test(id.as_str()).await
    }
}
