//! Typed resource client for the Semilattice API
//!
//! Mirrors the shape of the vendor SDK: `client.answers().simulate(..)`,
//! `client.answers().get(..)`, `client.populations().get(..)` and
//! `client.populations().test(..)`, each returning typed records decoded
//! from the response envelope.

use super::protocol::{AnswerRecord, Envelope, PopulationRecord, SimulateAnswerRequest};
use super::transport::{ApiSettings, HttpTransport};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use survey_sim_application::ports::simulation_gateway::GatewayError;

#[derive(Debug, Clone)]
pub struct SemilatticeClient {
    transport: HttpTransport,
}

impl SemilatticeClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, GatewayError> {
        Ok(Self {
            transport: HttpTransport::new(settings)?,
        })
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn answers(&self) -> Answers<'_> {
        Answers {
            transport: &self.transport,
        }
    }

    pub fn populations(&self) -> Populations<'_> {
        Populations {
            transport: &self.transport,
        }
    }
}

/// `/v1/answers` resource
pub struct Answers<'a> {
    transport: &'a HttpTransport,
}

impl Answers<'_> {
    pub async fn simulate(
        &self,
        request: &SimulateAnswerRequest,
    ) -> Result<AnswerRecord, GatewayError> {
        decode_first(self.transport.post(&["v1", "answers"], request).await?)
    }

    pub async fn get(&self, answer_id: &str) -> Result<AnswerRecord, GatewayError> {
        decode_first(self.transport.get(&["v1", "answers", answer_id]).await?)
    }
}

/// `/v1/populations` resource
pub struct Populations<'a> {
    transport: &'a HttpTransport,
}

impl Populations<'_> {
    pub async fn get(&self, population_id: &str) -> Result<PopulationRecord, GatewayError> {
        decode_first(
            self.transport
                .get(&["v1", "populations", population_id])
                .await?,
        )
    }

    /// Start an accuracy test; the response is returned as-is
    pub async fn test(&self, population_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .post(&["v1", "populations", population_id, "test"], &json!({}))
            .await
    }
}

fn decode_first<T: DeserializeOwned>(body: Value) -> Result<T, GatewayError> {
    let envelope: Envelope<T> = serde_json::from_value(body)
        .map_err(|e| GatewayError::MalformedResponse(format!("unexpected response shape: {e}")))?;
    envelope.into_first()
}
