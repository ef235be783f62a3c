//! Gateway adapters for the simulation service
//!
//! Two interchangeable implementations of
//! [`SimulationGateway`]:
//!
//! - [`http_adapter::HttpSimulationGateway`]: raw requests over `serde_json::Value`
//! - [`sdk_adapter::SdkSimulationGateway`]: typed resource client
//!
//! Which one is used is decided once, at construction time, from
//! `api.transport` in the configuration.

pub mod http_adapter;
pub mod sdk_adapter;

use crate::semilattice::ApiSettings;
use http_adapter::HttpSimulationGateway;
use sdk_adapter::SdkSimulationGateway;
use std::str::FromStr;
use std::sync::Arc;
use survey_sim_application::ports::simulation_gateway::{GatewayError, SimulationGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Http,
    Sdk,
}

impl TransportKind {
    pub const ALL: [TransportKind; 2] = [TransportKind::Http, TransportKind::Sdk];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Http => "http",
            TransportKind::Sdk => "sdk",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "raw" => Ok(TransportKind::Http),
            "sdk" | "client" => Ok(TransportKind::Sdk),
            other => Err(format!("unknown transport: {other}")),
        }
    }
}

/// Construct the gateway selected by `kind`.
pub fn build_gateway(
    kind: TransportKind,
    settings: &ApiSettings,
) -> Result<Arc<dyn SimulationGateway>, GatewayError> {
    Ok(match kind {
        TransportKind::Http => Arc::new(HttpSimulationGateway::new(settings)?),
        TransportKind::Sdk => Arc::new(SdkSimulationGateway::new(settings)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semilattice::ApiCredentials;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::net::SocketAddr;
    use std::sync::Mutex;
    use std::time::Duration;
    use survey_sim_domain::{JobId, PopulationId, QuestionKind, SimulationRequest, SimulationStatus};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct Recorded {
        auth: Mutex<Vec<String>>,
        bodies: Mutex<Vec<Value>>,
        seen_ids: Mutex<Vec<String>>,
    }

    fn record_auth(state: &Recorded, headers: &HeaderMap) {
        if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            state.auth.lock().unwrap().push(value.to_string());
        }
    }

    async fn simulate(
        State(state): State<Arc<Recorded>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        record_auth(&state, &headers);
        state.bodies.lock().unwrap().push(body);
        Json(json!({"data": [{"id": "job-1", "status": "Queued"}], "errors": []}))
    }

    async fn answer(
        State(state): State<Arc<Recorded>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Response {
        record_auth(&state, &headers);
        state.seen_ids.lock().unwrap().push(id.clone());
        match id.as_str() {
            "job-1" => Json(json!({
                "data": {
                    "id": "job-1",
                    "status": "Predicted",
                    "simulated_answer_percentages": {"A": 0.6, "B": 0.4},
                    "population": "pop-123"
                },
                "errors": []
            }))
            .into_response(),
            "job-running" => {
                Json(json!({"data": [{"id": "job-running", "status": "Running"}]})).into_response()
            }
            "job-failed" => Json(json!({
                "data": {"id": "job-failed", "status": "Failed", "error": "model unavailable"}
            }))
            .into_response(),
            "job-failed-object" => Json(json!({
                "data": {
                    "id": "job-failed-object",
                    "status": "Failed",
                    "error": {"code": "E1", "message": "population too small"}
                }
            }))
            .into_response(),
            "job-failed-alias" => Json(json!({
                "data": [{
                    "id": "job-failed-alias",
                    "status": "Failed",
                    "error_message": "model unavailable"
                }]
            }))
            .into_response(),
            "job-errors" => {
                Json(json!({"data": null, "errors": [{"message": "quota exceeded"}]})).into_response()
            }
            "job-lowercase" => {
                Json(json!({"data": {"id": "job-lowercase", "status": "predicted"}})).into_response()
            }
            "job-garbage" => (StatusCode::OK, "<html>oops</html>").into_response(),
            "job-busy" => (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "not found"}))).into_response(),
        }
    }

    async fn population(Path(id): Path<String>) -> Response {
        if id == "pop-123" {
            Json(json!({"data": {"id": "pop-123", "name": "US adults", "size": 500}}))
                .into_response()
        } else {
            (StatusCode::NOT_FOUND, "no such population").into_response()
        }
    }

    async fn population_test(Path(id): Path<String>) -> Json<Value> {
        Json(json!({"data": {"population_id": id, "status": "Queued"}, "errors": []}))
    }

    async fn spawn_server() -> (SocketAddr, Arc<Recorded>) {
        let state = Arc::new(Recorded::default());
        let app = Router::new()
            .route("/v1/answers", post(simulate))
            .route("/v1/answers/:id", get(answer))
            .route("/v1/populations/:id", get(population))
            .route("/v1/populations/:id/test", post(population_test))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, state)
    }

    fn settings(addr: SocketAddr) -> ApiSettings {
        ApiSettings {
            base_url: format!("http://{addr}"),
            credentials: ApiCredentials::fixed("sk-test"),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn job(id: &str) -> JobId {
        JobId::new(id).unwrap()
    }

    #[test]
    fn test_transport_kind_parse() {
        assert_eq!("http".parse::<TransportKind>().unwrap(), TransportKind::Http);
        assert_eq!(" SDK ".parse::<TransportKind>().unwrap(), TransportKind::Sdk);
        assert!("grpc".parse::<TransportKind>().is_err());
        assert_eq!(TransportKind::default(), TransportKind::Http);
    }

    #[tokio::test]
    async fn test_both_adapters_submit_identically() {
        let (addr, state) = spawn_server().await;
        let request = SimulationRequest::new(
            "pop-123",
            "A or B?",
            QuestionKind::SingleChoice,
            vec!["A".into(), "B".into()],
        )
        .unwrap();

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();
            assert_eq!(gateway.name(), kind.as_str());
            let submitted = gateway.submit(&request).await.unwrap();
            assert_eq!(submitted.job_id, job("job-1"), "{kind}");
            assert_eq!(submitted.status, SimulationStatus::Queued, "{kind}");
        }

        let bodies = state.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[0]["answers"]["answer_options"], json!(["A", "B"]));
        assert_eq!(
            *state.auth.lock().unwrap(),
            vec!["Bearer sk-test".to_string(), "Bearer sk-test".to_string()]
        );
    }

    #[tokio::test]
    async fn test_both_adapters_read_status_identically() {
        let (addr, _) = spawn_server().await;

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();

            let done = gateway.get_status(&job("job-1")).await.unwrap();
            assert_eq!(done.status, SimulationStatus::Predicted, "{kind}");
            assert_eq!(done.answer["simulated_answer_percentages"]["A"], 0.6, "{kind}");
            assert_eq!(done.answer["population"], "pop-123", "{kind}");

            let running = gateway.get_status(&job("job-running")).await.unwrap();
            assert_eq!(running.status, SimulationStatus::Running, "{kind}");

            let failed = gateway.get_status(&job("job-failed")).await.unwrap();
            assert_eq!(failed.status, SimulationStatus::Failed, "{kind}");
            assert_eq!(failed.error.as_deref(), Some("model unavailable"), "{kind}");

            let failed = gateway.get_status(&job("job-failed-object")).await.unwrap();
            assert_eq!(failed.status, SimulationStatus::Failed, "{kind}");
            assert_eq!(failed.error.as_deref(), Some("population too small"), "{kind}");
            assert_eq!(failed.answer["error"]["code"], "E1", "{kind}");

            let failed = gateway.get_status(&job("job-failed-alias")).await.unwrap();
            assert_eq!(failed.status, SimulationStatus::Failed, "{kind}");
            assert_eq!(failed.error.as_deref(), Some("model unavailable"), "{kind}");
        }
    }

    #[tokio::test]
    async fn test_both_adapters_keep_ids_inside_their_path_segment() {
        let (addr, state) = spawn_server().await;
        let sneaky = PopulationId::new("pop-1/../../answers/job-1?x=").unwrap();

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();
            let err = gateway.get_population(&sneaky).await.unwrap_err();
            assert!(err.is_not_found(), "{kind}: {err}");

            let err = gateway
                .get_status(&job("job-1/../../populations/pop-123"))
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{kind}: {err}");
        }
        let expected = "job-1/../../populations/pop-123".to_string();
        assert_eq!(
            *state.seen_ids.lock().unwrap(),
            vec![expected.clone(), expected]
        );
    }

    #[tokio::test]
    async fn test_both_adapters_classify_failures_identically() {
        let (addr, _) = spawn_server().await;

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();

            let err = gateway.get_status(&job("job-missing")).await.unwrap_err();
            assert!(err.is_not_found(), "{kind}: {err}");

            let err = gateway.get_status(&job("job-busy")).await.unwrap_err();
            assert_eq!(
                err,
                GatewayError::Http {
                    status: 503,
                    body: "try later".into()
                },
                "{kind}"
            );

            let err = gateway.get_status(&job("job-garbage")).await.unwrap_err();
            assert!(matches!(err, GatewayError::MalformedResponse(_)), "{kind}: {err}");

            let err = gateway.get_status(&job("job-lowercase")).await.unwrap_err();
            assert!(matches!(err, GatewayError::MalformedResponse(_)), "{kind}: {err}");

            let err = gateway.get_status(&job("job-errors")).await.unwrap_err();
            assert_eq!(err, GatewayError::Api(vec!["quota exceeded".into()]), "{kind}");
        }
    }

    #[tokio::test]
    async fn test_both_adapters_handle_populations() {
        let (addr, _) = spawn_server().await;
        let known = PopulationId::new("pop-123").unwrap();
        let unknown = PopulationId::new("pop-404").unwrap();

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();

            let remote = gateway.get_population(&known).await.unwrap();
            assert_eq!(remote.name.as_deref(), Some("US adults"), "{kind}");
            assert_eq!(remote.raw["size"], 500, "{kind}");

            let err = gateway.get_population(&unknown).await.unwrap_err();
            assert!(err.is_not_found(), "{kind}");

            let test = gateway.test_population(&known).await.unwrap();
            assert_eq!(test["data"]["population_id"], "pop-123", "{kind}");
        }
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_request() {
        let (addr, state) = spawn_server().await;
        let settings = ApiSettings {
            credentials: ApiCredentials::from_env("SURVEY_SIM_TEST_KEY_THAT_IS_NEVER_SET"),
            ..settings(addr)
        };

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings).unwrap();
            assert!(matches!(
                gateway.check_configuration(),
                Err(GatewayError::Configuration(_))
            ));
            let err = gateway.get_status(&job("job-1")).await.unwrap_err();
            assert!(matches!(err, GatewayError::Configuration(_)), "{kind}");
        }
        assert!(state.auth.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        for kind in TransportKind::ALL {
            let gateway = build_gateway(kind, &settings(addr)).unwrap();
            let err = gateway.get_status(&job("job-1")).await.unwrap_err();
            assert!(matches!(err, GatewayError::Network(_)), "{kind}: {err}");
            assert!(err.is_retryable());
        }
    }
}
