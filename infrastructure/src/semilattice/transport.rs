//! HTTP plumbing shared by both gateway adapters
//!
//! Builds URLs, attaches the bearer credential, maps transport failures onto
//! [`GatewayError`] and unwraps the `{data, errors}` envelope checks. Both
//! adapters go through here so they fail identically.

use super::credentials::ApiCredentials;
use super::protocol::envelope_errors;
use reqwest::Url;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use survey_sim_application::ports::simulation_gateway::GatewayError;
use survey_sim_domain::util::preview;
use tracing::debug;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.semilattice.ai";

/// Longest response body kept in an HTTP error
const ERROR_BODY_LIMIT: usize = 2000;

/// Connection settings for the remote API
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub credentials: ApiCredentials,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: ApiCredentials::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> Result<Self, GatewayError> {
        let base_url = settings.base_url.trim();
        if base_url.is_empty() {
            return Err(GatewayError::Configuration(
                "API base URL is empty".to_string(),
            ));
        }
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Configuration(format!("API base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Configuration(format!(
                "API base URL {base_url} cannot carry a path"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            credentials: settings.credentials.clone(),
        })
    }

    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// A segment is never split on `/`, so ids cannot climb out of their
    /// resource. Empty and dot segments are rejected.
    pub fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || matches!(**s, "." | ".."))
        {
            return Err(GatewayError::Configuration(format!(
                "invalid path segment {bad:?}"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::Configuration(format!(
                    "API base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str]) -> Result<Value, GatewayError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, GatewayError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, GatewayError> {
        let key = self.credentials.resolve()?;
        let response = request
            .bearer_auth(key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        if !status.is_success() {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: preview(&body, ERROR_BODY_LIMIT),
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON: {e}")))?;
        let errors = envelope_errors(&value);
        if !errors.is_empty() {
            return Err(GatewayError::Api(errors));
        }
        Ok(value)
    }
}

fn network_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Network(format!("request timed out: {error}"))
    } else {
        GatewayError::Network(error.to_string())
    }
}
