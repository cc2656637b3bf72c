use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::RoutingConfig;
use crate::error::{Error, ProviderError, Result};
use crate::ors::request::DirectionsRequest;
use crate::request::RoutingProfile;

const ACCEPT_JSON: &str = "application/json, application/geo+json";

/// Something that can answer a directions request.
///
/// The production implementation is [`OrsClient`]; tests substitute spies.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Issue one directions call and return the raw success body.
    async fn directions(
        &self,
        profile: RoutingProfile,
        request: &DirectionsRequest,
    ) -> std::result::Result<Value, ProviderError>;
}

/// HTTP client for the openrouteservice directions API.
///
/// One call per request: no retries, no caching.
#[derive(Clone)]
pub struct OrsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OrsClient {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, profile: RoutingProfile) -> String {
        format!("{}/{}", self.base_url, profile.as_str())
    }
}

impl std::fmt::Debug for OrsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DirectionsProvider for OrsClient {
    async fn directions(
        &self,
        profile: RoutingProfile,
        request: &DirectionsRequest,
    ) -> std::result::Result<Value, ProviderError> {
        let url = self.endpoint(profile);
        debug!(url = %url, "calling routing provider");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, ACCEPT_JSON)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "failed to reach routing provider");
                ProviderError::Transport(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = provider_error_message(status, &text);
            error!(
                url = %url,
                status = status.as_u16(),
                message = %message,
                "routing provider returned an error"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            error!(url = %url, error = %e, "failed to parse routing provider response");
            e
        })?;
        Ok(body)
    }
}

/// Recover a human-readable message from a provider error body.
///
/// Understands `{"error":{"message":..}}`, `{"error":".."}` and
/// `{"message":".."}`. Anything else falls back to the status code.
pub fn provider_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| extract_message(&value))
        .unwrap_or_else(|| format!("routing provider returned status {}", status.as_u16()))
}

fn extract_message(value: &Value) -> Option<String> {
    match value.get("error") {
        Some(Value::String(message)) => return Some(message.clone()),
        Some(Value::Object(detail)) => {
            if let Some(message) = detail.get("message").and_then(Value::as_str) {
                return Some(message.to_string());
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn user_agent() -> String {
    format!("campusnav-lib/{}", env!("CARGO_PKG_VERSION"))
}
