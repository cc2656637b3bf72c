//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair_defaults_configured: Option<bool>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            provider_base_url: None,
            wheelchair_defaults_configured: None,
        }
    }

    pub fn ready(service: &str, version: &str, base_url: &str, defaults_configured: bool) -> Self {
        Self {
            provider_base_url: Some(base_url.to_string()),
            wheelchair_defaults_configured: Some(defaults_configured),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`: the process is up.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`: configuration is usable.
///
/// The provider itself is not contacted; a probe should not spend API quota.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"campusnav-service-shared","version":"0.1.0",
///  "provider_base_url":"https://api.openrouteservice.org/v2/directions",
///  "wheelchair_defaults_configured":false}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if state.provider_base_url().is_empty() {
        let status = HealthStatus::not_ready(service, version, "provider base URL not configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(
        service,
        version,
        state.provider_base_url(),
        state.has_wheelchair_defaults(),
    );
    (StatusCode::OK, Json(status)).into_response()
}
