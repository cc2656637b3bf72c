//! Campus navigation route HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - compute an accessible route (also mounted at `/route`)
//! - `GET /metrics` - Prometheus metrics (path configurable)
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - readiness probe
//!
//! # Request
//!
//! ```json
//! {
//!   "start": [-97.7333, 30.2672],
//!   "end": [-97.7300, 30.2700],
//!   "mode": "wheelchair",
//!   "options": { "wheelchair": { "avoidSteps": true, "maximum_gradient": 0.06 } }
//! }
//! ```
//!
//! Success is a GeoJSON `FeatureCollection`; failures are
//! `{ "error": "...", "request_id": "..." }` with status 400 or 500.

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use campusnav_service_shared::{
    AppState, ErrorResponse, MetricsLayer, RequestId, from_lib_error, health_live, health_ready,
    metrics_handler, record_provider_latency, record_route_calculated, record_route_failed,
    record_route_points,
};

pub const ROUTE_PATH: &str = "/api/v1/route";
pub const ROUTE_ALIAS_PATH: &str = "/route";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

const MSG_INVALID_JSON: &str = "request body must be valid JSON";

/// Build the service router.
pub fn app(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route(ROUTE_PATH, post(route_handler))
        .route(ROUTE_ALIAS_PATH, post(route_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle `POST /api/v1/route`.
///
/// The body is taken as raw bytes so a malformed payload produces the same
/// `{ "error": .. }` shape as every other validation failure.
async fn route_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "route request body is not JSON");
            record_route_failed("invalid_json");
            return ErrorResponse::bad_request(MSG_INVALID_JSON)
                .with_request_id(request_id.as_str())
                .into_response();
        }
    };

    info!(
        request_id = %request_id,
        mode = body.get("mode").and_then(serde_json::Value::as_str).unwrap_or("wheelchair"),
        "handling route request"
    );

    let plan = match state.routing().route(&body).await {
        Ok(plan) => plan,
        Err(e) => {
            if e.is_client_error() {
                warn!(request_id = %request_id, error = %e, "route request rejected");
            } else {
                error!(request_id = %request_id, error = %e, reason = e.reason(), "route calculation failed");
            }
            record_route_failed(e.reason());
            return from_lib_error(&e, request_id.as_str()).into_response();
        }
    };

    let profile = plan.profile.as_str();
    let points = plan.point_count();
    record_route_calculated(profile);
    record_route_points(points, profile);
    record_provider_latency(plan.provider_latency, profile);

    info!(
        request_id = %request_id,
        profile = profile,
        points = points,
        provider_latency_ms = plan.provider_latency.as_millis() as u64,
        "route computed successfully"
    );

    (StatusCode::OK, Json(plan.collection)).into_response()
}
