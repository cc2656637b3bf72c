//! Shared infrastructure for the campus navigation HTTP services.
//!
//! - [`AppState`]: the routing pipeline plus configuration facts for probes
//! - [`health`]: liveness/readiness handlers
//! - [`ErrorResponse`]: the `{ "error": .. }` body every failure maps to
//! - [`metrics`]: Prometheus recorder and business metric helpers
//! - [`logging`]: structured logging setup
//! - [`middleware`]: request ID propagation and HTTP metrics
//!
//! # Architecture
//!
//! Handlers stay thin; all routing behaviour lives in `campusnav-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Accept raw JSON                                          │
//! │  - Call RoutingService::route                               │
//! │  - Map the result to 200 / 400 / 500                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! Enable the `test-utils` feature for [`test_utils`], which provides a spy
//! routing provider and prebuilt state.

mod error_response;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error_response::{from_lib_error, ErrorResponse};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_provider_latency, record_route_calculated,
    record_route_failed, record_route_points, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use state::{AppState, AppStateError};
