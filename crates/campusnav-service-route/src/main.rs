//! Campus navigation route service binary.
//!
//! # Configuration
//!
//! - `ORS_API_KEY` - openrouteservice API key (required)
//! - `ORS_BASE_URL` - directions endpoint base (default: public openrouteservice)
//! - `ORS_TIMEOUT_SECS` - outbound timeout in seconds (default: 30)
//! - `ORS_WHEELCHAIR_MAX_GRADIENT`, `ORS_WHEELCHAIR_MAX_SLOPED_KERB`,
//!   `ORS_WHEELCHAIR_AVOID_STEPS` - server-side wheelchair defaults
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG`, `LOG_FORMAT`, `SERVICE_NAME` - logging
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus exposition

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, warn};

use campusnav_lib::RoutingConfig;
use campusnav_service_route::app;
use campusnav_service_shared::{
    AppState, LoggingConfig, MetricsConfig, MetricsError, init_logging, init_metrics,
};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("campusnav-route");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    match init_metrics(&metrics_config) {
        Ok(()) => {}
        Err(MetricsError::Disabled) => info!("metrics disabled"),
        Err(e) => warn!(error = %e, "failed to initialize metrics, continuing without metrics"),
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let routing_config = RoutingConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid routing configuration");
        e
    })?;

    let state = AppState::from_config(&routing_config).map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;
    info!(state = ?state, "application state ready");

    let app = app(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
