//! Prometheus metrics for the campus navigation services.
//!
//! # Example
//!
//! ```no_run
//! use campusnav_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! let config = MetricsConfig::from_env();
//! if let Err(e) = init_metrics(&config) {
//!     eprintln!("metrics unavailable: {e}");
//! }
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const METRICS_ENABLED_ENV: &str = "METRICS_ENABLED";
pub const METRICS_PATH_ENV: &str = "METRICS_PATH";

const DEFAULT_PATH: &str = "/metrics";

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `METRICS_ENABLED=false` disables collection; any other value enables it.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup(METRICS_ENABLED_ENV)
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = lookup(METRICS_PATH_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| v.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        Self { enabled, path }
    }
}

#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Prometheus exposition text, or a comment when the recorder is absent.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# metrics not initialized\n".to_string())
}

// Business metrics

/// `campusnav_routes_calculated_total{profile}`
pub fn record_route_calculated(profile: &str) {
    metrics::counter!(
        "campusnav_routes_calculated_total",
        "profile" => profile.to_string()
    )
    .increment(1);
}

/// `campusnav_routes_failed_total{reason}`
///
/// `reason` should come from `campusnav_lib::Error::reason` or be one of the
/// handler's own low-cardinality labels.
pub fn record_route_failed(reason: &str) {
    metrics::counter!(
        "campusnav_routes_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Number of coordinates in a returned route line.
pub fn record_route_points(points: usize, profile: &str) {
    metrics::histogram!(
        "campusnav_route_points",
        "profile" => profile.to_string()
    )
    .record(points as f64);
}

pub fn record_provider_latency(latency: Duration, profile: &str) {
    metrics::histogram!(
        "campusnav_provider_latency_seconds",
        "profile" => profile.to_string()
    )
    .record(latency.as_secs_f64());
}
