//! Application state shared by the axum handlers.

use std::sync::Arc;

use campusnav_lib::{Error as LibError, RoutingConfig, RoutingService};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("failed to initialise routing service: {0}")]
    Routing(#[from] LibError),
}

/// Cheaply cloneable handle to the routing pipeline.
///
/// ```ignore
/// use axum::extract::State;
/// use campusnav_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let service = state.routing();
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    routing: RoutingService,
    provider_base_url: String,
}

impl AppState {
    /// Build the production state from process configuration.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, AppStateError> {
        let routing = RoutingService::from_config(config)?;
        Ok(Self::new(routing, config.base_url.clone()))
    }

    /// Wrap an already-built service; tests use this with a spy provider.
    pub fn new(routing: RoutingService, provider_base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                routing,
                provider_base_url: provider_base_url.into(),
            }),
        }
    }

    pub fn routing(&self) -> &RoutingService {
        &self.inner.routing
    }

    pub fn provider_base_url(&self) -> &str {
        &self.inner.provider_base_url
    }

    /// Whether any wheelchair restriction comes from server configuration.
    pub fn has_wheelchair_defaults(&self) -> bool {
        self.inner.routing.defaults().is_configured()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider_base_url", &self.inner.provider_base_url)
            .field("wheelchair_defaults", &self.has_wheelchair_defaults())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnav_lib::RoutingDefaults;

    #[test]
    fn test_from_config_uses_base_url() {
        let config = RoutingConfig::new("secret-key").with_base_url("http://ors.internal:8082/ors/v2/directions");
        let state = AppState::from_config(&config).unwrap();

        assert_eq!(state.provider_base_url(), "http://ors.internal:8082/ors/v2/directions");
        assert!(!state.has_wheelchair_defaults());
    }

    #[test]
    fn test_wheelchair_defaults_reported() {
        let config = RoutingConfig::new("secret-key").with_defaults(RoutingDefaults {
            max_gradient: Some(0.06),
            ..RoutingDefaults::default()
        });
        let state = AppState::from_config(&config).unwrap();
        assert!(state.has_wheelchair_defaults());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = RoutingConfig::new("secret-key");
        let state = AppState::from_config(&config).unwrap();
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("provider_base_url"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_clone_shares_inner() {
        let state = AppState::from_config(&RoutingConfig::new("k")).unwrap();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.inner, &clone.inner));
    }
}
