use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{RoutingConfig, RoutingDefaults};
use crate::error::Result;
use crate::geometry::decode_geometry;
use crate::options::merge_options;
use crate::ors::{build_directions_request, DirectionsProvider, DirectionsResponse, OrsClient};
use crate::request::{validate_route_request, RoutingProfile};
use crate::reshape::{reshape_route, RouteFeatureCollection, RouteMetadata};

/// A computed route together with facts about how it was obtained.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub profile: RoutingProfile,
    /// Wall-clock time spent waiting on the provider.
    pub provider_latency: Duration,
    pub collection: RouteFeatureCollection,
}

impl RoutePlan {
    /// Number of coordinates in the returned line.
    pub fn point_count(&self) -> usize {
        self.collection
            .features
            .first()
            .map(|feature| feature.geometry.coordinates.len())
            .unwrap_or(0)
    }
}

/// Validates, merges, calls the provider, and reshapes.
///
/// Stateless between calls: the only shared pieces are the immutable server
/// defaults and the provider handle.
#[derive(Clone)]
pub struct RoutingService {
    defaults: RoutingDefaults,
    provider: Arc<dyn DirectionsProvider>,
}

impl RoutingService {
    pub fn new(defaults: RoutingDefaults, provider: Arc<dyn DirectionsProvider>) -> Self {
        Self { defaults, provider }
    }

    /// Build a service backed by the real openrouteservice client.
    pub fn from_config(config: &RoutingConfig) -> Result<Self> {
        let client = OrsClient::new(config)?;
        info!(
            base_url = %client.base_url(),
            timeout_secs = config.timeout.as_secs(),
            defaults = ?config.defaults,
            "routing provider configured"
        );
        Ok(Self::new(config.defaults, Arc::new(client)))
    }

    pub fn defaults(&self) -> &RoutingDefaults {
        &self.defaults
    }

    /// Run the full pipeline for one raw request body.
    ///
    /// Validation failures return before the provider is contacted.
    pub async fn route(&self, body: &Value) -> Result<RoutePlan> {
        let validated = validate_route_request(body).inspect_err(|e| {
            debug!(error = %e, "rejected route request");
        })?;
        let profile = validated.profile;

        let options = merge_options(profile, &validated.options, &self.defaults);
        let request = build_directions_request(profile, validated.start, validated.end, &options);

        let started = Instant::now();
        let raw = self.provider.directions(profile, &request).await;
        let provider_latency = started.elapsed();
        let raw = raw.inspect_err(|e| {
            warn!(
                profile = %profile,
                error = %e,
                latency_ms = provider_latency.as_millis() as u64,
                "routing provider call failed"
            );
        })?;

        let response = DirectionsResponse::from_value(raw)?;
        let primary = response.primary_route()?;
        let geometry = decode_geometry(primary.geometry)?;
        let route = reshape_route(&primary, geometry)?;

        debug!(
            profile = %profile,
            points = route.geometry.len(),
            steps = route.steps.len(),
            distance = ?route.distance,
            "reshaped provider route"
        );

        let metadata = RouteMetadata::new(
            profile,
            request,
            response.engine().cloned(),
            chrono::Utc::now().timestamp_millis(),
        );

        Ok(RoutePlan {
            profile,
            provider_latency,
            collection: route.into_feature_collection(metadata),
        })
    }
}

impl std::fmt::Debug for RoutingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingService")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
