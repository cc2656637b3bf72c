//! Shared helpers for the routing pipeline integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campusnav_lib::{
    DirectionsProvider, DirectionsRequest, ProviderError, RoutingDefaults, RoutingProfile,
    RoutingService,
};
use serde_json::{json, Value};

type Responder = Box<dyn Fn() -> Result<Value, ProviderError> + Send + Sync>;

/// Provider double that records every call it receives.
///
/// `campusnav-service-shared` ships a similar double behind `test-utils`, but
/// that crate depends on this one. Pulling it in as a dev-dependency would
/// link a second build of `campusnav-lib`, and its spy would implement that
/// copy's `DirectionsProvider` rather than the trait these tests use.
pub struct SpyProvider {
    responder: Responder,
    calls: AtomicUsize,
    last: Mutex<Option<(RoutingProfile, Value)>>,
}

#[allow(dead_code)]
impl SpyProvider {
    pub fn new(responder: impl Fn() -> Result<Value, ProviderError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    /// Always answers with `body`.
    pub fn returning(body: Value) -> Self {
        Self::new(move || Ok(body.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Profile and serialized body of the most recent call.
    pub fn last_request(&self) -> Option<(RoutingProfile, Value)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionsProvider for SpyProvider {
    async fn directions(
        &self,
        profile: RoutingProfile,
        request: &DirectionsRequest,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = serde_json::to_value(request).unwrap();
        *self.last.lock().unwrap() = Some((profile, body));
        (self.responder)()
    }
}

#[allow(dead_code)]
pub fn service_with(spy: &Arc<SpyProvider>, defaults: RoutingDefaults) -> RoutingService {
    RoutingService::new(defaults, spy.clone())
}

/// Minimal successful provider body with a three-point encoded polyline.
#[allow(dead_code)]
pub fn polyline_response() -> Value {
    json!({
        "routes": [{
            "summary": {"distance": 412.3, "duration": 296.9},
            "segments": [{
                "distance": 412.3,
                "duration": 296.9,
                "steps": [
                    {"distance": 200.1, "duration": 144.0, "type": 11, "instruction": "Head northeast on Guadalupe Street", "name": "Guadalupe Street", "way_points": [0, 1]},
                    {"distance": 212.2, "duration": 152.9, "type": 10, "instruction": "Arrive at your destination", "name": "-", "way_points": [1, 2]}
                ]
            }],
            "geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
            "way_points": [0, 2]
        }],
        "metadata": {"engine": {"version": "8.0.0"}}
    })
}
