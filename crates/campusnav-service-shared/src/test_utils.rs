//! Test doubles for handler testing.
//!
//! [`SpyProvider`] stands in for the routing provider so handler tests never
//! touch the network and can assert how many provider calls were made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campusnav_lib::{
    DirectionsProvider, DirectionsRequest, ProviderError, RoutingDefaults, RoutingProfile,
    RoutingService,
};
use serde_json::{json, Value};

use crate::middleware::RequestId;
use crate::state::AppState;

pub const TEST_BASE_URL: &str = "http://provider.test/v2/directions";

type Responder = Box<dyn Fn() -> Result<Value, ProviderError> + Send + Sync>;

/// Provider double that records each call and answers from a closure.
pub struct SpyProvider {
    responder: Responder,
    calls: AtomicUsize,
    requests: Mutex<Vec<(RoutingProfile, Value)>>,
}

impl SpyProvider {
    pub fn new(
        responder: impl Fn() -> Result<Value, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(body: Value) -> Self {
        Self::new(move || Ok(body.clone()))
    }

    /// Answers every call with a non-2xx provider status.
    pub fn failing(status: u16, message: &str) -> Self {
        let message = message.to_string();
        Self::new(move || {
            Err(ProviderError::Status {
                status,
                message: message.clone(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Serialized bodies sent so far, oldest first.
    pub fn requests(&self) -> Vec<(RoutingProfile, Value)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
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
        let body = serde_json::to_value(request)?;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((profile, body));
        }
        (self.responder)()
    }
}

/// State backed by `provider`, with no server-side wheelchair defaults.
pub fn test_state(provider: Arc<SpyProvider>) -> AppState {
    test_state_with(provider, TEST_BASE_URL)
}

pub fn test_state_with(provider: Arc<SpyProvider>, base_url: &str) -> AppState {
    test_state_with_defaults(provider, base_url, RoutingDefaults::default())
}

pub fn test_state_with_defaults(
    provider: Arc<SpyProvider>,
    base_url: &str,
    defaults: RoutingDefaults,
) -> AppState {
    AppState::new(RoutingService::new(defaults, provider), base_url)
}

/// Successful provider body: a short walk across campus as an encoded polyline.
pub fn sample_route_response() -> Value {
    json!({
        "routes": [{
            "summary": {"distance": 386.4, "duration": 278.2},
            "segments": [{
                "distance": 386.4,
                "duration": 278.2,
                "steps": [
                    {"distance": 386.4, "duration": 278.2, "type": 11, "instruction": "Head north on Speedway", "name": "Speedway", "way_points": [0, 2]},
                    {"distance": 0.0, "duration": 0.0, "type": 10, "instruction": "Arrive at Speedway, on the left", "name": "-", "way_points": [2, 2]}
                ]
            }],
            "geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
            "way_points": [0, 2]
        }],
        "metadata": {"engine": {"version": "8.0.0", "build_date": "2024-03-21T13:55:54Z"}}
    })
}

pub fn test_request_id() -> String {
    format!("test-{}", RequestId::generate())
}
