//! Exercises [`OrsClient`] against a local stand-in for the provider.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use campusnav_lib::{
    build_directions_request, Coordinate, DirectionsProvider, OrsClient, ProviderError,
    RoutingConfig, RoutingOptions, RoutingProfile,
};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Captured {
    inner: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn directions(
    State(captured): State<Captured>,
    Path(profile): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    captured
        .inner
        .lock()
        .unwrap()
        .push((profile.clone(), auth, body));

    match profile.as_str() {
        "driving-car" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 2010, "message": "Could not find routable point"}})),
        )
            .into_response(),
        "cycling-regular" => {
            (StatusCode::FORBIDDEN, Json(json!({"unexpected": true}))).into_response()
        }
        "foot-walking" => (StatusCode::OK, "service temporarily in maintenance").into_response(),
        _ => (
            StatusCode::OK,
            Json(json!({"routes": [{"summary": {"distance": 1.0}, "geometry": "_p~iF~ps|U"}]})),
        )
            .into_response(),
    }
}

async fn spawn_provider() -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v2/directions/{profile}", post(directions))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn client_for(addr: SocketAddr) -> OrsClient {
    let mut config =
        RoutingConfig::new("test-key").with_base_url(format!("http://{addr}/v2/directions"));
    config.timeout = Duration::from_secs(5);
    OrsClient::new(&config).unwrap()
}

fn plain_options() -> RoutingOptions {
    RoutingOptions {
        include_steps: true,
        wheelchair_constraints: None,
    }
}

#[tokio::test]
async fn posts_to_profile_path_with_api_key() {
    let (addr, captured) = spawn_provider().await;
    let client = client_for(addr);
    let request = build_directions_request(
        RoutingProfile::Wheelchair,
        Coordinate::new(-97.7333, 30.2672),
        Coordinate::new(-97.73, 30.27),
        &plain_options(),
    );

    let body = client
        .directions(RoutingProfile::Wheelchair, &request)
        .await
        .expect("provider call succeeds");
    assert_eq!(body["routes"][0]["geometry"], "_p~iF~ps|U");

    let calls = captured.inner.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (profile, auth, sent) = &calls[0];
    assert_eq!(profile, "wheelchair");
    assert_eq!(auth.as_deref(), Some("test-key"));
    assert_eq!(sent["coordinates"], json!([[-97.7333, 30.2672], [-97.73, 30.27]]));
    assert_eq!(sent["instructions_format"], "text");
}

#[tokio::test]
async fn non_success_status_recovers_provider_message() {
    let (addr, _) = spawn_provider().await;
    let client = client_for(addr);
    let request = build_directions_request(
        RoutingProfile::DrivingCar,
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 1.0),
        &plain_options(),
    );

    let err = client
        .directions(RoutingProfile::DrivingCar, &request)
        .await
        .unwrap_err();
    match err {
        ProviderError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Could not find routable point");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unrecognised_error_body_falls_back_to_status() {
    let (addr, _) = spawn_provider().await;
    let client = client_for(addr);
    let request = build_directions_request(
        RoutingProfile::CyclingRegular,
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 1.0),
        &plain_options(),
    );

    let err = client
        .directions(RoutingProfile::CyclingRegular, &request)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "routing provider returned status 403");
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let (addr, captured) = spawn_provider().await;
    let client = client_for(addr);
    let request = build_directions_request(
        RoutingProfile::FootWalking,
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 1.0),
        &plain_options(),
    );

    let err = client
        .directions(RoutingProfile::FootWalking, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
    assert_eq!(err.reason(), "decode");
    assert_eq!(
        err.to_string(),
        "routing provider returned an unreadable response"
    );
    assert_eq!(captured.inner.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let request = build_directions_request(
        RoutingProfile::Wheelchair,
        Coordinate::new(0.0, 0.0),
        Coordinate::new(1.0, 1.0),
        &plain_options(),
    );

    let err = client
        .directions(RoutingProfile::Wheelchair, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
    assert_eq!(err.reason(), "transport");
}
