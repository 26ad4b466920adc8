//! Scenario: the raw forwarding route is a strict pass-through.
//!
//! # Invariants under test
//!
//! 1. POST /v1/forward sends the JSON payload to the configured endpoint and
//!    relays the upstream status and body verbatim, success or not.
//! 2. With no endpoint configured it answers 500 with a config error.
//! 3. A transport failure answers 500 with a generic error, not a relay.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use tower::ServiceExt;

use odk_config::DaemonConfig;
use odk_daemon::{routes, state};
use odk_refdata::RefdataBuilder;

fn make_state(endpoint: Option<String>) -> Arc<state::AppState> {
    let config = DaemonConfig::from_lookup(|key| match key {
        odk_config::ENV_ENDPOINT_POST => endpoint.clone(),
        _ => None,
    })
    .unwrap();
    Arc::new(state::AppState::new(config, RefdataBuilder::new().build()))
}

fn forward_req(body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/forward")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

async fn call(
    st: &Arc<state::AppState>,
    req: Request<axum::body::Body>,
) -> (StatusCode, String) {
    let resp = routes::build_router(Arc::clone(st))
        .oneshot(req)
        .await
        .expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

#[tokio::test]
async fn forward_relays_status_and_body_verbatim() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/po")
                .json_body(serde_json::json!({"po_number": "5"}));
            then.status(201).body("stored as 5");
        })
        .await;
    let st = make_state(Some(server.url("/po")));

    let (status, body) = call(&st, forward_req(serde_json::json!({"po_number": "5"}))).await;
    upstream.assert_async().await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "stored as 5");
}

#[tokio::test]
async fn upstream_error_status_is_relayed_not_wrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/po");
            then.status(403).body("forbidden by upstream");
        })
        .await;
    let st = make_state(Some(server.url("/po")));

    let (status, body) = call(&st, forward_req(serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "forbidden by upstream");
}

#[tokio::test]
async fn missing_endpoint_is_a_config_error() {
    let st = make_state(None);
    let (status, body) = call(&st, forward_req(serde_json::json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "API endpoint is not configured");
}

#[tokio::test]
async fn transport_failure_is_a_generic_500() {
    // Nothing listens on discard.
    let st = make_state(Some("http://127.0.0.1:9/po".to_string()));
    let (status, body) = call(&st, forward_req(serde_json::json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Failed to forward request");
}
