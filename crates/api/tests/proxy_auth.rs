//! Integration tests for the `auth_token` short-circuit.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, json_request, send, FakeBackend, TEST_TOKEN};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: protected resources answer 401 without touching the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mission_and_vision_requires_token_for_every_verb() {
    let backend = FakeBackend::json(json!({ "success": true })).await;

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let app = common::build_test_app(&backend.api_url, None);
        let body = (method != Method::GET).then(|| json!({ "mission": "Serve" }));
        let response = send(app, json_request(method.clone(), "/api/mission-and-vision", None, body)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method}");
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "Unauthorized" })
        );
    }

    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn empty_cookie_counts_as_missing() {
    let backend = FakeBackend::json(json!({ "success": true })).await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(app, json_request(Method::GET, "/api/cedula", Some(""), None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.hits(), 0);
}

// ---------------------------------------------------------------------------
// Test: writes-only resources keep reads public
// ---------------------------------------------------------------------------

#[tokio::test]
async fn alerts_read_is_public_but_write_is_not() {
    let backend = FakeBackend::json(json!({ "success": true, "data": [] })).await;

    let app = common::build_test_app(&backend.api_url, None);
    let response = send(app, json_request(Method::GET, "/api/alerts", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.hits(), 1);
    assert_eq!(backend.last_request().authorization, None);

    let app = common::build_test_app(&backend.api_url, None);
    let response = send(
        app,
        json_request(Method::POST, "/api/alerts", None, Some(json!({ "title": "Flood" }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.hits(), 1);
}

// ---------------------------------------------------------------------------
// Test: public forms still forward a token when one is present
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_resource_forwards_token_when_present() {
    let backend = FakeBackend::json(json!({ "success": true, "data": [] })).await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(
        app,
        json_request(Method::GET, "/api/report-issue", Some(TEST_TOKEN), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        backend.last_request().authorization.as_deref(),
        Some("Bearer test-token")
    );
}
