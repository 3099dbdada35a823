//! Integration tests for backend failure classification.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, json_request, send, FakeBackend, TEST_TOKEN};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: structured (JSON) backend errors keep their status and details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn laravel_validation_error_is_relayed() {
    let backend = FakeBackend::spawn(
        422,
        "application/json",
        json!({
            "message": "The title field is required.",
            "errors": { "title": ["The title field is required."] },
        })
        .to_string(),
    )
    .await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(
        app,
        json_request(Method::POST, "/api/news", Some(TEST_TOKEN), Some(json!({ "title": "" }))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": false,
            "error": "The title field is required.",
            "details": { "title": ["The title field is required."] },
        })
    );
}

#[tokio::test]
async fn json_error_without_message_names_the_status() {
    let backend = FakeBackend::spawn(404, "application/json", r#"{"success":false}"#).await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(app, json_request(Method::GET, "/api/news/99", None, None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Request failed with status 404");
    assert_eq!(json["details"], json!({ "success": false }));
}

// ---------------------------------------------------------------------------
// Test: HTML error pages are flagged and truncated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn html_error_page_is_flagged() {
    let page = format!(
        "<!DOCTYPE html><html><head><title>Server Error</title></head><body>{}</body></html>",
        "x".repeat(500)
    );
    let backend = FakeBackend::spawn(500, "text/html", page.clone()).await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(app, json_request(Method::GET, "/api/announcements", None, None)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Server returned an error");
    assert_eq!(json["isHtmlError"], true);
    let raw = json["rawResponse"].as_str().unwrap();
    assert_eq!(raw.chars().count(), 200);
    assert!(page.starts_with(raw));
}

// ---------------------------------------------------------------------------
// Test: network failures become 500 envelopes naming the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_backend_names_the_url() {
    let api_url = common::unreachable_api_url();
    let app = common::build_test_app(&api_url, None);

    let response = send(app, json_request(Method::GET, "/api/alerts", None, None)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&api_url), "error should name {api_url}: {error}");
}

// ---------------------------------------------------------------------------
// Test: 2xx responses are normalized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_with_non_json_body_is_invalid() {
    let backend = FakeBackend::spawn(200, "text/plain", "OK").await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(app, json_request(Method::GET, "/api/alerts", None, None)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid response from backend"));
}

#[tokio::test]
async fn empty_success_body_becomes_success_flag() {
    let backend = FakeBackend::spawn(200, "application/json", "").await;
    let app = common::build_test_app(&backend.api_url, None);

    let response = send(
        app,
        json_request(Method::DELETE, "/api/goals/4", Some(TEST_TOKEN), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    assert_eq!(backend.last_request().method, "DELETE");
}
