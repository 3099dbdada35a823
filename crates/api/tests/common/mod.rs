//! Shared harness for gateway integration tests.
//!
//! Tests drive the real router (same middleware stack as `main.rs`) with
//! `tower::ServiceExt::oneshot`, against an in-process fake backend bound to
//! an ephemeral port.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use barangay_api::backend::BackendClient;
use barangay_api::config::ServerConfig;
use barangay_api::router::build_app_router;
use barangay_api::state::AppState;
use barangay_mail::{EmailError, Mailer, NotificationTemplates, OutgoingEmail};

pub const TEST_TOKEN: &str = "test-token";
pub const IMAGE_URL: &str = "http://img.test/storage";

/// Build a test `ServerConfig` pointing at `api_url`.
pub fn test_config(api_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        api_url: api_url.to_string(),
        image_url: IMAGE_URL.to_string(),
    }
}

/// Build the full application router for a backend at `api_url`.
pub fn build_test_app(api_url: &str, mailer: Option<Arc<dyn Mailer>>) -> Router {
    let config = test_config(api_url);
    let state = AppState {
        config: Arc::new(config.clone()),
        backend: BackendClient::new(api_url).unwrap(),
        mailer,
        templates: Arc::new(NotificationTemplates::new().unwrap()),
    };
    build_app_router(state, &config)
}

/// A base URL nothing listens on.
pub fn unreachable_api_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);
    url
}

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query, e.g. `/api/goals/3?page=2`.
    pub uri: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct FakeInner {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A backend that answers every request with one canned response and
/// records what it received.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<FakeInner>,
    pub api_url: String,
}

impl FakeBackend {
    pub async fn spawn(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        let inner = Arc::new(FakeInner {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(record).with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            inner,
            api_url: format!("http://{addr}/api"),
        }
    }

    /// 200 with a JSON body.
    pub async fn json(body: Value) -> Self {
        Self::spawn(200, "application/json", body.to_string()).await
    }

    pub fn hits(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.inner
            .requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("fake backend received no requests")
    }
}

async fn record(State(inner): State<Arc<FakeInner>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        cache_control: header(CACHE_CONTROL),
        body: axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec(),
    };
    inner.requests.lock().unwrap().push(recorded);

    Response::builder()
        .status(inner.status)
        .header(CONTENT_TYPE, inner.content_type)
        .body(Body::from(inner.body.clone()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Recording mailer
// ---------------------------------------------------------------------------

/// A [`Mailer`] that records deliveries and fails for chosen addresses.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    failing: HashSet<String>,
}

impl RecordingMailer {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.failing.contains(&email.to) {
            return Err(EmailError::Build("connection reset".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Build a request with an optional `auth_token` cookie and JSON body.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(COOKIE, format!("auth_token={token}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, json_request(Method::GET, uri, None, None)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
