//! HTTP client for the backend API.
//!
//! One [`BackendClient`] is built at startup and cloned into every request
//! (the inner [`reqwest::Client`] shares its connection pool). Calls are
//! one-shot: no retries and no client-side timeout.

use std::sync::Arc;

use barangay_core::resource::ProxyMethod;
use barangay_core::upstream::{NetworkFailure, UpstreamFailure};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde_json::Value;

/// Body of an outbound backend request.
pub enum OutboundBody {
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// A successful (2xx) backend response.
#[derive(Debug)]
pub struct BackendReply {
    pub status: u16,
    /// Parsed JSON body; `None` when the backend sent an empty body.
    pub payload: Option<Value>,
}

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl BackendClient {
    /// Build a client for the backend at `base_url`. The backend is always
    /// reached directly; `HTTP(S)_PROXY` settings are ignored.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/<path>[/<rest>][?<query>]`.
    pub fn url_for(&self, path: &str, rest: Option<&str>, query: Option<&str>) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_matches('/'));
        if let Some(rest) = rest.map(|r| r.trim_matches('/')).filter(|r| !r.is_empty()) {
            url.push('/');
            url.push_str(rest);
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Send one request and classify the outcome.
    ///
    /// Non-2xx responses and transport failures come back as
    /// [`UpstreamFailure`]; a 2xx body that is not JSON is
    /// [`UpstreamFailure::InvalidPayload`].
    pub async fn send(
        &self,
        method: ProxyMethod,
        url: &str,
        token: Option<&str>,
        body: OutboundBody,
    ) -> Result<BackendReply, UpstreamFailure> {
        let mut request = self
            .client
            .request(to_reqwest_method(method), url)
            .header(ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if method == ProxyMethod::Get {
            request = request.header(CACHE_CONTROL, "no-store");
        }
        request = match body {
            OutboundBody::Empty => request,
            OutboundBody::Json(value) => request.json(&value),
            OutboundBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| self.network_failure(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.network_failure(e))?;

        if !status.is_success() {
            return Err(UpstreamFailure::classify(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(BackendReply {
                status: status.as_u16(),
                payload: None,
            });
        }

        let payload = serde_json::from_str(&text).map_err(|e| UpstreamFailure::InvalidPayload {
            status: status.as_u16(),
            reason: e.to_string(),
        })?;
        Ok(BackendReply {
            status: status.as_u16(),
            payload: Some(payload),
        })
    }

    fn network_failure(&self, err: reqwest::Error) -> UpstreamFailure {
        let failure = if err.is_connect() {
            NetworkFailure::Unreachable {
                backend_url: self.base_url.to_string(),
            }
        } else {
            NetworkFailure::Other(err.to_string())
        };
        UpstreamFailure::Network(failure)
    }
}

fn to_reqwest_method(method: ProxyMethod) -> reqwest::Method {
    match method {
        ProxyMethod::Get => reqwest::Method::GET,
        ProxyMethod::Post => reqwest::Method::POST,
        ProxyMethod::Put => reqwest::Method::PUT,
        ProxyMethod::Delete => reqwest::Method::DELETE,
    }
}
