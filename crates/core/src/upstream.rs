//! Classification of backend failures into envelopes.
//!
//! The backend answers errors in one of several shapes: a structured JSON
//! body (usually Laravel's `{ message, errors }`), an HTML error page, or
//! nothing at all because it could not be reached. [`UpstreamFailure`] names
//! each case so the envelope mapping is a single `match`.

use serde_json::Value;

use crate::envelope::Envelope;

/// Maximum number of characters of a non-JSON error body echoed back.
pub const RAW_RESPONSE_LIMIT: usize = 200;

/// Error text for non-JSON error bodies.
pub const GENERIC_SERVER_ERROR: &str = "Server returned an error";

/// Error text when a failure carries no message at all.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// HTTP status reported for failures that produced no backend status.
pub const GATEWAY_FAILURE_STATUS: u16 = 500;

// ---------------------------------------------------------------------------
// Failure types
// ---------------------------------------------------------------------------

/// The backend could not be talked to at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    /// Connection refused, DNS failure, TLS handshake failure, ...
    Unreachable { backend_url: String },
    /// Any other transport error, carrying its message.
    Other(String),
}

impl NetworkFailure {
    pub fn message(&self) -> String {
        match self {
            Self::Unreachable { backend_url } => format!(
                "Cannot connect to the backend server at {backend_url}. \
                 Make sure the API server is running and API_URL is configured correctly."
            ),
            Self::Other(msg) if msg.trim().is_empty() => UNKNOWN_ERROR.to_string(),
            Self::Other(msg) => msg.clone(),
        }
    }
}

/// Every way a proxied call can fail after leaving the gateway.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamFailure {
    /// Non-2xx with a JSON body.
    #[error("Backend rejected the request with HTTP {status}")]
    Structured { status: u16, body: Value },

    /// Non-2xx with a body that is not JSON (typically an HTML error page).
    #[error("Backend returned a non-JSON error response (HTTP {status})")]
    Html { status: u16, body: String },

    /// No response was received.
    #[error("{}", .0.message())]
    Network(NetworkFailure),

    /// 2xx whose body could not be read as JSON.
    #[error("Invalid response from backend (HTTP {status}): {reason}")]
    InvalidPayload { status: u16, reason: String },
}

impl UpstreamFailure {
    /// Classify a non-2xx backend response by its body.
    pub fn classify(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(json) => Self::Structured { status, body: json },
            Err(_) => Self::Html {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Status code relayed to the browser.
    pub fn status(&self) -> u16 {
        match self {
            Self::Structured { status, .. } | Self::Html { status, .. } => *status,
            Self::Network(_) | Self::InvalidPayload { .. } => GATEWAY_FAILURE_STATUS,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::Structured { status, body } => {
                let error = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Request failed with status {status}"));
                let details = match body.get("errors") {
                    Some(errors) if !errors.is_null() => errors.clone(),
                    _ => body.clone(),
                };
                Envelope::failure(error).with_details(details)
            }
            Self::Html { body, .. } => Envelope {
                is_html_error: Some(looks_like_html(body)),
                raw_response: Some(truncate_chars(body, RAW_RESPONSE_LIMIT)),
                ..Envelope::failure(GENERIC_SERVER_ERROR)
            },
            Self::Network(failure) => Envelope::failure(failure.message()),
            Self::InvalidPayload { .. } => Envelope::failure(self.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn looks_like_html(body: &str) -> bool {
    body.contains("<html") || body.contains("<!DOCTYPE")
}

/// First `max` characters of `s` (character, not byte, boundary).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
