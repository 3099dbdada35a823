//! HTTP handlers.
//!
//! - [`proxy`] -- the generic backend proxy behind every `/api/{resource}` route.
//! - [`email`] -- `POST /api/send-email`.

pub mod email;
pub mod proxy;

use axum::http::{Method, Uri};
use barangay_core::error::CoreError;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Parse a JSON request body. An empty body is treated as `{}`.
pub fn parse_json_body(bytes: &[u8]) -> AppResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Request body must be valid JSON: {e}")))
}

/// Fallback for paths no route matches.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::Core(CoreError::NotFound(uri.path().to_string()))
}

/// Fallback for a known path hit with a verb it does not accept.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::Core(CoreError::MethodNotAllowed {
        resource: uri.path().to_string(),
        method: method.to_string(),
    })
}
