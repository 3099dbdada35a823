//! Response helpers.
//!
//! Every gateway response body is either a backend payload relayed verbatim
//! or an [`Envelope`] built here. Use [`envelope_response`] instead of ad-hoc
//! `serde_json::json!` bodies so the field names stay consistent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use barangay_core::envelope::Envelope;

/// Serialize an envelope with the given status.
pub fn envelope_response(status: StatusCode, envelope: Envelope) -> Response {
    (status, Json(envelope)).into_response()
}
