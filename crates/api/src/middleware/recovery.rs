//! Envelope bodies for failures raised by the middleware stack itself.
//!
//! A panicking handler or an elapsed request deadline never reaches
//! [`AppError`](crate::error::AppError), so these handlers build the same
//! `{ success: false, error }` body the handlers do.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::Response;
use barangay_core::envelope::Envelope;
use tower::BoxError;

use crate::response::envelope_response;

/// `CatchPanicLayer::custom` handler.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = %detail, "Handler panicked");

    envelope_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Envelope::failure("An internal error occurred"),
    )
}

/// `HandleErrorLayer` handler for the request timeout.
pub async fn timeout_response(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        return envelope_response(
            StatusCode::REQUEST_TIMEOUT,
            Envelope::failure("Request timed out"),
        );
    }
    tracing::error!(error = %err, "Unhandled middleware error");
    envelope_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Envelope::failure("An internal error occurred"),
    )
}
