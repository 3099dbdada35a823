use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use barangay_core::envelope::Envelope;
use barangay_core::error::CoreError;
use barangay_core::upstream::UpstreamFailure;

use crate::response::envelope_response;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`UpstreamFailure`] for backend
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] so
/// every failure leaves the gateway as an [`Envelope`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `barangay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backend failed or could not be reached.
    #[error(transparent)]
    Upstream(#[from] UpstreamFailure),

    /// A write body failed form validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A gateway feature is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound(path) => (
                    StatusCode::NOT_FOUND,
                    Envelope::failure(format!("Resource not found: {path}")),
                ),
                CoreError::MethodNotAllowed { resource, method } => (
                    StatusCode::METHOD_NOT_ALLOWED,
                    Envelope::failure(format!("Method {method} is not supported for {resource}")),
                ),
                CoreError::Unauthorized(reason) => {
                    tracing::debug!(%reason, "Rejected unauthenticated request");
                    (StatusCode::UNAUTHORIZED, Envelope::unauthorized())
                }
            },

            // --- Backend failures ---
            AppError::Upstream(failure) => {
                tracing::warn!(status = failure.status(), error = %failure, "Backend call failed");
                let status = StatusCode::from_u16(failure.status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, failure.to_envelope())
            }

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                let details = serde_json::to_value(&errors).unwrap_or_default();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Envelope::failure("Validation failed").with_details(details),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Envelope::failure(msg)),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, Envelope::failure(msg))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure("An internal error occurred"),
                )
            }
        };

        envelope_response(status, envelope)
    }
}
