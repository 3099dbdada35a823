//! `POST /api/send-email`: render an announcement or news notification and
//! deliver it to each recipient individually.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use barangay_core::envelope::Envelope;
use barangay_core::forms::SendEmailForm;
use barangay_mail::{NotificationEmail, NotificationKind, OutgoingEmail};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_json_body;
use crate::middleware::auth::AuthToken;
use crate::response::envelope_response;
use crate::state::AppState;

pub async fn send_email(
    State(state): State<AppState>,
    _token: AuthToken,
    body: Bytes,
) -> AppResult<Response> {
    let body = parse_json_body(&body)?;
    let form = SendEmailForm::from_json(&body)?;

    let Some(mailer) = state.mailer.as_ref() else {
        return Err(AppError::ServiceUnavailable(
            "Email delivery is not configured".into(),
        ));
    };

    let notification = NotificationEmail {
        kind: form
            .kind
            .as_deref()
            .and_then(NotificationKind::parse)
            .unwrap_or_default(),
        title: form.title,
        content: form.content,
        link: form.link.filter(|l| !l.trim().is_empty()),
    };
    let html = state
        .templates
        .render(&notification)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let mut sent = Vec::new();
    let mut failed = Vec::new();
    for recipient in form.recipients {
        let email = OutgoingEmail {
            to: recipient,
            subject: form.subject.clone(),
            html: html.clone(),
        };
        match mailer.send(&email).await {
            Ok(()) => sent.push(email.to),
            Err(e) => {
                tracing::warn!(to = %email.to, error = %e, "Failed to send notification email");
                failed.push(email.to);
            }
        }
    }

    if sent.is_empty() {
        tracing::error!(failed = failed.len(), "Notification email failed for every recipient");
        return Ok(envelope_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::failure("Failed to send email to any recipient")
                .with_details(json!({ "failed": failed })),
        ));
    }

    tracing::info!(
        sent = sent.len(),
        failed = failed.len(),
        kind = ?notification.kind,
        "Notification email delivered",
    );
    let message = format!("Email sent to {} recipient(s)", sent.len());
    Ok(envelope_response(
        StatusCode::OK,
        Envelope::ok(json!({ "sent": sent, "failed": failed })).with_message(message),
    ))
}
