//! The generic backend proxy.
//!
//! One handler serves every resource in
//! [`barangay_core::resource::RESOURCES`]: look up the registry row, enforce
//! its auth policy, prepare the body, forward, then reshape the reply.

use axum::extract::{FromRequest, Multipart, Path, RawQuery, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use barangay_core::array_fields::{decode_array_fields, encode_array_fields};
use barangay_core::error::CoreError;
use barangay_core::media::resolve_media_fields;
use barangay_core::preview::json_preview;
use barangay_core::resource::{self, ProxyMethod, ResourceSpec};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::backend::OutboundBody;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_json_body;
use crate::middleware::auth::SessionToken;
use crate::state::AppState;

/// Form field Laravel reads to treat a multipart POST as another verb.
const METHOD_OVERRIDE_FIELD: &str = "_method";

// ---------------------------------------------------------------------------
// ANY /api/{resource}
// ---------------------------------------------------------------------------

pub async fn proxy_collection(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    token: SessionToken,
    RawQuery(query): RawQuery,
    request: Request,
) -> AppResult<Response> {
    forward(state, &resource, None, token, query, request).await
}

// ---------------------------------------------------------------------------
// ANY /api/{resource}/{*rest}
// ---------------------------------------------------------------------------

pub async fn proxy_member(
    State(state): State<AppState>,
    Path((resource, rest)): Path<(String, String)>,
    token: SessionToken,
    RawQuery(query): RawQuery,
    request: Request,
) -> AppResult<Response> {
    forward(state, &resource, Some(rest), token, query, request).await
}

// ---------------------------------------------------------------------------
// Core flow
// ---------------------------------------------------------------------------

async fn forward(
    state: AppState,
    resource: &str,
    rest: Option<String>,
    token: SessionToken,
    query: Option<String>,
    request: Request,
) -> AppResult<Response> {
    let (spec, method) = resource::resolve(resource, request.method().as_str())?;

    if spec.requires_token(method) && token.as_deref().is_none() {
        return Err(AppError::Core(CoreError::Unauthorized(format!(
            "{method} /api/{} requires authentication",
            spec.name
        ))));
    }

    let url = state
        .backend
        .url_for(spec.backend_path, rest.as_deref(), query.as_deref());

    let (wire_method, body) = if method.has_body() {
        prepare_body(&state, spec, method, request).await?
    } else {
        (method, OutboundBody::Empty)
    };

    tracing::info!(method = %method, url = %url, resource = spec.name, "Forwarding request to backend");

    let reply = state
        .backend
        .send(wire_method, &url, token.as_deref(), body)
        .await?;

    let mut payload = reply.payload.unwrap_or_else(|| json!({ "success": true }));
    reshape_reply(spec, method, &mut payload, &state.config.image_url);

    if method.is_write() {
        tracing::debug!(
            status = reply.status,
            response = %json_preview(&payload),
            "Backend accepted write",
        );
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(payload)).into_response())
}

/// Turn the inbound body into an outbound one. Returns the verb to send,
/// which differs from the inbound verb only for multipart PUT.
async fn prepare_body(
    state: &AppState,
    spec: &'static ResourceSpec,
    method: ProxyMethod,
    request: Request,
) -> AppResult<(ProxyMethod, OutboundBody)> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        // PHP only parses multipart bodies on POST.
        let (wire_method, spoofed) = match method {
            ProxyMethod::Put => (ProxyMethod::Post, Some(method)),
            other => (other, None),
        };
        let form = multipart_form(multipart, spoofed).await?;
        tracing::debug!(resource = spec.name, "Forwarding multipart body");
        return Ok((wire_method, OutboundBody::Multipart(form)));
    }

    let bytes = axum::body::to_bytes(request.into_body(), state.config.max_body_bytes)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?;
    let mut body = parse_json_body(&bytes)?;

    if let Some(form) = spec.form {
        form.validate(&body)?;
    }

    tracing::debug!(resource = spec.name, payload = %json_preview(&body), "Write payload");
    encode_array_fields(&mut body, spec.array_fields);

    Ok((method, OutboundBody::Json(body)))
}

/// Re-encode every multipart field for the backend. File parts keep their
/// file name and content type.
async fn multipart_form(mut multipart: Multipart, spoofed: Option<ProxyMethod>) -> AppResult<Form> {
    let mut form = Form::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        form = match file_name {
            Some(file_name) => {
                let mut part = Part::bytes(data.to_vec()).file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type).map_err(|e| {
                        AppError::BadRequest(format!("Invalid content type for '{name}': {e}"))
                    })?;
                }
                form.part(name, part)
            }
            None => form.text(name, String::from_utf8_lossy(&data).into_owned()),
        };
    }

    if let Some(method) = spoofed {
        form = form.text(METHOD_OVERRIDE_FIELD, method.as_str());
    }
    Ok(form)
}

/// Decode array fields and absolutize media paths on a backend reply.
///
/// The record(s) live under `data` when the backend wraps them; bare GET
/// replies are treated as the record(s) themselves.
fn reshape_reply(spec: &ResourceSpec, method: ProxyMethod, payload: &mut Value, image_url: &str) {
    if spec.array_fields.is_empty() && spec.media_fields.is_empty() {
        return;
    }
    let target = if payload.get("data").is_some() {
        &mut payload["data"]
    } else if method == ProxyMethod::Get {
        payload
    } else {
        return;
    };
    decode_array_fields(target, spec.array_fields);
    resolve_media_fields(target, spec.media_fields, image_url);
}
