//! Bearer-token extractors backed by the `auth_token` cookie.
//!
//! The gateway never validates the token itself; it only checks presence and
//! forwards it to the backend as `Authorization: Bearer <token>`. The cookie
//! is issued by the login flow, not here.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use barangay_core::error::CoreError;

use crate::error::AppError;

/// Name of the cookie holding the backend session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// The session token from the `auth_token` cookie, if present and non-empty.
///
/// Use this where the auth requirement depends on runtime data (the proxy
/// decides per resource and verb):
///
/// ```ignore
/// async fn handler(token: SessionToken) -> AppResult<Json<()>> {
///     let bearer = token.require()?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The token, or a 401 rejection.
    pub fn require(self) -> Result<String, AppError> {
        self.0.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Missing {AUTH_COOKIE} cookie"
            )))
        })
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(AUTH_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty());
        Ok(SessionToken(token))
    }
}

/// A mandatory session token. Rejects with `401 { success: false, message: "Unauthorized" }`.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match SessionToken::from_request_parts(parts, state).await {
            Ok(token) => token,
            Err(never) => match never {},
        };
        token.require().map(AuthToken)
    }
}
