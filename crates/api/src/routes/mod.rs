pub mod health;

use axum::routing::{any, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /send-email                  render + deliver a notification (POST, auth required)
///
/// /{resource}                  proxied collection (GET, POST, PUT, DELETE per registry row)
/// /{resource}/{*rest}          proxied member or sub-path, forwarded verbatim
/// ```
///
/// The static `/send-email` route takes precedence over `/{resource}`.
/// Verb and auth checks for proxied routes happen in the proxy handler
/// against [`barangay_core::resource::RESOURCES`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/send-email",
            post(handlers::email::send_email).fallback(handlers::method_not_allowed),
        )
        .route("/{resource}", any(handlers::proxy::proxy_collection))
        .route("/{resource}/{*rest}", any(handlers::proxy::proxy_member))
}
