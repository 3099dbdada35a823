use std::sync::Arc;

use barangay_mail::{Mailer, NotificationTemplates};

use crate::backend::BackendClient;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pooled HTTP client for the backend API.
    pub backend: BackendClient,
    /// Outgoing mail; `None` when SMTP is not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    /// Compiled notification email templates.
    pub templates: Arc<NotificationTemplates>,
}
