use std::net::SocketAddr;
use std::sync::Arc;

use barangay_mail::{EmailConfig, Mailer, NotificationTemplates, SmtpMailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barangay_api::backend::BackendClient;
use barangay_api::config::ServerConfig;
use barangay_api::router::build_app_router;
use barangay_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barangay_api=debug,barangay_mail=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        api_url = %config.api_url,
        image_url = %config.image_url,
        "Loaded server configuration",
    );

    // --- Backend client ---
    let backend = BackendClient::new(&config.api_url).expect("Failed to build backend HTTP client");

    // --- Email ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let host = email_config.smtp_host.clone();
            match SmtpMailer::new(email_config) {
                Ok(mailer) => {
                    tracing::info!(smtp_host = %host, "SMTP delivery enabled");
                    Some(Arc::new(mailer))
                }
                Err(e) => {
                    tracing::error!(smtp_host = %host, error = %e, "Invalid SMTP configuration, email disabled");
                    None
                }
            }
        }
        None => {
            tracing::warn!("SMTP_HOST not set, /api/send-email will answer 503");
            None
        }
    };
    let templates = NotificationTemplates::new().expect("Notification templates must compile");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        backend,
        mailer,
        templates: Arc::new(templates),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
