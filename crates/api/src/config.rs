/// Default backend API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default base URL for storage-relative media paths.
pub const DEFAULT_IMAGE_URL: &str = "http://localhost:8000/storage";

/// Default cap on inbound request bodies (10 MiB, enough for photo uploads).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Backend API base URL, without a trailing slash.
    pub api_url: String,
    /// Base URL that storage-relative image paths are joined onto.
    pub image_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `3000`                           |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `MAX_BODY_BYTES`       | `10485760`                       |
    /// | `API_URL`              | `http://localhost:8000/api`      |
    /// | `IMAGE_URL`            | `http://localhost:8000/storage`  |
    ///
    /// `API_URL` and `IMAGE_URL` fall back to `NEXT_PUBLIC_API_URL` and
    /// `NEXT_PUBLIC_IMAGE_URL` so an existing front-end `.env` can be reused.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .map(|v| v.parse().expect("MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let api_url = normalize_base_url(&env_with_fallback(
            "API_URL",
            "NEXT_PUBLIC_API_URL",
            DEFAULT_API_URL,
        ));
        let image_url = normalize_base_url(&env_with_fallback(
            "IMAGE_URL",
            "NEXT_PUBLIC_IMAGE_URL",
            DEFAULT_IMAGE_URL,
        ));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            api_url,
            image_url,
        }
    }
}

fn env_with_fallback(primary: &str, fallback: &str, default: &str) -> String {
    std::env::var(primary)
        .or_else(|_| std::env::var(fallback))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
