/// Domain errors raised before the backend is contacted.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Method {method} is not supported for {resource}")]
    MethodNotAllowed {
        resource: String,
        method: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
