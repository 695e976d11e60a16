/// Unified error types for the govdir API
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the directory API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request path named an extension outside the allow-list
    #[error("Extension must be one of: {}", .allowed.join(", "))]
    UnsupportedExtension { allowed: Vec<String> },

    /// Directory store errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::UnsupportedExtension { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(e) => {
                // A store outage is a dependency failure, not a handler
                // bug; answer 503 and keep details out of the body.
                tracing::error!("Directory store query failed: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Directory store is unavailable".to_string(),
                )
            }
            ApiError::Io(_) | ApiError::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
