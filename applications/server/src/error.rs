/// Server error types
use crate::services::search::UpstreamResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] mixtape_core::MixtapeError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search API unreachable: {0}")]
    SearchUnavailable(String),

    #[error("Upstream API returned {}", .0.status)]
    Upstream(UpstreamResponse),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<mixtape_storage::StorageError> for ServerError {
    fn from(err: mixtape_storage::StorageError) -> Self {
        ServerError::Database(err.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            // Relayed exactly as the upstream API sent it
            ServerError::Upstream(upstream) => return upstream.into_response(),
            ServerError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ServerError::Identity(ref msg) => {
                tracing::warn!("Identity provider error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    "authentication_failed",
                    "Authentication failed".to_string(),
                )
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ServerError::MalformedUpload(msg) => {
                tracing::warn!("Malformed upload: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "malformed_upload", msg)
            }
            ServerError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_unavailable",
                    "Database error".to_string(),
                )
            }
            ServerError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_unavailable", msg)
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_unavailable",
                    "IO error".to_string(),
                )
            }
            ServerError::SearchUnavailable(ref msg) => {
                tracing::error!("Search API unreachable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_unreachable",
                    "Search service unreachable".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config",
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Invalid session".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
