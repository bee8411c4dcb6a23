use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

pub type ProxyResult<T> = Result<T, ProxyError>;

/// Every way a proxied request can fail. Each variant carries enough to
/// build the OpenAI-style error body the caller sees.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing API key")]
    MissingSecret,

    #[error("invalid API key")]
    InvalidSecret,

    #[error("no usable credential in the pool")]
    NoCredentialAvailable,

    #[error("invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to get user info: {0}")]
    SessionResolution(String),

    #[error("failed to create conversation: {0}")]
    ConversationCreation(String),

    #[error("upstream returned status {status}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ProxyError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ProxyError::NotFound("unknown credential".to_string()),
            StoreError::InvalidSecret(message) => ProxyError::InvalidPayload(message),
            StoreError::Expired => {
                ProxyError::InvalidPayload("cannot enable an expired credential".to_string())
            }
            other => ProxyError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ProxyError::MissingSecret => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "missing API key".to_string(),
            ),
            ProxyError::InvalidSecret => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid API key".to_string(),
            ),
            ProxyError::NoCredentialAvailable => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid or expired token".to_string(),
            ),
            ProxyError::InvalidPayload(message) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", message)
            }
            ProxyError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found_error", message),
            ProxyError::SessionResolution(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "api_error",
                format!("failed to get user info: {}", message),
            ),
            ProxyError::ConversationCreation(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "api_error",
                format!("failed to create conversation: {}", message),
            ),
            ProxyError::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "upstream_error",
                message,
            ),
            ProxyError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "api_error", message)
            }
        };

        log::error!("request failed ({}): {}", error_type, message);
        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
            }
        }));
        (status, body).into_response()
    }
}
