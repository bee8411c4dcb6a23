//! Shared-secret authentication for the chat and admin surfaces.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::proxy::errors::ProxyError;
use crate::proxy::router::SharedState;

/// Pulls the caller's secret from `Authorization: Bearer` or `x-api-key`,
/// in that order. Empty values count as absent.
pub fn client_secret(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    bearer.or(api_key).map(str::to_string)
}

/// Middleware gate: the configured admin secret must be presented.
pub async fn require_secret(
    State(state): State<Arc<SharedState>>,
    request: Request,
    next: Next,
) -> Result<Response, ProxyError> {
    let Some(presented) = client_secret(request.headers()) else {
        log::warn!("rejected {}: no secret presented", request.uri().path());
        return Err(ProxyError::MissingSecret);
    };
    if presented != state.config.auth_secret {
        log::warn!("rejected {}: wrong secret", request.uri().path());
        return Err(ProxyError::InvalidSecret);
    }
    Ok(next.run(request).await)
}
