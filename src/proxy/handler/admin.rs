//! Operator surface for the credential pool. Everything here sits behind
//! the same shared-secret middleware as the chat route.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::proxy::errors::ProxyResult;
use crate::proxy::router::SharedState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

/// `POST /admin/tokens`: add a credential, or refresh an existing one.
pub async fn register_token(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<RegisterRequest>,
) -> ProxyResult<Json<Value>> {
    let now = Utc::now().timestamp_millis();
    let credential = state.store.register(&request.token, &request.note, now)?;
    log::info!(
        "registered credential '{}' (expires_at: {:?})",
        credential.note,
        credential.expires_at
    );
    Ok(Json(
        json!({ "success": true, "expires_at": credential.expires_at }),
    ))
}

/// `GET /admin/tokens`: the whole pool, secrets included. Operator-only by
/// construction; this never serves unauthenticated callers.
pub async fn list_tokens(State(state): State<Arc<SharedState>>) -> ProxyResult<Json<Value>> {
    let tokens = state.store.list()?;
    Ok(Json(json!({ "tokens": tokens })))
}

/// `POST /admin/tokens/{secret}/disable`.
pub async fn disable_token(
    State(state): State<Arc<SharedState>>,
    Path(secret): Path<String>,
) -> ProxyResult<Json<Value>> {
    state.store.disable(&secret)?;
    Ok(Json(json!({ "success": true })))
}

/// `POST /admin/tokens/{secret}/enable`. Refused (400) when the
/// credential's expiry has already passed.
pub async fn enable_token(
    State(state): State<Arc<SharedState>>,
    Path(secret): Path<String>,
) -> ProxyResult<Json<Value>> {
    state.store.enable(&secret, Utc::now().timestamp_millis())?;
    Ok(Json(json!({ "success": true })))
}

/// `DELETE /admin/tokens/{secret}`.
pub async fn delete_token(
    State(state): State<Arc<SharedState>>,
    Path(secret): Path<String>,
) -> ProxyResult<Json<Value>> {
    state.store.remove(&secret)?;
    Ok(Json(json!({ "success": true })))
}

/// `PUT /admin/tokens/{secret}/note`.
pub async fn update_note(
    State(state): State<Arc<SharedState>>,
    Path(secret): Path<String>,
    Json(request): Json<NoteRequest>,
) -> ProxyResult<Json<Value>> {
    state.store.update_note(&secret, &request.note)?;
    Ok(Json(json!({ "success": true })))
}
