//! Route table and shared application state.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::db::CredentialStore;
use crate::proxy::auth;
use crate::proxy::handler::{admin, chat, models};
use crate::proxy::upstream::UpstreamClient;

/// Everything a request handler can reach. Built once at startup and handed
/// to the router; no global state anywhere.
pub struct SharedState {
    pub config: Config,
    pub store: CredentialStore,
    pub upstream: UpstreamClient,
}

/// Builds the application router.
///
/// The chat and admin routes sit behind the shared-secret middleware; the
/// root, health and model-catalog routes are public. Everything unmatched
/// falls through to the static file service.
pub fn routes(state: SharedState) -> Router {
    let state = Arc::new(state);

    let protected = Router::new()
        .route("/v1/chat/completions", post(chat::chat_completions))
        .route(
            "/admin/tokens",
            post(admin::register_token).get(admin::list_tokens),
        )
        .route("/admin/tokens/{secret}", delete(admin::delete_token))
        .route("/admin/tokens/{secret}/disable", post(admin::disable_token))
        .route("/admin/tokens/{secret}/enable", post(admin::enable_token))
        .route("/admin/tokens/{secret}/note", put(admin::update_note))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_secret,
        ));

    let public = Router::new()
        .route("/", get(|| async { "1min.ai proxy is running" }))
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/v1/models", get(models::list_models));

    let static_dir = state.config.static_dir.clone();
    Router::new()
        .merge(protected)
        .merge(public)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
