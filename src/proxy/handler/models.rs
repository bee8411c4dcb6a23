use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::catalog;
use crate::proxy::router::SharedState;
use crate::proxy::types::openai::ModelList;

/// `GET /v1/models`. The catalog file is re-read on every call, so
/// operators can edit it without a restart.
pub async fn list_models(State(state): State<Arc<SharedState>>) -> Json<ModelList> {
    Json(catalog::load(&state.config.models_file).await)
}
