//! Model catalog behind `GET /v1/models`.
//!
//! The catalog is a JSON file holding the upstream's model inventory. It is
//! a read-only collaborator: this module filters it down to the active
//! entries and reshapes them for the OpenAI listing.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::proxy::types::openai::{ModelEntry, ModelList};

#[derive(Debug, Error)]
enum CatalogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Vec<CatalogModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogModel {
    model_id: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    created_at: Option<String>,
}

/// Reads the catalog and keeps the ACTIVE entries. An unreadable file or
/// malformed JSON yields an empty list; the route never errors.
pub async fn load(path: &Path) -> ModelList {
    let data = match read_catalog(path).await {
        Ok(models) => models,
        Err(e) => {
            log::warn!("model catalog {} unreadable: {}", path.display(), e);
            Vec::new()
        }
    };
    ModelList {
        object: "list".to_string(),
        data,
    }
}

async fn read_catalog(path: &Path) -> Result<Vec<ModelEntry>, CatalogError> {
    let raw = tokio::fs::read(path).await?;
    let catalog: CatalogFile = serde_json::from_slice(&raw)?;
    let now = Utc::now().timestamp();
    Ok(catalog
        .models
        .into_iter()
        .filter(|model| model.status == "ACTIVE")
        .map(|model| {
            let created = model
                .created_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|parsed| parsed.timestamp())
                .unwrap_or(now);
            ModelEntry {
                id: model.model_id,
                object: "model".to_string(),
                created,
                owned_by: model.provider,
            }
        })
        .collect())
}
