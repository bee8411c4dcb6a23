//! Session context resolution with per-credential caching.

use serde_json::Value;

use crate::db::{Credential, CredentialStore, SessionContext};
use crate::proxy::errors::{ProxyError, ProxyResult};
use crate::proxy::upstream::UpstreamClient;

// Field locations vary by upstream account shape; per field the first
// candidate path holding a non-empty string wins.
const TEAM_ID_PATHS: &[&str] = &[
    "/user/teams/0/teamId",
    "/teams/0/teamId",
    "/teams/0/uuid",
    "/teamId",
];
const USER_ID_PATHS: &[&str] = &["/user/uuid", "/uuid", "/userId"];
const USER_NAME_PATHS: &[&str] = &["/user/teams/0/userName", "/name", "/userName"];

/// Returns the credential's session context, fetching and caching it when
/// the cached one is stale or missing.
pub async fn resolve(
    store: &CredentialStore,
    upstream: &UpstreamClient,
    credential: &Credential,
    now: i64,
    ttl_ms: i64,
) -> ProxyResult<SessionContext> {
    if let Some(context) = credential.fresh_session(now, ttl_ms) {
        log::debug!("session cache hit for credential '{}'", credential.note);
        return Ok(context.clone());
    }

    let identity = upstream.fetch_identity(&credential.secret).await?;
    let context = extract_context(&identity)?;

    // Best effort: a failed write only costs a refetch next time.
    if let Err(e) = store.cache_session(&credential.secret, context.clone(), now) {
        log::warn!("failed to persist session context: {}", e);
    }
    Ok(context)
}

/// Pulls team/user identity out of the upstream's nested user document.
/// A context is never produced without a team id.
pub fn extract_context(identity: &Value) -> ProxyResult<SessionContext> {
    let team_id = first_string(identity, TEAM_ID_PATHS).ok_or_else(|| {
        ProxyError::SessionResolution("no team id in user info response".to_string())
    })?;
    Ok(SessionContext {
        team_id,
        user_id: first_string(identity, USER_ID_PATHS).unwrap_or_default(),
        user_name: first_string(identity, USER_NAME_PATHS).unwrap_or_default(),
    })
}

fn first_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        value
            .pointer(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
