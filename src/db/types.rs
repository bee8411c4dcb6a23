use serde::{Deserialize, Serialize};

/// Identity fields the chat flow needs from the upstream account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
}

/// A resolved session context plus the moment it was cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
    pub context: SessionContext,
    pub cached_at: i64,
}

/// One upstream API secret with its pool bookkeeping.
///
/// `expires_at` mirrors the secret's `exp` claim in epoch milliseconds;
/// secrets without the claim never expire on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub secret: String,
    #[serde(default)]
    pub note: String,
    pub created_at: i64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub session: Option<CachedSession>,
}

impl Credential {
    /// Usable means enabled and not past its expiry claim.
    pub fn is_usable(&self, now: i64) -> bool {
        !self.disabled && self.expires_at.map_or(true, |exp| exp >= now)
    }

    /// The cached session context, if it was cached within `ttl_ms` of `now`.
    pub fn fresh_session(&self, now: i64, ttl_ms: i64) -> Option<&SessionContext> {
        self.session
            .as_ref()
            .filter(|cached| now - cached.cached_at < ttl_ms)
            .map(|cached| &cached.context)
    }
}
