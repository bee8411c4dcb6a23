//! Random selection over the usable slice of the credential pool.

use rand::seq::IndexedRandom;

use crate::db::{Credential, CredentialStore};
use crate::proxy::errors::{ProxyError, ProxyResult};

/// Picks one usable credential for a request, or fails when none is left.
pub fn pick(store: &CredentialStore, now: i64) -> ProxyResult<Credential> {
    let credentials = store.list()?;
    select(&credentials, now)
        .cloned()
        .ok_or(ProxyError::NoCredentialAvailable)
}

/// Uniformly random choice from the usable subset. Read-only: selection is
/// advisory and non-exclusive, concurrent requests may land on the same
/// credential.
pub fn select(credentials: &[Credential], now: i64) -> Option<&Credential> {
    let usable: Vec<&Credential> = credentials
        .iter()
        .filter(|credential| credential.is_usable(now))
        .collect();
    usable.choose(&mut rand::rng()).copied()
}
