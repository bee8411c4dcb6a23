use std::path::Path;

use crate::db::error::StoreError;
use crate::db::types::{CachedSession, Credential, SessionContext};
use crate::jwt;

/// Sled-backed credential pool.
///
/// Records are keyed by the secret itself and stored as JSON, so the on-disk
/// format survives field additions without a migration step.
#[derive(Clone)]
pub struct CredentialStore {
    db: sled::Db,
}

impl CredentialStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// Registers a secret, overwriting any previous record for it.
    ///
    /// The expiry claim is read from the secret at this point; secrets that
    /// are already past it come back disabled rather than being rejected.
    pub fn register(&self, secret: &str, note: &str, now: i64) -> Result<Credential, StoreError> {
        let expires_at =
            jwt::expiry_millis(secret).map_err(|e| StoreError::InvalidSecret(e.to_string()))?;
        let credential = Credential {
            secret: secret.to_string(),
            note: note.to_string(),
            created_at: now,
            disabled: expires_at.is_some_and(|exp| exp < now),
            expires_at,
            session: None,
        };
        self.put(&credential)?;
        Ok(credential)
    }

    pub fn get(&self, secret: &str) -> Result<Credential, StoreError> {
        let bytes = self.db.get(secret.as_bytes())?.ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Every stored credential, skipping records that no longer decode.
    pub fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let mut credentials = Vec::new();
        for entry in self.db.iter() {
            let (key, value) = entry?;
            match serde_json::from_slice::<Credential>(&value) {
                Ok(credential) => credentials.push(credential),
                Err(e) => log::warn!(
                    "skipping undecodable credential record {}: {}",
                    String::from_utf8_lossy(&key),
                    e
                ),
            }
        }
        Ok(credentials)
    }

    pub fn remove(&self, secret: &str) -> Result<(), StoreError> {
        self.db
            .remove(secret.as_bytes())?
            .ok_or(StoreError::NotFound)?;
        Ok(())
    }

    pub fn disable(&self, secret: &str) -> Result<(), StoreError> {
        let mut credential = self.get(secret)?;
        credential.disabled = true;
        self.put(&credential)
    }

    /// Re-enables a credential. Refused for secrets whose expiry has passed.
    pub fn enable(&self, secret: &str, now: i64) -> Result<(), StoreError> {
        let mut credential = self.get(secret)?;
        if credential.expires_at.is_some_and(|exp| exp < now) {
            return Err(StoreError::Expired);
        }
        credential.disabled = false;
        self.put(&credential)
    }

    pub fn update_note(&self, secret: &str, note: &str) -> Result<(), StoreError> {
        let mut credential = self.get(secret)?;
        credential.note = note.to_string();
        self.put(&credential)
    }

    /// Stores a freshly resolved session context against its credential.
    pub fn cache_session(
        &self,
        secret: &str,
        context: SessionContext,
        now: i64,
    ) -> Result<(), StoreError> {
        let mut credential = self.get(secret)?;
        credential.session = Some(CachedSession {
            context,
            cached_at: now,
        });
        self.put(&credential)
    }

    /// Flips every enabled-but-expired credential to disabled and returns
    /// how many were flipped.
    pub fn disable_expired(&self, now: i64) -> Result<usize, StoreError> {
        let mut flipped = 0;
        for credential in self.list()? {
            if !credential.disabled && credential.expires_at.is_some_and(|exp| exp < now) {
                self.disable(&credential.secret)?;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    fn put(&self, credential: &Credential) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(credential)?;
        self.db.insert(credential.secret.as_bytes(), bytes)?;
        Ok(())
    }
}
