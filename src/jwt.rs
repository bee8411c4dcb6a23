//! Best-effort expiry extraction from JWT-shaped secrets.
//!
//! Upstream secrets are JWTs, but the proxy never verifies signatures. It
//! only needs the `exp` claim to know when a credential stops working, so
//! this module decodes the middle segment and nothing else.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("secret is not a three-segment token")]
    Segments,
    #[error("claims segment is not valid base64url: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("claims segment is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Reads the unverified `exp` claim and returns it as epoch milliseconds.
///
/// Returns `Ok(None)` for well-formed tokens that simply carry no `exp`.
pub fn expiry_millis(secret: &str) -> Result<Option<i64>, ClaimError> {
    let mut segments = secret.split('.');
    let (Some(_), Some(payload), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimError::Segments);
    };

    // Tolerate issuers that pad the segment even though JWS forbids it.
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&decoded)?;
    Ok(claims.exp.map(|seconds| seconds * 1000))
}
