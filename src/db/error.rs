use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored record is not decodable: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("unknown credential")]
    NotFound,

    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    #[error("credential is past its expiry")]
    Expired,
}
