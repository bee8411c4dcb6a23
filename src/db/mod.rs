pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::CredentialStore;
pub use types::{CachedSession, Credential, SessionContext};

#[cfg(test)]
mod store_test;
