//! An OpenAI-compatible chat-completions gateway backed by the 1min.ai
//! conversation API.
//!
//! The library half holds the translation engine and the credential store;
//! the binary half ([`run`]) wires them to an axum server. Nothing in the
//! translation path needs a network to be unit-tested.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod jwt;
pub mod logger;
pub mod proxy;
pub mod server;

use anyhow::Context;

use crate::config::Config;
use crate::db::CredentialStore;
use crate::proxy::upstream::UpstreamClient;
use crate::proxy::SharedState;

/// Reads the environment, wires logging, storage and the upstream client,
/// then serves until shutdown.
pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env();
    logger::setup_logger(config.log_dir.as_deref()).context("failed to initialize logger")?;
    if config.auth_secret == constants::DEFAULT_AUTH_SECRET {
        log::warn!("AUTH_SECRET is unset; using the well-known development secret");
    }
    log::info!(
        "starting minproxy: port={} upstream={}",
        config.port,
        config.upstream_base_url
    );

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create data dir {}", config.data_dir.display()))?;
    let store = CredentialStore::open(&config.data_dir.join("credentials"))
        .context("failed to open credential store")?;
    let upstream =
        UpstreamClient::new(&config.upstream_base_url).context("failed to build upstream client")?;

    server::serve(SharedState {
        config,
        store,
        upstream,
    })
    .await
}
