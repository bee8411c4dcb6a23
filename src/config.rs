//! Environment-driven configuration, read once at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Shared secret protecting the chat and admin routes.
    pub auth_secret: String,
    pub upstream_base_url: String,
    pub data_dir: PathBuf,
    pub models_file: PathBuf,
    pub session_ttl_ms: i64,
    pub sweep_interval_ms: u64,
    /// When set, logs also go to a file under this directory.
    pub log_dir: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl Config {
    /// Reads every setting from the environment, falling back to defaults.
    /// Unparseable numeric values silently fall back too.
    pub fn from_env() -> Self {
        Self {
            port: parsed("PORT", constants::DEFAULT_PORT),
            auth_secret: env::var("AUTH_SECRET")
                .unwrap_or_else(|_| constants::DEFAULT_AUTH_SECRET.to_string()),
            upstream_base_url: env::var("MINAI_BASE_URL")
                .unwrap_or_else(|_| constants::DEFAULT_UPSTREAM_BASE.to_string()),
            data_dir: env::var("MINPROXY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir()),
            models_file: env::var("MINPROXY_MODELS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_MODELS_FILE)),
            session_ttl_ms: parsed("MINPROXY_SESSION_TTL_MS", constants::DEFAULT_SESSION_TTL_MS),
            sweep_interval_ms: parsed(
                "MINPROXY_SWEEP_INTERVAL_MS",
                constants::DEFAULT_SWEEP_INTERVAL_MS,
            ),
            log_dir: env::var("MINPROXY_LOG_DIR").ok().map(PathBuf::from),
            static_dir: env::var("MINPROXY_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_STATIC_DIR)),
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::DATA_DIR_NAME)
}
