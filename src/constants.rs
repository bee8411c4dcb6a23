//! Process-wide defaults shared by the config layer and the server.

/// Default TCP port for the HTTP listener.
pub const DEFAULT_PORT: u16 = 8000;

/// Default upstream API root.
pub const DEFAULT_UPSTREAM_BASE: &str = "https://api.1min.ai";

/// Admin secret used when `AUTH_SECRET` is unset. Startup warns about it.
pub const DEFAULT_AUTH_SECRET: &str = "your-secret-key-here";

/// How long a resolved session context stays fresh, in milliseconds.
pub const DEFAULT_SESSION_TTL_MS: i64 = 3_600_000;

/// How often the expiry sweep walks the credential store, in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 3_600_000;

/// Directory created under the platform data dir when `MINPROXY_DATA_DIR` is unset.
pub const DATA_DIR_NAME: &str = "minproxy";

/// Catalog file consulted by `GET /v1/models`.
pub const DEFAULT_MODELS_FILE: &str = "models.json";

/// Directory served for requests no API route claims.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Connect timeout applied to upstream requests, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Title given to conversations opened for an empty prompt.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Chat";
