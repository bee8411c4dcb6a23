//! Shared plumbing for the integration tests: a router wired to a throwaway
//! store and a wiremock upstream.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tempfile::TempDir;

use minproxy::config::Config;
use minproxy::db::CredentialStore;
use minproxy::proxy::upstream::UpstreamClient;
use minproxy::proxy::{routes, SharedState};

pub const ADMIN_SECRET: &str = "admin-secret";

pub struct TestApp {
    pub router: Router,
    pub store: CredentialStore,
    _dir: TempDir,
}

/// Builds an unsigned JWT-shaped upstream secret. `exp_secs` is epoch
/// seconds.
pub fn make_secret(seed: &str, exp_secs: Option<i64>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = match exp_secs {
        Some(exp) => format!(r#"{{"sub":"{seed}","exp":{exp}}}"#),
        None => format!(r#"{{"sub":"{seed}"}}"#),
    };
    format!("{}.{}.sig", header, URL_SAFE_NO_PAD.encode(claims.as_bytes()))
}

/// A full application router talking to `upstream_url`, with an empty
/// credential pool and a small model catalog on disk.
pub fn build_app(upstream_url: &str) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("models.json"),
        r#"{"models": [
            {"modelId": "gpt-5", "provider": "openai", "status": "ACTIVE",
             "createdAt": "2024-05-01T00:00:00Z"},
            {"modelId": "gpt-4-32k", "provider": "openai", "status": "DEPRECATED"}
        ]}"#,
    )
    .expect("write models.json");

    let store = CredentialStore::open(&dir.path().join("pool")).expect("open store");
    let config = Config {
        port: 0,
        auth_secret: ADMIN_SECRET.to_string(),
        upstream_base_url: upstream_url.to_string(),
        data_dir: dir.path().to_path_buf(),
        models_file: dir.path().join("models.json"),
        session_ttl_ms: 3_600_000,
        sweep_interval_ms: 3_600_000,
        log_dir: None,
        static_dir: dir.path().join("public"),
    };
    let router = routes(SharedState {
        config,
        store: store.clone(),
        upstream: UpstreamClient::new(upstream_url).expect("upstream client"),
    });

    TestApp {
        router,
        store,
        _dir: dir,
    }
}

pub fn request(
    method: &str,
    uri: &str,
    secret: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(secret) = secret {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", secret));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(value).expect("encode body")))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
