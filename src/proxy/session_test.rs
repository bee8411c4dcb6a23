use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::session::{extract_context, resolve};
use super::upstream::UpstreamClient;
use crate::db::{CredentialStore, SessionContext};

const NOW: i64 = 1_700_000_000_000;
const TTL: i64 = 3_600_000;

fn secret(seed: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = format!(r#"{{"sub":"{seed}"}}"#);
    format!("{}.{}.sig", header, URL_SAFE_NO_PAD.encode(claims.as_bytes()))
}

fn open_store() -> (TempDir, CredentialStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = CredentialStore::open(&dir.path().join("pool")).expect("open store");
    (dir, store)
}

fn context(team: &str) -> SessionContext {
    SessionContext {
        team_id: team.to_string(),
        user_id: "user-1".to_string(),
        user_name: "Pat".to_string(),
    }
}

#[test]
fn team_id_fallback_chain_is_ordered() {
    let identity = json!({
        "user": {"teams": [{"teamId": "nested"}]},
        "teams": [{"teamId": "flat", "uuid": "flat-uuid"}],
        "teamId": "top"
    });
    assert_eq!(extract_context(&identity).unwrap().team_id, "nested");

    let identity = json!({
        "teams": [{"teamId": "flat", "uuid": "flat-uuid"}],
        "teamId": "top"
    });
    assert_eq!(extract_context(&identity).unwrap().team_id, "flat");

    let identity = json!({
        "teams": [{"uuid": "flat-uuid"}],
        "teamId": "top"
    });
    assert_eq!(extract_context(&identity).unwrap().team_id, "flat-uuid");

    let identity = json!({"teamId": "top"});
    assert_eq!(extract_context(&identity).unwrap().team_id, "top");
}

#[test]
fn empty_string_candidates_fall_through() {
    let identity = json!({
        "user": {"teams": [{"teamId": ""}]},
        "teams": [{"teamId": "flat"}]
    });
    assert_eq!(extract_context(&identity).unwrap().team_id, "flat");
}

#[test]
fn missing_team_id_is_an_error() {
    assert!(extract_context(&json!({"name": "Pat"})).is_err());
    assert!(extract_context(&json!({"teamId": ""})).is_err());
    assert!(extract_context(&json!({"teamId": 42})).is_err());
}

#[test]
fn user_fields_are_optional() {
    let context = extract_context(&json!({"teamId": "t1"})).unwrap();
    assert_eq!(context.team_id, "t1");
    assert_eq!(context.user_id, "");
    assert_eq!(context.user_name, "");
}

#[test]
fn user_name_prefers_team_member_name() {
    let identity = json!({
        "user": {"teams": [{"teamId": "t1", "userName": "member"}]},
        "name": "account",
        "userName": "legacy"
    });
    assert_eq!(extract_context(&identity).unwrap().user_name, "member");

    let identity = json!({"teamId": "t1", "name": "account", "userName": "legacy"});
    assert_eq!(extract_context(&identity).unwrap().user_name, "account");
}

#[tokio::test]
async fn fresh_cache_short_circuits_the_identity_call() {
    let (_dir, store) = open_store();
    let s = secret("a");
    store.register(&s, "", NOW).unwrap();
    store.cache_session(&s, context("team-1"), NOW).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let upstream = UpstreamClient::new(&server.uri()).unwrap();
    let credential = store.get(&s).unwrap();
    let resolved = resolve(&store, &upstream, &credential, NOW + 1_000, TTL)
        .await
        .unwrap();
    assert_eq!(resolved, context("team-1"));
}

#[tokio::test]
async fn stale_cache_refetches_and_persists() {
    let (_dir, store) = open_store();
    let s = secret("a");
    store.register(&s, "", NOW).unwrap();
    store.cache_session(&s, context("old-team"), NOW).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("x-auth-token", format!("Bearer {}", s)))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "uuid": "user-9",
                "teams": [{"teamId": "team-9", "userName": "Riley"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upstream = UpstreamClient::new(&server.uri()).unwrap();
    let credential = store.get(&s).unwrap();
    let later = NOW + TTL; // exactly at the boundary counts as stale
    let resolved = resolve(&store, &upstream, &credential, later, TTL)
        .await
        .unwrap();

    assert_eq!(resolved.team_id, "team-9");
    assert_eq!(resolved.user_id, "user-9");
    assert_eq!(resolved.user_name, "Riley");

    let cached = store.get(&s).unwrap().session.unwrap();
    assert_eq!(cached.cached_at, later);
    assert_eq!(cached.context, resolved);
}

#[tokio::test]
async fn identity_failure_is_a_session_error() {
    let (_dir, store) = open_store();
    let s = secret("a");
    store.register(&s, "", NOW).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let upstream = UpstreamClient::new(&server.uri()).unwrap();
    let credential = store.get(&s).unwrap();
    let err = resolve(&store, &upstream, &credential, NOW, TTL)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        crate::proxy::errors::ProxyError::SessionResolution(_)
    ));
}
