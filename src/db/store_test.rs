use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tempfile::TempDir;

use super::{CredentialStore, SessionContext, StoreError};

const NOW: i64 = 1_700_000_000_000;

fn open_store() -> (TempDir, CredentialStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = CredentialStore::open(&dir.path().join("pool")).expect("open store");
    (dir, store)
}

/// Builds an unsigned JWT-shaped secret. `exp_secs` is epoch seconds.
fn secret(exp_secs: Option<i64>, seed: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = match exp_secs {
        Some(exp) => format!(r#"{{"sub":"{seed}","exp":{exp}}}"#),
        None => format!(r#"{{"sub":"{seed}"}}"#),
    };
    format!("{}.{}.sig", header, URL_SAFE_NO_PAD.encode(claims.as_bytes()))
}

fn context(team: &str) -> SessionContext {
    SessionContext {
        team_id: team.to_string(),
        user_id: "user-1".to_string(),
        user_name: "Pat".to_string(),
    }
}

#[test]
fn register_and_get_round_trip() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 + 3600), "a");

    let registered = store.register(&s, "work account", NOW).unwrap();
    assert!(!registered.disabled);
    assert_eq!(registered.expires_at, Some((NOW / 1000 + 3600) * 1000));

    let fetched = store.get(&s).unwrap();
    assert_eq!(fetched.secret, s);
    assert_eq!(fetched.note, "work account");
    assert_eq!(fetched.created_at, NOW);
    assert!(fetched.session.is_none());
}

#[test]
fn register_expired_secret_starts_disabled() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 - 60), "a");

    let registered = store.register(&s, "", NOW).unwrap();
    assert!(registered.disabled);
    assert!(!registered.is_usable(NOW));
}

#[test]
fn register_without_exp_never_expires() {
    let (_dir, store) = open_store();
    let s = secret(None, "a");

    let registered = store.register(&s, "", NOW).unwrap();
    assert_eq!(registered.expires_at, None);
    assert!(registered.is_usable(NOW + 10 * 365 * 24 * 3_600_000));
}

#[test]
fn register_rejects_malformed_secret() {
    let (_dir, store) = open_store();
    let err = store.register("not-a-jwt", "", NOW).unwrap_err();
    assert!(matches!(err, StoreError::InvalidSecret(_)));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn register_overwrites_existing_record() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 + 3600), "a");

    store.register(&s, "first", NOW).unwrap();
    store.cache_session(&s, context("team-1"), NOW).unwrap();
    store.register(&s, "second", NOW + 1).unwrap();

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].note, "second");
    // Re-registering starts a clean record, dropping the cached session.
    assert!(all[0].session.is_none());
}

#[test]
fn disable_then_enable_round_trip() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 + 3600), "a");
    store.register(&s, "", NOW).unwrap();

    store.disable(&s).unwrap();
    assert!(!store.get(&s).unwrap().is_usable(NOW));

    store.enable(&s, NOW).unwrap();
    assert!(store.get(&s).unwrap().is_usable(NOW));
}

#[test]
fn enable_refuses_expired_secret() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 + 60), "a");
    store.register(&s, "", NOW).unwrap();
    store.disable(&s).unwrap();

    let later = NOW + 120_000;
    assert!(matches!(store.enable(&s, later), Err(StoreError::Expired)));
    assert!(store.get(&s).unwrap().disabled);
}

#[test]
fn unknown_secret_is_not_found() {
    let (_dir, store) = open_store();
    assert!(matches!(store.get("missing"), Err(StoreError::NotFound)));
    assert!(matches!(store.remove("missing"), Err(StoreError::NotFound)));
    assert!(matches!(store.disable("missing"), Err(StoreError::NotFound)));
    assert!(matches!(
        store.enable("missing", NOW),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn remove_deletes_the_record() {
    let (_dir, store) = open_store();
    let s = secret(None, "a");
    store.register(&s, "", NOW).unwrap();

    store.remove(&s).unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn update_note_keeps_other_fields() {
    let (_dir, store) = open_store();
    let s = secret(Some(NOW / 1000 + 3600), "a");
    store.register(&s, "old", NOW).unwrap();

    store.update_note(&s, "new").unwrap();
    let credential = store.get(&s).unwrap();
    assert_eq!(credential.note, "new");
    assert_eq!(credential.created_at, NOW);
}

#[test]
fn cached_session_is_fresh_within_ttl_only() {
    let (_dir, store) = open_store();
    let s = secret(None, "a");
    store.register(&s, "", NOW).unwrap();
    store.cache_session(&s, context("team-1"), NOW).unwrap();

    let credential = store.get(&s).unwrap();
    let ttl = 3_600_000;
    assert_eq!(
        credential.fresh_session(NOW + ttl - 1, ttl),
        Some(&context("team-1"))
    );
    // The TTL boundary itself counts as stale.
    assert_eq!(credential.fresh_session(NOW + ttl, ttl), None);
}

#[test]
fn disable_expired_flips_only_expired_credentials() {
    let (_dir, store) = open_store();
    let live = secret(Some(NOW / 1000 + 3600), "live");
    let expiring = secret(Some(NOW / 1000 + 60), "soon");
    let eternal = secret(None, "eternal");
    store.register(&live, "", NOW).unwrap();
    store.register(&expiring, "", NOW).unwrap();
    store.register(&eternal, "", NOW).unwrap();

    let later = NOW + 120_000;
    assert_eq!(store.disable_expired(later).unwrap(), 1);
    assert!(!store.get(&expiring).unwrap().is_usable(later));
    assert!(store.get(&live).unwrap().is_usable(later));
    assert!(store.get(&eternal).unwrap().is_usable(later));

    // A second sweep finds nothing left to flip.
    assert_eq!(store.disable_expired(later).unwrap(), 0);
}
