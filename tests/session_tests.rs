//! Tests for session persistence
//!
//! The token and user record live in one file and are cleared together.

use std::fs;
use std::sync::Arc;

use chrono::{Duration, Utc};
use dlvery::models::{LoginResponse, Role};
use dlvery::session::{decode_claims, FileSessionStore, SessionManager, SessionStore};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tempfile::TempDir;

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

fn jwt(sub: &str, expires_in: Duration) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-side-secret")).unwrap()
}

fn login(token: String) -> LoginResponse {
    LoginResponse {
        id: "u-7".to_string(),
        username: "rajesh".to_string(),
        email: "rajesh@dlvery.io".to_string(),
        full_name: "Rajesh Patel".to_string(),
        role: Role::InvTeam,
        token,
        token_type: "Bearer".to_string(),
    }
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.json");

    {
        let session = SessionManager::new(Arc::new(FileSessionStore::new(&path))).unwrap();
        session.establish(&login("tok-abc".to_string())).unwrap();
    }
    assert!(path.exists(), "Session file must be written on login");

    let restored = SessionManager::new(Arc::new(FileSessionStore::new(&path))).unwrap();
    assert!(restored.is_authenticated());
    assert!(restored.is_inventory_team());
    assert_eq!(restored.token().as_deref(), Some("tok-abc"));
    assert_eq!(restored.current_user().unwrap().full_name, "Rajesh Patel");
}

#[test]
fn test_logout_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let session = SessionManager::new(Arc::new(FileSessionStore::new(&path))).unwrap();

    session.establish(&login("tok-abc".to_string())).unwrap();
    session.logout().unwrap();

    assert!(!path.exists());
    assert!(!session.is_authenticated());
    // Logging out twice is harmless.
    session.logout().unwrap();
}

#[test]
fn test_corrupt_file_reads_as_signed_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ not json").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.load().unwrap().is_none());

    let session = SessionManager::new(Arc::new(store)).unwrap();
    assert!(!session.is_authenticated());
}

#[test]
fn test_missing_file_reads_as_signed_out() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path().join("absent.json"));
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let session = SessionManager::new(Arc::new(FileSessionStore::new(&path))).unwrap();
    session.establish(&login("tok-abc".to_string())).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn test_existing_loose_file_is_tightened() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "a much longer stale payload than the new session will need to overwrite").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let store = FileSessionStore::new(&path);
    SessionManager::new(Arc::new(FileSessionStore::new(&path)))
        .unwrap()
        .establish(&login("tok-abc".to_string()))
        .unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(store.load().unwrap().unwrap().token, "tok-abc");
}

#[test]
fn test_token_claims_are_readable() {
    let token = jwt("rajesh", Duration::hours(1));
    let claims = decode_claims(&token).expect("claims must decode without the signing key");
    assert_eq!(claims.sub.as_deref(), Some("rajesh"));
    assert!(!claims.is_expired_at(Utc::now()));

    let session = SessionManager::in_memory();
    session.establish(&login(token)).unwrap();
    assert!(session.token_claims().unwrap().expires_at().is_some());
}

#[test]
fn test_expired_token_detected() {
    let token = jwt("rajesh", Duration::minutes(-5));
    let claims = decode_claims(&token).unwrap();
    assert!(claims.is_expired_at(Utc::now()));
}
