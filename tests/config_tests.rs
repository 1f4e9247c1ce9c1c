//! Tests for configuration loading
//!
//! These touch process-wide environment variables, so they run serially.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dlvery::config::{ClientConfig, DEFAULT_API_URL};
use dlvery::error::ClientError;
use serial_test::serial;
use tokio_test::{assert_err, assert_ok};

const VARS: [&str; 5] = [
    "DLVERY_API_URL",
    "DLVERY_TIMEOUT_MS",
    "DLVERY_RETRY_ATTEMPTS",
    "DLVERY_RETRY_DELAY_MS",
    "DLVERY_SESSION_FILE",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    let cfg = assert_ok!(ClientConfig::from_env());
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.timeout(), Duration::from_millis(15_000));
    assert_eq!(cfg.retry_attempts, 1);
    assert_eq!(cfg.retry_delay(), Duration::from_secs(1));
    assert!(cfg.session_file.is_none());
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    env::set_var("DLVERY_API_URL", "https://api.dlvery.io/api");
    env::set_var("DLVERY_TIMEOUT_MS", "2500");
    env::set_var("DLVERY_SESSION_FILE", "/tmp/dlvery-test/session.json");

    let cfg = ClientConfig::from_env();
    clear_env();

    let cfg = assert_ok!(cfg);
    assert_eq!(cfg.api_url, "https://api.dlvery.io/api");
    assert_eq!(cfg.timeout_ms, 2500);
    assert_eq!(cfg.session_path(), PathBuf::from("/tmp/dlvery-test/session.json"));
}

#[test]
#[serial]
fn test_invalid_url_rejected() {
    clear_env();
    env::set_var("DLVERY_API_URL", "localhost:8080");
    let result = ClientConfig::from_env();
    clear_env();

    match assert_err!(result) {
        ClientError::Config(message) => assert!(message.contains("localhost:8080")),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_zero_timeout_rejected() {
    let cfg = ClientConfig {
        timeout_ms: 0,
        ..ClientConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));
}

#[test]
fn test_default_session_path_is_under_dlvery() {
    let path = ClientConfig::default().session_path();
    assert!(path.ends_with("dlvery/session.json"));
}
