//! `.env` handling: credentials and start time may come from a dotenv file in
//! the working directory, and a broken file never echoes its contents.

use chrono::{Duration as ChronoDuration, Utc};
use secrecy::ExposeSecret;
use serial_test::serial;
use tempfile::TempDir;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::SecureValue;

const VARS: [&str; 5] = [
    "LASTPASS_CID",
    "LASTPASS_PROVHASH",
    "LASTPASS_TIME_START",
    "LASTPASS_CONFIG_PATH",
    "DOTENV_DISABLED",
];

/// Run `f` from a fresh directory holding `.env` (when given) and an empty
/// config file, with the collector's variables cleared and restored after.
fn in_project_dir<R>(
    dotenv: Option<&str>,
    disabled: Option<&str>,
    f: impl FnOnce(&TempDir) -> R,
) -> R {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();
    if let Some(contents) = dotenv {
        std::fs::write(dir.path().join(".env"), contents).unwrap();
    }

    let vars = VARS.map(|name| {
        let value = (name == "DOTENV_DISABLED").then_some(disabled).flatten();
        (name, value)
    });
    temp_env::with_vars(vars, || {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = f(&dir);
        std::env::set_current_dir(previous).unwrap();
        result
    })
}

fn load(dir: &TempDir) -> Result<crate::Config, ConfigError> {
    ConfigLoader::new()
        .load_dotenv()?
        .with_config_path(dir.path().join("config.json"))
        .with_checkpoint_dir(dir.path().join("checkpoints"))
        .from_file()?
        .from_env()?
        .build()
}

#[test]
#[serial]
fn test_missing_dotenv_is_ignored() {
    let _lock = env_lock().lock().unwrap();
    let config = in_project_dir(None, None, load).unwrap();
    assert!(config.credentials.customer_id.is_none());
    assert!(config.collection.time_start.is_none());
}

#[test]
#[serial]
fn test_dotenv_supplies_credentials_and_start_time() {
    let _lock = env_lock().lock().unwrap();
    let start = (Utc::now() - ChronoDuration::days(2)).timestamp();
    let dotenv = format!(
        "LASTPASS_CID=8771312\nLASTPASS_PROVHASH=dotenv-hash-value\nLASTPASS_TIME_START={start}\n"
    );

    let config = in_project_dir(Some(&dotenv), None, load).unwrap();

    assert_eq!(config.credentials.customer_id.as_deref(), Some("8771312"));
    match config.credentials.provisioning_hash {
        Some(SecureValue::Plain(hash)) => assert_eq!(hash.expose_secret(), "dotenv-hash-value"),
        other => panic!("expected an inline hash, got {other:?}"),
    }
    assert_eq!(
        config.collection.time_start.map(|t| t.timestamp()),
        Some(start)
    );
}

#[test]
#[serial]
fn test_process_environment_beats_dotenv() {
    let _lock = env_lock().lock().unwrap();
    let config = in_project_dir(Some("LASTPASS_CID=111\n"), None, |dir| {
        temp_env::with_var("LASTPASS_CID", Some("222"), || load(dir))
    })
    .unwrap();
    assert_eq!(config.credentials.customer_id.as_deref(), Some("222"));
}

#[test]
#[serial]
fn test_parse_error_hides_provisioning_hash() {
    let _lock = env_lock().lock().unwrap();
    let secret = "5f4dcc3b5aa765d61d8327deb882cf99";
    let dotenv = format!("LASTPASS_PROVHASH={secret}\nMISSING_ASSIGNMENT\n");

    let err = in_project_dir(Some(&dotenv), None, load).unwrap_err();

    assert!(matches!(err, ConfigError::DotenvParse { .. }), "got {err:?}");
    let message = err.to_string();
    assert!(!message.contains(secret), "leaked: {message}");
    assert!(message.contains("DOTENV_DISABLED"), "no hint: {message}");
}

#[test]
#[serial]
fn test_disabled_dotenv_is_not_read() {
    let _lock = env_lock().lock().unwrap();
    for value in ["1", "true"] {
        let dotenv = "LASTPASS_CID=8771312\nMISSING_ASSIGNMENT\n";
        let config = in_project_dir(Some(dotenv), Some(value), load)
            .unwrap_or_else(|e| panic!("DOTENV_DISABLED={value} still read .env: {e}"));
        assert!(config.credentials.customer_id.is_none());
    }

    let err = in_project_dir(Some("MISSING_ASSIGNMENT\n"), Some("false"), load).unwrap_err();
    assert!(matches!(err, ConfigError::DotenvParse { .. }));
}
