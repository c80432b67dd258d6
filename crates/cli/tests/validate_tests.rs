//! Integration tests for `validate`.

mod common;

use common::{CUSTOMER_ID, PROVISIONING_HASH, Sandbox};
use predicates::prelude::*;

#[test]
fn test_validate_reports_settings_without_secrets() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd_with_credentials()
        .args(["--inputs", "events,users", "validate"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Configuration OK"))
        .stdout(predicate::str::contains(CUSTOMER_ID))
        .stdout(predicate::str::contains("events, users"))
        .stdout(predicate::str::contains(PROVISIONING_HASH).not());
}

#[test]
fn test_missing_credentials_exit_5() {
    Sandbox::new()
        .cmd()
        .arg("validate")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("customer ID"));
}

#[test]
fn test_malformed_customer_id_exit_5() {
    Sandbox::new()
        .cmd_with_credentials()
        .env("LASTPASS_CID", "87a1312")
        .arg("validate")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Malformed customer ID"));
}

#[test]
fn test_credentials_from_config_file() {
    let sandbox = Sandbox::new();
    sandbox.write_config(&format!(
        r#"{{"customer_id": "{CUSTOMER_ID}", "provisioning_hash": "{PROVISIONING_HASH}"}}"#
    ));
    sandbox
        .cmd()
        .arg("validate")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Provisioning hash: inline"))
        .stdout(predicate::str::contains(PROVISIONING_HASH).not());
}

#[test]
fn test_http_api_url_is_rejected() {
    Sandbox::new()
        .cmd_with_credentials()
        .args(["--api-url", "http://lastpass.com/enterpriseapi.php", "validate"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("HTTPS"));
}

#[test]
fn test_hec_sink_without_settings_exit_5() {
    Sandbox::new()
        .cmd_with_credentials()
        .args(["--sink", "hec", "validate"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("LASTPASS_HEC_URL"));
}

#[test]
fn test_hec_check_requires_hec_settings() {
    Sandbox::new()
        .cmd_with_credentials()
        .args(["validate", "--hec"])
        .assert()
        .code(5);
}

#[test]
fn test_unparseable_config_file_exit_5() {
    let sandbox = Sandbox::new();
    sandbox.write_config("{ not json");
    sandbox
        .cmd_with_credentials()
        .arg("validate")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("config file"));
}
