//! Integration tests for `checkpoint show` and `checkpoint reset`.

mod common;

use common::Sandbox;
use predicates::prelude::*;
use serde_json::Value;

fn show(sandbox: &Sandbox, args: &[&str]) -> Value {
    let output = sandbox
        .cmd()
        .args(["checkpoint", "show"])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_show_without_checkpoints() {
    let sandbox = Sandbox::new();
    let value = show(&sandbox, &[]);

    for input in ["events", "users", "groups", "shared_folders"] {
        assert_eq!(value[input]["state"], "missing", "{input}");
    }
}

#[test]
fn test_show_current_checkpoint() {
    let sandbox = Sandbox::new();
    sandbox.write_checkpoint(
        "events",
        r#"{"input_type": "events", "last_seen": {"kind": "timestamp", "value": "2024-03-01T10:00:00Z"}}"#,
    );

    let value = show(&sandbox, &["events"]);

    assert_eq!(value["events"]["state"], "current");
    assert!(value.get("users").is_none());
}

#[test]
fn test_show_does_not_migrate_or_back_up() {
    let sandbox = Sandbox::new();
    sandbox.write_checkpoint("events", "1709287200");
    sandbox.write_checkpoint("users", "{garbage");

    let value = show(&sandbox, &[]);

    assert_eq!(value["events"]["state"], "legacy");
    assert_eq!(value["users"]["state"], "corrupt");
    assert_eq!(
        std::fs::read_to_string(sandbox.checkpoint_file("events")).unwrap(),
        "1709287200"
    );
    assert!(sandbox.checkpoint_file("users").exists());
}

#[test]
fn test_reset_single_input() {
    let sandbox = Sandbox::new();
    sandbox.write_checkpoint("groups", "1709287200");

    sandbox
        .cmd()
        .args(["checkpoint", "reset", "groups"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset checkpoint for groups"));
    assert!(!sandbox.checkpoint_file("groups").exists());

    sandbox
        .cmd()
        .args(["checkpoint", "reset", "groups"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No checkpoint stored for groups"));
}

#[test]
fn test_reset_all() {
    let sandbox = Sandbox::new();
    sandbox.write_checkpoint("events", "1709287200");
    sandbox.write_checkpoint("shared_folders", "1709287200");

    sandbox
        .cmd()
        .args(["checkpoint", "reset", "--all"])
        .assert()
        .success();

    assert!(!sandbox.checkpoint_file("events").exists());
    assert!(!sandbox.checkpoint_file("shared_folders").exists());
}

#[test]
fn test_reset_rejects_unknown_input() {
    Sandbox::new()
        .cmd()
        .args(["checkpoint", "reset", "devices"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown input type"));
}
