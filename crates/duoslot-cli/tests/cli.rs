#![allow(deprecated)]
//! CLI contract: exit codes, output formats and persistence across invocations.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn duoslot(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("duoslot").unwrap();
    cmd.env_remove("DUOSLOT_CHUNK_SIZE")
        .env_remove("DUOSLOT_MAX_VALUE_LEN")
        .env("DUOSLOT_DIR", dir);
    cmd
}

#[test]
fn set_then_get_across_invocations() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .args(["set", "session", "héllo wörld 😀", "--chunk-size", "3"])
        .assert()
        .success();

    duoslot(dir.path())
        .args(["get", "session"])
        .assert()
        .success()
        .stdout("héllo wörld 😀\n");
}

#[test]
fn get_missing_key_exits_not_found() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .args(["get", "absent"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn get_json_reports_null_for_missing_key() {
    let dir = tempdir().unwrap();

    let output = duoslot(dir.path())
        .args(["get", "absent", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["key"], "absent");
    assert!(v["value"].is_null());
}

#[test]
fn set_from_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("payload.json");
    std::fs::write(&file, r#"{"token":"abc","scopes":["read","write"]}"#).unwrap();

    duoslot(&dir.path().join("store"))
        .args(["set", "auth"])
        .arg("--file")
        .arg(&file)
        .assert()
        .success();

    duoslot(&dir.path().join("store"))
        .args(["get", "auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""scopes":["read","write"]"#));
}

#[test]
fn inspect_tracks_slot_alternation() {
    let dir = tempdir().unwrap();

    let inspect = |dir: &Path| -> Value {
        let output = duoslot(dir)
            .args(["inspect", "k", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    };

    let v = inspect(dir.path());
    assert_eq!(v["state"], "EmptyA");
    assert!(v["readable_slot"].is_null());
    assert_eq!(v["next_target"], "B");

    duoslot(dir.path()).args(["set", "k", "one"]).assert().success();
    let v = inspect(dir.path());
    assert_eq!(v["state"], "LatestB");
    assert_eq!(v["readable_slot"], "B");
    assert_eq!(v["next_target"], "A");

    duoslot(dir.path()).args(["set", "k", "two"]).assert().success();
    let v = inspect(dir.path());
    assert_eq!(v["state"], "LatestA");
    assert_eq!(v["readable_slot"], "A");
}

#[test]
fn inspect_text_output() {
    let dir = tempdir().unwrap();
    duoslot(dir.path()).args(["set", "k", "v"]).assert().success();

    duoslot(dir.path())
        .args(["inspect", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("readable:    B"))
        .stdout(predicate::str::contains("next target: A"));
}

#[test]
fn failed_write_keeps_previous_value() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .args(["set", "k", "kept", "--chunk-size", "4"])
        .assert()
        .success();

    // The metadata entry is longer than 10 code points, so the commit aborts.
    duoslot(dir.path())
        .args(["set", "k", "lost", "--chunk-size", "4", "--max-value-len", "10"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("previous value kept"));

    duoslot(dir.path())
        .args(["get", "k"])
        .assert()
        .success()
        .stdout("kept\n");
}

#[test]
fn chunk_size_above_storage_ceiling_is_rejected() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .args(["set", "k", "v", "--chunk-size", "64", "--max-value-len", "32"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal"));
}

#[test]
fn set_requires_a_value() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .args(["set", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn version_prints_package_version() {
    let dir = tempdir().unwrap();

    duoslot(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
