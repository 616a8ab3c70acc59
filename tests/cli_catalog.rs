// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, embeddings: &str) {
    fs::write(
        dir.join(".askbaserc.toml"),
        format!("[embeddings]\n{}\n", embeddings),
    )
    .expect("write config");
}

fn askbase(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("askbase"));
    cmd.current_dir(dir).env("HOME", dir).env("NO_COLOR", "1");
    cmd
}

fn json_stdout(cmd: &mut Command, args: &[&str]) -> Value {
    let assert = cmd.args(args).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    serde_json::from_str(&stdout).expect("json output")
}

fn add(dir: &Path, question: &str, answer: &str) -> i64 {
    let created = json_stdout(
        &mut askbase(dir),
        &["--format", "json", "add", question, answer],
    );
    created["id"].as_i64().expect("id")
}

#[test]
fn add_list_show_update_delete() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "provider = \"dummy\"");

    let first = add(dir.path(), "What is your name?", "Bot");
    let second = add(dir.path(), "How are you?", "Fine");
    assert!(second > first);
    assert!(dir.path().join(".askbase").join("knowledge.sqlite").exists());

    let listed = json_stdout(&mut askbase(dir.path()), &["--format", "json", "list"]);
    let entries = listed.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["question"], "What is your name?");
    assert_eq!(entries[1]["answer"], "Fine");

    let shown = json_stdout(
        &mut askbase(dir.path()),
        &["--format", "json", "show", &first.to_string()],
    );
    assert_eq!(shown["answer"], "Bot");

    let updated = json_stdout(
        &mut askbase(dir.path()),
        &[
            "--format",
            "json",
            "update",
            &second.to_string(),
            "How are you doing?",
            "Great",
        ],
    );
    assert_eq!(updated["id"], second);
    assert_eq!(updated["answer"], "Great");

    askbase(dir.path())
        .args(["delete", &first.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted {}", first)));

    askbase(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("How are you doing?"))
        .stdout(predicate::str::contains("What is your name?").not());
}

#[test]
fn missing_entry_fails() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "provider = \"dummy\"");

    for args in [
        vec!["show", "99"],
        vec!["delete", "99"],
        vec!["update", "99", "q?", "a"],
    ] {
        askbase(dir.path())
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Entry not found: 99"));
    }
}

#[test]
fn blank_question_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "provider = \"dummy\"");

    askbase(dir.path())
        .args(["add", "   ", "answer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question must not be empty"));
}

#[test]
fn explicit_db_path_is_used() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "provider = \"dummy\"");
    let db = dir.path().join("custom").join("kb.sqlite");
    let db_arg = db.to_string_lossy().to_string();

    askbase(dir.path())
        .args(["--db", &db_arg, "add", "Where?", "Here"])
        .assert()
        .success();

    assert!(db.exists());
    assert!(!dir.path().join(".askbase").exists());
}

#[test]
fn completions_generate() {
    let dir = TempDir::new().expect("tempdir");
    askbase(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("askbase"));
}
