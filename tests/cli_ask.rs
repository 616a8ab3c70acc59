// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FALLBACK: &str = "fallback: I don't know that, try asking something else";

fn write_config(dir: &Path, body: &str) {
    fs::write(dir.join(".askbaserc.toml"), body).expect("write config");
}

fn askbase(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("askbase"));
    cmd.current_dir(dir).env("HOME", dir).env("NO_COLOR", "1");
    cmd
}

fn seed(dir: &Path) {
    for (question, answer) in [("What is your name?", "Bot"), ("How are you?", "Fine")] {
        askbase(dir)
            .args(["add", question, answer])
            .assert()
            .success();
    }
}

fn ask_json(dir: &Path, args: &[&str]) -> Value {
    let assert = askbase(dir)
        .args(["--format", "json", "ask"])
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    serde_json::from_str(&stdout).expect("json")
}

#[test]
fn empty_catalog_reports_no_knowledge() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[embeddings]\nprovider = \"dummy\"\n");

    let result = ask_json(dir.path(), &["anything"]);
    assert_eq!(result["matched"], false);
    assert_eq!(result["answer"], "no knowledge available");
    assert!(result["score"].is_null());
    assert!(result["matched_entry_id"].is_null());
}

#[test]
fn zero_vectors_fall_back() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[embeddings]\nprovider = \"dummy\"\n");
    seed(dir.path());

    let result = ask_json(dir.path(), &["What's your name?"]);
    assert_eq!(result["matched"], false);
    assert_eq!(result["answer"], FALLBACK);
    assert_eq!(result["score"].as_f64(), Some(0.0));

    askbase(dir.path())
        .args(["ask", "What's your name?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(FALLBACK));
}

#[test]
fn command_provider_match_and_threshold_override() {
    let dir = TempDir::new().expect("tempdir");
    // Every text maps to the same unit vector, so the score is 1.0.
    write_config(
        dir.path(),
        r#"[embeddings]
provider = "command"
model = "fixture"
command = "cat >/dev/null; echo '[[1.0, 0.0]]'"
"#,
    );
    askbase(dir.path())
        .args(["add", "What is your name?", "Bot"])
        .assert()
        .success();

    let result = ask_json(dir.path(), &["What's your name?"]);
    assert_eq!(result["matched"], true);
    assert_eq!(result["answer"], "Bot");
    assert_eq!(result["score"].as_f64(), Some(1.0));
    assert!(result["matched_entry_id"].as_i64().is_some());

    // Strictly-greater comparison: 1.0 does not clear a 1.0 threshold.
    let strict = ask_json(dir.path(), &["What's your name?", "--threshold", "1.0"]);
    assert_eq!(strict["matched"], false);

    askbase(dir.path())
        .args(["ask", "What's your name?", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bot"))
        .stdout(predicate::str::contains("score: 1.0000"))
        .stdout(predicate::str::contains("(matched)"));
}

#[test]
fn non_finite_threshold_flag_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[embeddings]\nprovider = \"dummy\"\n");

    askbase(dir.path())
        .args(["ask", "hello", "--threshold", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold must be finite"));
}

#[test]
fn non_finite_configured_threshold_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "[embeddings]\nprovider = \"dummy\"\n\n[matcher]\nthreshold = nan\n",
    );
    seed(dir.path());

    askbase(dir.path())
        .args(["ask", "What's your name?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("match threshold must be a finite number"));
}

#[test]
fn configured_fallback_answer_is_used() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "[embeddings]\nprovider = \"dummy\"\n\n[matcher]\nfallback_answer = \"ask a human\"\n",
    );
    seed(dir.path());

    let result = ask_json(dir.path(), &["anything"]);
    assert_eq!(result["answer"], "ask a human");
}

#[test]
fn embedding_failure_is_a_service_error() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "[embeddings]\nprovider = \"command\"\ncommand = \"cat >/dev/null; exit 2\"\n",
    );
    seed(dir.path());

    askbase(dir.path())
        .args(["ask", "What's your name?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Embedding failed"))
        .stdout(predicate::str::contains(FALLBACK).not());
}

#[test]
fn unknown_model_fails_to_load() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "[embeddings]\nprovider = \"builtin\"\nmodel = \"not-a-model\"\n",
    );

    askbase(dir.path())
        .args(["ask", "hello"])
        .env_remove("FASTEMBED_MODEL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model load failed"));
}

#[test]
fn chat_answers_each_line() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[embeddings]\nprovider = \"dummy\"\n");
    seed(dir.path());

    let assert = askbase(dir.path())
        .args(["--format", "json", "chat"])
        .write_stdin("What's your name?\n\nHow are you?\nquit\nignored\n")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["answer"] == FALLBACK));
}
