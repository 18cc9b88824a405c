//! Smoke tests for the `labelcheck` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn labelcheck() -> Command {
    Command::cargo_bin("labelcheck").unwrap()
}

#[test]
fn help_lists_subcommands() {
    labelcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_init_then_get_and_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    labelcheck()
        .args(["--config", path, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    labelcheck()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    labelcheck()
        .args(["--config", path, "config", "get", "comparison.semantic_weight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.7"));

    labelcheck()
        .args(["--config", path, "config", "set", "comparison.conditional_vsd", "true"])
        .assert()
        .success();

    labelcheck()
        .args(["--config", path, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"conditional_vsd\": true"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    labelcheck()
        .args(["--config", path.to_str().unwrap(), "config", "get", "nope.nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn extract_reports_unreadable_pdf_as_not_found() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("wo.pdf");
    std::fs::write(&input, b"this is not a pdf").unwrap();

    labelcheck()
        .args(["extract", input.to_str().unwrap(), "--kind", "wo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Factory ID: Not found"))
        .stderr(predicate::str::contains("Text extraction failed"));
}

#[test]
fn extract_missing_file_fails() {
    labelcheck()
        .args(["extract", "/definitely/not/here.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn merge_plain_email_writes_cover_pdf() {
    let dir = tempdir().unwrap();
    let eml = dir.path().join("po.eml");
    std::fs::write(
        &eml,
        "Subject: PO 4500123\r\nContent-Type: text/plain\r\n\r\nCOO: SRI LANKA\r\nFactory Code: 36013779\r\n",
    )
    .unwrap();
    let output = dir.path().join("merged");

    labelcheck()
        .args(["merge", eml.to_str().unwrap(), "--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Country of Origin: SRI LANKA"))
        .stdout(predicate::str::contains("Factory Code: 36013779"));

    let written = std::fs::read(dir.path().join("merged.pdf")).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[test]
fn config_show_reports_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    labelcheck()
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}
