//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::{Command, Output};

const FULL_ID: &str = "4f9b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b";

fn alerter() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_alerter"));
    command
        .env_remove("GITHUB_TOKEN")
        .env_remove("ALERTER_ORG")
        .env_remove("ALERTER_REPO")
        .env_remove("KO_DATA_PATH");
    command
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn commit_prints_short_id_through_symbolic_ref() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "HEAD", "ref: refs/heads/main\n");
    write(dir.path(), "refs/heads/main", &format!("{FULL_ID}\n"));

    let output = alerter()
        .arg("commit")
        .env("KO_DATA_PATH", dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), &FULL_ID[..7]);

    let output = alerter()
        .args(["commit", "--full"])
        .env("KO_DATA_PATH", dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), FULL_ID);
}

#[test]
fn commit_rejects_malformed_id() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "HEAD", &FULL_ID.to_uppercase());

    let output = alerter()
        .arg("commit")
        .env("KO_DATA_PATH", dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is not a valid commit ID"));
}

#[test]
fn commit_refuses_ref_outside_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/HEAD", "ref: ../main");
    write(dir.path(), "main", FULL_ID);

    let output = alerter()
        .arg("commit")
        .env("KO_DATA_PATH", dir.path().join("data"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("points outside the data directory"));
}

#[test]
fn commit_requires_data_path() {
    let output = alerter().arg("commit").output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("\"KO_DATA_PATH\" does not exist or is empty"));
}

#[test]
fn dry_run_all_add_issue_needs_no_network() {
    let output = alerter()
        .args([
            "add-issue",
            "--org",
            "knative",
            "--repo",
            "serving",
            "--test",
            "load-test",
            "--description",
            "p99 latency regressed",
            "--dry-run",
            "--dry-run-scope",
            "all",
        ])
        .env("GITHUB_TOKEN", "dummy")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "dry run: created issue");
}

#[test]
fn dry_run_close_issue_needs_no_network() {
    let output = alerter()
        .args(["close-issue", "7", "--org", "o", "--repo", "r"])
        .arg("--dry-run")
        .env("GITHUB_TOKEN", "dummy")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "dry run: closed issue #7");
}

#[test]
fn add_issue_without_token_fails() {
    let output = alerter()
        .args(["add-issue", "--org", "o", "--repo", "r"])
        .args(["--test", "t", "--description", "d"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot authenticate to GitHub"));
}

#[test]
fn add_issue_without_org_fails() {
    let output = alerter()
        .args(["add-issue", "--repo", "r", "--dry-run"])
        .args(["--test", "t", "--description", "d"])
        .env("GITHUB_TOKEN", "dummy")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("organization must not be empty"));
}

#[test]
fn config_file_supplies_org_and_repo() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = "org: knative\nrepo: eventing\ndry_run: true\ndry_run_scope: all\n";
    write(dir.path(), "alerter.yaml", yaml);

    let output = alerter()
        .args(["close-issue", "3", "--config"])
        .arg(dir.path().join("alerter.yaml"))
        .env("GITHUB_TOKEN", "dummy")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("dry run"));
}

#[test]
fn help_lists_subcommands() {
    let output = alerter().arg("--help").output().unwrap();
    let stdout = stdout(&output);
    assert!(output.status.success());
    for name in ["add-issue", "close-issue", "commit"] {
        assert!(stdout.contains(name), "missing {name} in help");
    }
}
