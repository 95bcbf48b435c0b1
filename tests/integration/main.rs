//! Integration tests for the patchtest CLI
//!
//! These tests drive the binary end to end: build an mbox, run suites over
//! it, and check verdict lines, result files and exit codes.

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::fixtures::{PatchBuilder, mbox, write_mbox};
use common::git_repo::TempGitRepo;

/// Helper function to create a patchtest command
fn patchtest() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("patchtest"))
}

fn clean_mbox(dir: &std::path::Path) -> std::path::PathBuf {
    write_mbox(
        dir,
        "clean.mbox",
        &mbox(vec![PatchBuilder::new().subject("[PATCH] recipe: update to 1.2").build()]),
    )
}

// =============================================================================
// VERDICT OUTPUT
// =============================================================================

#[test]
fn test_clean_series_exits_zero() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "PASS: test_mbox_has_signed_off_by on [PATCH] recipe: update to 1.2",
        ))
        .stdout(predicate::str::contains("SKIP: test_mbox_shortlog_revert_format"));
}

#[test]
fn test_failing_rule_exits_one() {
    let temp = TempDir::new().unwrap();
    let path = write_mbox(
        temp.path(),
        "unsigned.mbox",
        &mbox(vec![PatchBuilder::new().unsigned().build()]),
    );

    patchtest()
        .args(["run", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAIL: test_mbox_has_signed_off_by on [PATCH] recipe: update to 1.2 \
             (mbox was missing a signed-off-by tag)",
        ));
}

#[test]
fn test_not_an_mbox_exits_two() {
    let temp = TempDir::new().unwrap();
    let path = write_mbox(temp.path(), "plain.txt", "Subject: hello\n\nbody\n");

    patchtest()
        .args(["run", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not an mbox"));
}

#[test]
fn test_broken_suite_exits_three() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());
    let suites = temp.path().join("suites");
    fs::create_dir(&suites).unwrap();
    fs::write(
        suites.join("house.toml"),
        "[test_typo]\nfield = \"subject\"\npattern = \".\"\non_match = \"FAILED\"\nreason = \"x\"\n",
    )
    .unwrap();

    patchtest()
        .args(["run", "--suites", "house", "--module-path"])
        .arg(&suites)
        .arg("--patch")
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("test_typo"));
}

#[test]
fn test_missing_suite_only_warns() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--suites", "nonexistent", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Suite nonexistent not found"));
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    let output = patchtest()
        .args(["--json", "run", "--suites", "oe", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["core"]["test_mbox_has_signed_off_by"].is_array());
    assert!(value["oe"]["test_mbox_author_valid"].is_array());
}

#[test]
fn test_patch_and_directory_conflict() {
    patchtest()
        .args(["run", "--patch", "a.mbox", "--directory", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// =============================================================================
// RESULT FILES
// =============================================================================

#[test]
fn test_log_results_writes_lines() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--log-results", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .success();

    let log = fs::read_to_string(temp.path().join("clean.mbox.testresult")).unwrap();
    assert!(log.lines().all(|l| l.starts_with("PASS: ") || l.starts_with("SKIP: ")));
}

#[test]
fn test_log_json_writes_document() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--log-json", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .success();

    let log = fs::read_to_string(temp.path().join("clean.mbox.testresult")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&log).unwrap();
    assert!(value.get("core").is_some());
}

#[test]
fn test_log_flags_are_exclusive() {
    patchtest()
        .args(["run", "--log-results", "--log-json", "--patch", "a.mbox"])
        .assert()
        .failure();
}

#[test]
fn test_directory_runs_every_mbox() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    write_mbox(&inbox, "one.mbox", &PatchBuilder::new().subject("[PATCH] a: first").build());
    write_mbox(&inbox, "two.patch", &PatchBuilder::new().subject("[PATCH] b: second").build());
    write_mbox(&inbox, "notes.txt", "not a patch\n");

    patchtest()
        .args(["run", "--directory"])
        .arg(&inbox)
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("on [PATCH] a: first"))
        .stdout(predicate::str::contains("on [PATCH] b: second"));
}

// =============================================================================
// MERGE SUITE
// =============================================================================

#[test]
fn test_merge_against_repository() {
    let repo = TempGitRepo::with_base_commit();
    repo.git_ok(&["checkout", "-q", "-b", "contrib"]);
    repo.write_file("a.txt", "one\nTWO\nthree\n");
    repo.commit_all("a: capitalise two\n\nUse upper case for the second line.");
    let series = repo.format_patch("-1");
    repo.git_ok(&["checkout", "-q", "main"]);

    let temp = TempDir::new().unwrap();
    let path = write_mbox(temp.path(), "series.mbox", &series);

    patchtest()
        .args(["run", "--suites", "merge", "--repodir"])
        .arg(repo.path())
        .arg("--patch")
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS: test_series_can_merge on [PATCH] a: capitalise two"));

    assert_eq!(repo.current_branch(), "main");
    assert_eq!(repo.status(), "");
}

#[test]
fn test_merge_without_repository_fails() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--suites", "merge", "--patch"])
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No target repository provided for merge testing"));
}

#[test]
fn test_bad_repodir_exits_two() {
    let temp = TempDir::new().unwrap();
    let path = clean_mbox(temp.path());

    patchtest()
        .args(["run", "--repodir"])
        .arg(temp.path().join("nope"))
        .arg("--patch")
        .arg(&path)
        .current_dir(temp.path())
        .assert()
        .code(2);
}

// =============================================================================
// OTHER COMMANDS
// =============================================================================

#[test]
fn test_suites_lists_builtins_and_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("house.toml"), "").unwrap();

    patchtest()
        .args(["suites", "--module-path"])
        .arg(temp.path())
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("core"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("house"));
}

#[test]
fn test_version() {
    patchtest()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("patchtest v{}", env!("CARGO_PKG_VERSION"))));
}
