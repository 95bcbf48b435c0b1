//! Tests for the rule engine
//!
//! Suites run against in-memory series; the merge suite talks to a mock
//! repository instead of git.

use std::fs;

use patchtest::core::error::EngineError;
use patchtest::core::models::{Outcome, Patch, PatchSeries};
use patchtest::core::ports::PatchTarget;
use patchtest::core::services::Engine;
use patchtest::core::suites::SuiteRegistry;
use tempfile::TempDir;

use crate::common::mocks::MockPatchTarget;

const BODY: &str = "Explain the change.\n\nSigned-off-by: Jane Doe <jane@yoctoproject.org>\n---\n";

fn series(subjects: &[&str]) -> PatchSeries {
    let patches = subjects
        .iter()
        .map(|s| Patch::from_parts("Jane Doe <jane@yoctoproject.org>", s, BODY))
        .collect();
    PatchSeries::new("/tmp/series.mbox", patches).unwrap()
}

fn registry_with(suite: &str, content: &str) -> (TempDir, SuiteRegistry) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(format!("{suite}.toml")), content).unwrap();
    let registry = SuiteRegistry::with_module_paths(&[temp.path().to_path_buf()]);
    (temp, registry)
}

#[test]
fn every_rule_gives_one_verdict_per_patch() {
    let engine = Engine::new(SuiteRegistry::new(), &["oe"]);
    let results = engine
        .run(&series(&["[PATCH 1/2] a: one", "[PATCH 2/2] a: two"]), None, None)
        .unwrap();

    assert_eq!(results.suites.len(), 2);
    for suite in &results.suites {
        for verdicts in suite.rules.values() {
            assert_eq!(verdicts.len(), 2);
        }
    }
}

#[test]
fn clean_series_has_no_failures() {
    let engine = Engine::new(SuiteRegistry::new(), &["oe"]);
    let results = engine.run(&series(&["[PATCH] recipe: update"]), None, None).unwrap();
    assert!(!results.has_failures(), "{:#?}", results.render_lines());
}

#[test]
fn merge_uses_explicit_target_branch() {
    let mock = MockPatchTarget::new().with_branches(&["master", "kirkstone"]);
    let engine = Engine::new(SuiteRegistry::new(), &["merge"]);
    let repo: &dyn PatchTarget = &mock;

    let results = engine
        .run(&series(&["[kirkstone][PATCH] a: one"]), Some(repo), Some("next"))
        .unwrap();

    assert_eq!(mock.calls(), vec!["checkout next", "am", "cleanup"]);
    assert_eq!(mock.probed(), vec![std::path::PathBuf::from("/tmp/series.mbox")]);
    assert!(!results.has_failures());
}

#[test]
fn target_is_not_resolved_without_merge_suite() {
    let mock = MockPatchTarget::new().with_branches(&["master", "kirkstone"]);
    let engine = Engine::new(SuiteRegistry::new(), &["oe"]);

    engine
        .run(&series(&["[kirkstone][PATCH] a: one"]), Some(&mock), None)
        .unwrap();
    assert!(mock.resolved().is_empty());
    assert!(mock.calls().is_empty());
}

#[test]
fn merge_uses_inferred_branch_when_present() {
    let mock = MockPatchTarget::new().with_branches(&["master", "kirkstone"]);
    let engine = Engine::new(SuiteRegistry::new(), &["merge"]);

    engine
        .run(&series(&["[kirkstone][PATCH] a: one"]), Some(&mock), None)
        .unwrap();
    assert_eq!(mock.resolved(), vec!["kirkstone"]);
    assert_eq!(mock.calls()[0], "checkout kirkstone");
}

#[test]
fn merge_falls_back_to_start_branch() {
    let mock = MockPatchTarget::new();
    let engine = Engine::new(SuiteRegistry::new(), &["merge"]);

    engine
        .run(&series(&["[scarthgap][PATCH] a: one"]), Some(&mock), None)
        .unwrap();
    assert_eq!(mock.calls()[0], "checkout master");
}

#[test]
fn merge_failure_is_data_not_error() {
    let mock = MockPatchTarget::new().failing_with("error: a.txt: patch does not apply\nPatch failed at 0001 a: one");
    let engine = Engine::new(SuiteRegistry::new(), &["merge"]);

    let results = engine
        .run(&series(&["[PATCH 1/2] a: one", "[PATCH 2/2] a: two"]), Some(&mock), None)
        .unwrap();
    let merge = results.suites.iter().find(|s| s.name == "merge").unwrap();
    let verdicts = &merge.rules["test_series_can_merge"];
    assert_eq!(verdicts[0].outcome, Outcome::Fail);
    assert_eq!(verdicts[1].outcome, Outcome::Skip);
    assert!(verdicts[0].render().contains("patch does not apply"));
}

#[test]
fn first_location_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(
        first.path().join("house.toml"),
        "[test_first]\nfield = \"subject\"\npattern = \"x\"\n",
    )
    .unwrap();
    fs::write(
        second.path().join("house.toml"),
        "[test_second]\nfield = \"subject\"\npattern = \"x\"\n",
    )
    .unwrap();

    let registry =
        SuiteRegistry::with_module_paths(&[first.path().to_path_buf(), second.path().to_path_buf()]);
    let results = Engine::new(registry, &["house"])
        .run(&series(&["a: one"]), None, None)
        .unwrap();
    let house = results.suites.iter().find(|s| s.name == "house").unwrap();
    assert!(house.rules.contains_key("test_first"));
    assert!(!house.rules.contains_key("test_second"));
}

#[test]
fn invalid_outcome_is_a_defect() {
    let (_temp, registry) = registry_with(
        "broken",
        "[test_maybe]\nfield = \"subject\"\npattern = \".\"\non_match = \"MAYBE\"\n",
    );
    let err = Engine::new(registry, &["broken"])
        .run(&series(&["a: one"]), None, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidVerdictShape { ref rule, .. } if rule == "test_maybe"));
}

#[test]
fn failing_without_reason_is_a_defect() {
    let (_temp, registry) = registry_with(
        "quiet",
        "[test_quiet]\nfield = \"subject\"\npattern = \".\"\n",
    );
    let err = Engine::new(registry, &["quiet"])
        .run(&series(&["a: one"]), None, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidVerdictShape { .. }));
}

#[test]
fn broken_suite_file_is_a_defect() {
    let (_temp, registry) = registry_with("bad", "[test_bad]\nfield = \"subject\"\npattern = \"(\"\n");
    let err = Engine::new(registry, &["bad"])
        .run(&series(&["a: one"]), None, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::Suite(_)));
}
