//! The `core` suite: formatting rules every patch must follow

use std::sync::LazyLock;

use regex::Regex;

use super::{PatchRule, Rule, Suite, SuiteOrigin};
use crate::core::models::{Patch, RuleOutput};
use crate::core::services::patterns::{
    LEADING_TAGS, REVERT_SHORTLOG, SHORTLOG, SHORTLOG_MAX_LENGTH, SIGNED_OFF_BY,
};

/// Build the `core` suite
#[must_use]
pub fn suite() -> Suite {
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(PatchRule::new("test_mbox_has_signed_off_by", has_signed_off_by)),
        Box::new(PatchRule::new("test_mbox_shortlog_format", shortlog_format)),
        Box::new(PatchRule::new("test_mbox_shortlog_length", shortlog_length)),
        Box::new(PatchRule::new("test_mbox_has_commit_message", has_commit_message)),
        Box::new(PatchRule::new("test_mbox_unidiff_parse_error", unidiff_parse_error)),
        Box::new(PatchRule::new(
            "test_mbox_revert_signed_off_by_exception",
            revert_signed_off_by_exception,
        )),
        Box::new(PatchRule::new("test_mbox_shortlog_revert_format", shortlog_revert_format)),
    ];
    Suite::new(super::CORE_SUITE, SuiteOrigin::Builtin, rules)
}

fn is_revert(shortlog: &str) -> bool {
    REVERT_SHORTLOG.is_match(shortlog)
}

fn has_signed_off_by(patch: &Patch) -> RuleOutput {
    if SIGNED_OFF_BY.is_match(&patch.commit_message) {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(&patch.subject, "mbox was missing a signed-off-by tag")
    }
}

fn shortlog_format(patch: &Patch) -> RuleOutput {
    if patch.shortlog.trim().is_empty() {
        return RuleOutput::skip(&patch.subject, "mbox shortlog was empty, no test needed");
    }
    if is_revert(&patch.shortlog) {
        return RuleOutput::skip(&patch.subject, "No need to test a revert patch");
    }
    if SHORTLOG.is_match(&patch.shortlog) {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            "Commit shortlog (first line of commit message) should follow the format \"<target>: <summary>\"",
        )
    }
}

/// Reverts are exempt from the length limit: their shortlog quotes the
/// reverted commit's shortlog, so it is always longer than the original.
fn shortlog_length(patch: &Patch) -> RuleOutput {
    let shortlog = LEADING_TAGS.replace(&patch.shortlog, "");
    if is_revert(&shortlog) {
        return RuleOutput::skip(&patch.subject, "No need to test revert patches");
    }

    let length = shortlog.chars().count();
    if length > SHORTLOG_MAX_LENGTH {
        RuleOutput::fail(
            &patch.subject,
            format!(
                "Edit shortlog so that it is {SHORTLOG_MAX_LENGTH} characters or less (currently {length} characters)"
            ),
        )
    } else {
        RuleOutput::pass(&patch.subject)
    }
}

fn has_commit_message(patch: &Patch) -> RuleOutput {
    let has_text = patch
        .commit_message
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with("Signed-off-by:"));

    if has_text {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            "Please include a commit message on your patch explaining the change",
        )
    }
}

fn unidiff_parse_error(patch: &Patch) -> RuleOutput {
    if diff_is_well_formed(&patch.diff) {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            format!("Patch \"{}\" contains malformed diff lines.", patch.shortlog),
        )
    }
}

fn revert_signed_off_by_exception(patch: &Patch) -> RuleOutput {
    if is_revert(&patch.shortlog) {
        RuleOutput::skip(&patch.subject, "Revert commits do not require Signed-off-by tags")
    } else if SIGNED_OFF_BY.is_match(&patch.commit_message) {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            "Mbox is missing Signed-off-by. Add it manually or with \"git commit --amend -s\"",
        )
    }
}

fn shortlog_revert_format(patch: &Patch) -> RuleOutput {
    if !is_revert(&patch.shortlog) {
        return RuleOutput::skip(&patch.subject, "Not a revert commit");
    }
    if patch.shortlog.ends_with('"') {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            "Revert commit shortlog should be in format: Revert \"original shortlog\"",
        )
    }
}

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,(\d+))? \+\d+(?:,(\d+))? @@").expect("hunk header regex is valid")
});

/// Check that every hunk's body matches the line counts in its header
fn diff_is_well_formed(diff: &str) -> bool {
    let mut lines = diff.lines();

    while let Some(line) = lines.next() {
        if !line.starts_with("@@") {
            continue;
        }
        let Some(caps) = HUNK_HEADER.captures(line) else {
            return false;
        };
        let count = |idx: usize| caps.get(idx).map_or(Some(1), |m| m.as_str().parse::<usize>().ok());
        let (Some(mut old), Some(mut new)) = (count(1), count(2)) else {
            return false;
        };

        while old > 0 || new > 0 {
            let Some(body) = lines.next() else {
                return false;
            };
            let (old_step, new_step) = match body.chars().next() {
                Some(' ') | None => (1, 1),
                Some('-') => (1, 0),
                Some('+') => (0, 1),
                Some('\\') => (0, 0),
                Some(_) => return false,
            };
            match (old.checked_sub(old_step), new.checked_sub(new_step)) {
                (Some(o), Some(n)) => (old, new) = (o, n),
                _ => return false,
            }
        }
    }
    true
}
