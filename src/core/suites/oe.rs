//! The `oe` suite: OpenEmbedded mailing-list conventions

use super::{PatchRule, Rule, Suite, SuiteOrigin};
use crate::core::models::{Patch, RuleOutput};
use crate::core::services::patterns::{
    AUH_EMAIL, BUGZILLA, BUGZILLA_VALID, GITHUB_USERNAME, INVALID_SUBMITTERS, META_PROJECT_TAG,
};

/// Suite name
pub const NAME: &str = "oe";

/// Build the `oe` suite
#[must_use]
pub fn suite() -> Suite {
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(PatchRule::new("test_mbox_commit_message_user_tags", user_tags)),
        Box::new(PatchRule::new("test_mbox_non_auh_upgrade", non_auh_upgrade)),
        Box::new(PatchRule::new(
            "test_mbox_target_mailing_list_meta_project",
            mailing_list_meta_project,
        )),
        Box::new(PatchRule::new("test_mbox_bugzilla_entry_format", bugzilla_entry_format)),
        Box::new(PatchRule::new("test_mbox_author_valid", author_valid)),
    ];
    Suite::new(NAME, SuiteOrigin::Builtin, rules)
}

fn user_tags(patch: &Patch) -> RuleOutput {
    if GITHUB_USERNAME.is_match(&patch.commit_message) {
        RuleOutput::fail(
            &patch.subject,
            "Mbox includes one or more GitHub-style username tags. \
             Ensure that any '@' symbols are stripped out of usernames",
        )
    } else {
        RuleOutput::pass(&patch.subject)
    }
}

fn non_auh_upgrade(patch: &Patch) -> RuleOutput {
    if patch.commit_message.contains(AUH_EMAIL) {
        RuleOutput::fail(
            &patch.subject,
            format!("Invalid author {AUH_EMAIL}. Resend the series with a valid patch author"),
        )
    } else {
        RuleOutput::pass(&patch.subject)
    }
}

fn mailing_list_meta_project(patch: &Patch) -> RuleOutput {
    if META_PROJECT_TAG.is_match(&patch.subject) {
        RuleOutput::fail(
            &patch.subject,
            "Series sent to the wrong mailing list or some patches from the series \
             correspond to different mailing lists",
        )
    } else {
        RuleOutput::pass(&patch.subject)
    }
}

fn bugzilla_entry_format(patch: &Patch) -> RuleOutput {
    if !BUGZILLA.is_match(&patch.commit_message) {
        RuleOutput::skip(&patch.subject, "No bug ID found")
    } else if BUGZILLA_VALID.is_match(&patch.commit_message) {
        RuleOutput::pass(&patch.subject)
    } else {
        RuleOutput::fail(
            &patch.subject,
            "Bugzilla issue ID is not correctly formatted - specify it with format: \
             \"[YOCTO #<bugzilla ID>]\"",
        )
    }
}

fn author_valid(patch: &Patch) -> RuleOutput {
    if INVALID_SUBMITTERS.iter().any(|re| re.is_match(&patch.author)) {
        RuleOutput::fail(
            &patch.subject,
            format!(
                "Invalid author {}. Resend the series with a valid patch author",
                patch.author
            ),
        )
    } else {
        RuleOutput::pass(&patch.subject)
    }
}
