//! Target branch inference
//!
//! Contributors tag the branch a series targets inside the subject's
//! brackets, e.g. `[kirkstone][PATCH 1/3]` or `[PATCH, scarthgap]`. The tag
//! list is free-form, so this is a heuristic: whatever cannot be recognised
//! falls back to [`DEFAULT_BRANCH`].

use std::sync::LazyLock;

use regex::Regex;

/// Branch assumed when the subject names none
pub const DEFAULT_BRANCH: &str = "master";

/// Greedy run from the first `[` to the last `]`, across newlines
static BRACKET_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("bracket run regex is valid"));

/// Separators between tags: commas and adjacent bracket pairs
static TAG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",|\]\s*\[").expect("tag separator regex is valid"));

/// Version (`v2`) and sequence (`1/3`) tags
static NUMBERED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:v\d+|\d+/\d+)").expect("numbered tag regex is valid"));

/// Infer the target branch from the first patch's subject
#[must_use]
pub fn infer_branch(subject: &str) -> String {
    let Some(run) = BRACKET_RUN.find(subject) else {
        return DEFAULT_BRANCH.to_string();
    };

    let inner = run.as_str().trim_matches(['[', ']']);
    TAG_SEPARATOR
        .split(inner)
        .map(str::trim)
        .find(|tag| is_valid_branch(tag))
        .and_then(|tag| tag.split(']').next())
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .map_or_else(|| DEFAULT_BRANCH.to_string(), ToString::to_string)
}

/// Whether a bracket tag can name a branch
///
/// `PATCH`, `RFC` and `RESEND` tags (any case), version tags and sequence
/// numbers are not branches.
#[must_use]
pub fn is_valid_branch(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    !(lower.is_empty()
        || lower.starts_with("patch")
        || lower.starts_with("rfc")
        || lower.starts_with("resend")
        || NUMBERED_TAG.is_match(&lower))
}
