//! Patterns shared by the built-in rules

use std::sync::LazyLock;

use regex::Regex;

/// Longest shortlog accepted by `test_mbox_shortlog_length`
pub const SHORTLOG_MAX_LENGTH: usize = 90;

/// Address used by the Auto Upgrade Helper bot
pub const AUH_EMAIL: &str = "auh@yoctoproject.org";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {pattern:?} is invalid: {e}"))
}

/// `Signed-off-by: Name <user@host>` at the start of a line
pub static SIGNED_OFF_BY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?m)^Signed-off-by: \S.*<[^<>@\s]+@[^<>\s]+>"));

/// `<target>: <summary>`, where target is one or more colon-free words
pub static SHORTLOG: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[^:\s]+(?:\s+[^:\s]+)*:\s*\S.*$"));

/// A leading run of bracketed tags followed by a space
pub static LEADING_TAGS: LazyLock<Regex> = LazyLock::new(|| compile(r"^(?:\[.*?\])+ "));

/// Shortlog of a `git revert` commit
pub static REVERT_SHORTLOG: LazyLock<Regex> = LazyLock::new(|| compile(r#"^Revert ""#));

/// CVE identifier
pub static CVE: LazyLock<Regex> = LazyLock::new(|| compile(r"CVE-\d{4}-\d+"));

/// Well-formed `Upstream-Status:` line
pub static UPSTREAM_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Upstream-Status: (?:Pending|Submitted|Accepted|Backport|Denied|Inappropriate|Inactive-Upstream)(?:\s.*)?$",
    )
});

/// E-mail address
pub static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"));

/// Any Bugzilla reference
pub static BUGZILLA: LazyLock<Regex> = LazyLock::new(|| compile(r"\[\s?YOCTO.*\]"));

/// Correctly formatted Bugzilla reference: `[YOCTO #1234]`
pub static BUGZILLA_VALID: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\[(?:\s?YOCTO\s?#\s?\d+\s?,?)+\]"));

/// GitHub-style `@username` mention
pub static GITHUB_USERNAME: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)(?:^|\s)@\w"));

/// `[meta-*]` project tag in a subject
pub static META_PROJECT_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"\[meta-.+\]"));

/// Authors that are never accepted
pub static INVALID_SUBMITTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"^Upgrade Helper.+"),
        compile(&regex::escape(AUH_EMAIL)),
        compile(r"uh@not\.set"),
        compile(r"\S+@example\.com"),
    ]
});
