//! Declarative suites loaded from TOML files
//!
//! Every top-level table whose name starts with `test_` is a rule:
//!
//! ```toml
//! [test_no_wip]
//! field = "subject"
//! pattern = "(?i)\\bwip\\b"
//! on_match = "FAIL"           # default
//! on_miss = "PASS"            # default
//! reason = "Work-in-progress patches should not be sent"
//! ```
//!
//! Other tables are ignored. Outcome strings are not checked here; a typo
//! surfaces as an invalid verdict when the rule runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::{RULE_PREFIX, Rule, RuleContext, Suite, SuiteOrigin};
use crate::core::error::SuiteError;
use crate::core::models::{Outcome, Patch, PatchSeries, RuleOutput};

/// Patch field a pattern rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchField {
    /// Raw subject
    Subject,
    /// Subject without tags
    Shortlog,
    /// Body before the diff
    CommitMessage,
    /// Body after the diff delimiter
    Diff,
    /// `From` header
    Author,
}

impl PatchField {
    fn extract(self, patch: &Patch) -> &str {
        match self {
            Self::Subject => &patch.subject,
            Self::Shortlog => &patch.shortlog,
            Self::CommitMessage => &patch.commit_message,
            Self::Diff => &patch.diff,
            Self::Author => &patch.author,
        }
    }
}

fn default_on_match() -> String {
    Outcome::Fail.as_str().to_string()
}

fn default_on_miss() -> String {
    Outcome::Pass.as_str().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    field: PatchField,
    pattern: String,
    #[serde(default = "default_on_match")]
    on_match: String,
    #[serde(default = "default_on_miss")]
    on_miss: String,
    reason: Option<String>,
}

/// A rule that matches a regex against one field of each patch
#[derive(Debug)]
pub struct PatternRule {
    name: String,
    field: PatchField,
    pattern: Regex,
    on_match: String,
    on_miss: String,
    reason: Option<String>,
}

impl Rule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, series: &PatchSeries, _ctx: &RuleContext<'_>) -> Vec<RuleOutput> {
        series
            .patches()
            .iter()
            .map(|patch| {
                let outcome = if self.pattern.is_match(self.field.extract(patch)) {
                    &self.on_match
                } else {
                    &self.on_miss
                };
                RuleOutput::new(&patch.subject, outcome.as_str(), self.reason.clone())
            })
            .collect()
    }
}

/// Load the suite file at `path` under the name `name`
pub fn load_suite_file(name: &str, path: &Path) -> Result<Suite, SuiteError> {
    let content = fs::read_to_string(path).map_err(|source| SuiteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_suite(name, path, &content)
}

/// Parse suite file content; `path` is only used in errors
pub fn parse_suite(name: &str, path: &Path, content: &str) -> Result<Suite, SuiteError> {
    let parse_error = |message: String| SuiteError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let tables: BTreeMap<String, toml::Value> =
        toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    for (key, value) in tables {
        if !key.starts_with(RULE_PREFIX) {
            debug!("Ignoring {key} in {}: not a rule", path.display());
            continue;
        }

        let spec: RuleSpec = value
            .try_into()
            .map_err(|e| parse_error(format!("rule {key}: {e}")))?;
        let pattern = Regex::new(&spec.pattern).map_err(|e| SuiteError::InvalidPattern {
            path: path.to_path_buf(),
            rule: key.clone(),
            message: e.to_string(),
        })?;

        rules.push(Box::new(PatternRule {
            name: key,
            field: spec.field,
            pattern,
            on_match: spec.on_match,
            on_miss: spec.on_miss,
            reason: spec.reason,
        }));
    }

    debug!("Loaded {} rule(s) for suite {name} from {}", rules.len(), path.display());
    Ok(Suite::new(name, SuiteOrigin::File(path.to_path_buf()), rules))
}
