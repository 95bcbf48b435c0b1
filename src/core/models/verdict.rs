//! Verdicts
//!
//! Rules return a loosely typed [`RuleOutput`]; the engine turns it into a
//! [`Verdict`] with [`Verdict::from_output`], the one place where the result
//! contract is enforced.

use std::fmt;

use serde::Serialize;

use crate::core::error::EngineError;

/// Tri-state outcome of one rule on one patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// The patch satisfies the rule
    Pass,
    /// The patch violates the rule
    Fail,
    /// The rule does not apply to the patch
    Skip,
}

impl Outcome {
    /// Upper-case label used in rendered verdicts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            "SKIP" => Ok(Self::Skip),
            _ => Err(format!("invalid result {s:?}: use PASS, FAIL or SKIP")),
        }
    }
}

/// What a rule returns: `(subject, outcome, reason)`
///
/// The outcome is a string so rules defined outside the crate can get it
/// wrong; [`Verdict::from_output`] rejects anything malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutput {
    /// Subject of the patch the rule looked at
    pub subject: String,
    /// `PASS`, `FAIL` or `SKIP`
    pub outcome: String,
    /// Why the rule failed or skipped
    pub reason: Option<String>,
}

impl RuleOutput {
    /// Build an output with an arbitrary outcome string
    pub fn new(subject: impl Into<String>, outcome: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            outcome: outcome.into(),
            reason,
        }
    }

    /// A passing output
    pub fn pass(subject: impl Into<String>) -> Self {
        Self::new(subject, Outcome::Pass.as_str(), None)
    }

    /// A failing output
    pub fn fail(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(subject, Outcome::Fail.as_str(), Some(reason.into()))
    }

    /// A skipped output
    pub fn skip(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(subject, Outcome::Skip.as_str(), Some(reason.into()))
    }
}

impl<S, O> From<(S, O, Option<String>)> for RuleOutput
where
    S: Into<String>,
    O: Into<String>,
{
    fn from((subject, outcome, reason): (S, O, Option<String>)) -> Self {
        Self::new(subject, outcome, reason)
    }
}

/// Result of one rule applied to one patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Suite the rule belongs to
    pub suite: String,
    /// Rule name
    pub rule: String,
    /// Subject of the patch
    pub subject: String,
    /// Outcome
    pub outcome: Outcome,
    /// Reason; always present for FAIL and SKIP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    /// Validate a rule's output and turn it into a verdict
    ///
    /// The outcome must be `PASS`, `FAIL` or `SKIP`, and FAIL/SKIP need a
    /// non-empty reason. A PASS keeps no reason.
    pub fn from_output(suite: &str, rule: &str, output: RuleOutput) -> Result<Self, EngineError> {
        let shape_error = |detail: String| EngineError::InvalidVerdictShape {
            suite: suite.to_string(),
            rule: rule.to_string(),
            detail,
        };

        let outcome: Outcome = output.outcome.parse().map_err(shape_error)?;
        let reason = match outcome {
            Outcome::Pass => None,
            Outcome::Fail | Outcome::Skip => match output.reason {
                Some(reason) if !reason.trim().is_empty() => Some(reason),
                _ => return Err(shape_error(format!("{outcome} result needs a reason"))),
            },
        };

        Ok(Self {
            suite: suite.to_string(),
            rule: rule.to_string(),
            subject: output.subject,
            outcome,
            reason,
        })
    }

    /// Render as `OUTCOME: rule on subject`, plus ` (reason)` unless PASS
    #[must_use]
    pub fn render(&self) -> String {
        match (&self.outcome, &self.reason) {
            (Outcome::Pass, _) | (_, None) => {
                format!("{}: {} on {}", self.outcome, self.rule, self.subject)
            },
            (_, Some(reason)) => {
                format!("{}: {} on {} ({reason})", self.outcome, self.rule, self.subject)
            },
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
