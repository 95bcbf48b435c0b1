//! Collected verdicts of one run

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Outcome, Verdict};

/// Verdicts of one suite, keyed by rule name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteResults {
    /// Suite name
    pub name: String,
    /// One verdict per patch for every rule, in patch order
    pub rules: BTreeMap<String, Vec<Verdict>>,
}

impl SuiteResults {
    /// Empty results for a suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: BTreeMap::new(),
        }
    }
}

/// Verdict counts per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of PASS verdicts
    pub pass: usize,
    /// Number of FAIL verdicts
    pub fail: usize,
    /// Number of SKIP verdicts
    pub skip: usize,
}

impl Summary {
    /// Total number of verdicts
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pass + self.fail + self.skip
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResults {
    /// Results of each suite that was found, in run order
    pub suites: Vec<SuiteResults>,
    /// Requested suites no search location had
    pub missing_suites: Vec<String>,
}

impl RunResults {
    /// Every verdict, suite by suite, rule by rule
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.suites
            .iter()
            .flat_map(|s| s.rules.values())
            .flatten()
    }

    /// Count verdicts by outcome
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.verdicts().fold(Summary::default(), |mut acc, v| {
            match v.outcome {
                Outcome::Pass => acc.pass += 1,
                Outcome::Fail => acc.fail += 1,
                Outcome::Skip => acc.skip += 1,
            }
            acc
        })
    }

    /// Whether any rule failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.verdicts().any(|v| v.outcome == Outcome::Fail)
    }
}
