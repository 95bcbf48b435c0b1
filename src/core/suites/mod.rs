//! Rule suites
//!
//! A suite is a named group of rules. Built-in suites are compiled in;
//! more suites are discovered as `<name>.toml` files in configured
//! directories (see [`registry`]).
//!
//! - [`core_suite`] - Formatting rules every series must follow (`core`)
//! - [`oe`] - OpenEmbedded mailing-list conventions (`oe`)
//! - [`merge`] - Whole-series mergeability against the target repository (`merge`)
//! - [`pattern`] - Declarative regex rules loaded from suite files

pub mod core_suite;
pub mod merge;
pub mod oe;
pub mod pattern;
pub mod registry;

use std::fmt;
use std::path::PathBuf;

use crate::core::models::{Patch, PatchSeries, RuleOutput};
use crate::core::ports::PatchTarget;

pub use registry::{SearchLocation, SuiteInfo, SuiteRegistry};

/// Name prefix every rule must carry
pub const RULE_PREFIX: &str = "test_";

/// Name of the suite that always runs
pub const CORE_SUITE: &str = "core";

/// What a rule may consult besides the patches
#[derive(Clone, Copy, Default)]
pub struct RuleContext<'a> {
    /// Repository to probe, when one was given
    pub repository: Option<&'a dyn PatchTarget>,
    /// Ref the series should be applied to
    pub target_ref: Option<&'a str>,
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("repository", &self.repository.map(|r| r.start_branch()))
            .field("target_ref", &self.target_ref)
            .finish()
    }
}

/// A validator
///
/// `apply` returns one output per patch, in series order.
pub trait Rule: fmt::Debug {
    /// Rule name, starting with [`RULE_PREFIX`]
    fn name(&self) -> &str;

    /// Evaluate the rule against every patch of the series
    fn apply(&self, series: &PatchSeries, ctx: &RuleContext<'_>) -> Vec<RuleOutput>;
}

/// Signature of a per-patch rule function
pub type PatchRuleFn = fn(&Patch) -> RuleOutput;

/// Signature of a whole-series rule function
pub type SeriesRuleFn = fn(&PatchSeries, &RuleContext<'_>) -> Vec<RuleOutput>;

/// A rule that looks at one patch at a time
#[derive(Debug, Clone, Copy)]
pub struct PatchRule {
    name: &'static str,
    check: PatchRuleFn,
}

impl PatchRule {
    /// Wrap a rule function
    #[must_use]
    pub const fn new(name: &'static str, check: PatchRuleFn) -> Self {
        Self { name, check }
    }
}

impl Rule for PatchRule {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, series: &PatchSeries, _ctx: &RuleContext<'_>) -> Vec<RuleOutput> {
        series.patches().iter().map(self.check).collect()
    }
}

/// A rule that needs the whole series at once
#[derive(Debug, Clone, Copy)]
pub struct SeriesRule {
    name: &'static str,
    check: SeriesRuleFn,
}

impl SeriesRule {
    /// Wrap a series rule function
    #[must_use]
    pub const fn new(name: &'static str, check: SeriesRuleFn) -> Self {
        Self { name, check }
    }
}

impl Rule for SeriesRule {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, series: &PatchSeries, ctx: &RuleContext<'_>) -> Vec<RuleOutput> {
        (self.check)(series, ctx)
    }
}

/// Where a suite was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteOrigin {
    /// Compiled into patchtest
    Builtin,
    /// Loaded from a suite file
    File(PathBuf),
}

impl fmt::Display for SuiteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A named group of rules
#[derive(Debug)]
pub struct Suite {
    name: String,
    origin: SuiteOrigin,
    rules: Vec<Box<dyn Rule>>,
}

impl Suite {
    /// Build a suite; rules are kept sorted by name
    pub fn new(name: impl Into<String>, origin: SuiteOrigin, mut rules: Vec<Box<dyn Rule>>) -> Self {
        rules.sort_by(|a, b| a.name().cmp(b.name()));
        Self {
            name: name.into(),
            origin,
            rules,
        }
    }

    /// Suite name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the suite came from
    #[must_use]
    pub const fn origin(&self) -> &SuiteOrigin {
        &self.origin
    }

    /// Rules, sorted by name
    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }
}
