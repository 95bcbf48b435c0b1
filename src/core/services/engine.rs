//! Rule engine
//!
//! Looks requested suites up in a [`SuiteRegistry`], applies every rule to
//! the series and turns each rule output into a [`Verdict`]. The `core`
//! suite always runs first. A suite nobody has is a warning; a rule that
//! breaks the verdict contract aborts the run.

use log::{debug, info, warn};

use crate::core::error::EngineError;
use crate::core::models::{PatchSeries, RunResults, SuiteResults, Verdict};
use crate::core::ports::PatchTarget;
use crate::core::suites::{CORE_SUITE, RULE_PREFIX, RuleContext, Suite, SuiteRegistry};

/// Runs a fixed list of suites over patch series
#[derive(Debug)]
pub struct Engine {
    registry: SuiteRegistry,
    suites: Vec<String>,
}

impl Engine {
    /// Create an engine for `requested` suites
    ///
    /// `core` is always run first; names are kept once, in request order.
    #[must_use]
    pub fn new<S: AsRef<str>>(registry: SuiteRegistry, requested: &[S]) -> Self {
        let mut suites = vec![CORE_SUITE.to_string()];
        for name in requested {
            let name = name.as_ref().trim();
            if !name.is_empty() && !suites.iter().any(|s| s == name) {
                suites.push(name.to_string());
            }
        }
        Self { registry, suites }
    }

    /// Suite names in run order
    #[must_use]
    pub fn suites(&self) -> &[String] {
        &self.suites
    }

    /// Run every suite over `series`
    ///
    /// `target_branch` overrides the branch the merge check applies the
    /// series to; otherwise the merge check resolves one from the series
    /// branch and `repository`.
    pub fn run(
        &self,
        series: &PatchSeries,
        repository: Option<&dyn PatchTarget>,
        target_branch: Option<&str>,
    ) -> Result<RunResults, EngineError> {
        let ctx = RuleContext {
            repository,
            target_ref: target_branch,
        };

        let mut results = RunResults::default();
        for name in &self.suites {
            match self.registry.find(name)? {
                Some(suite) => results.suites.push(run_suite(&suite, series, &ctx)?),
                None => {
                    warn!("Suite {name} not found, skipping it");
                    results.missing_suites.push(name.clone());
                },
            }
        }

        let summary = results.summary();
        info!(
            "{}: {} passed, {} failed, {} skipped",
            series.source_path().display(),
            summary.pass,
            summary.fail,
            summary.skip
        );
        Ok(results)
    }
}

fn run_suite(
    suite: &Suite,
    series: &PatchSeries,
    ctx: &RuleContext<'_>,
) -> Result<SuiteResults, EngineError> {
    debug!("Running suite {} ({})", suite.name(), suite.origin());
    let mut results = SuiteResults::new(suite.name());

    for rule in suite.rules() {
        if !rule.name().starts_with(RULE_PREFIX) {
            debug!("Ignoring {}: not a rule name", rule.name());
            continue;
        }

        let outputs = rule.apply(series, ctx);
        if outputs.len() != series.patch_count() {
            return Err(EngineError::InvalidVerdictShape {
                suite: suite.name().to_string(),
                rule: rule.name().to_string(),
                detail: format!(
                    "expected {} result(s), one per patch, got {}",
                    series.patch_count(),
                    outputs.len()
                ),
            });
        }

        let verdicts = outputs
            .into_iter()
            .map(|output| Verdict::from_output(suite.name(), rule.name(), output))
            .collect::<Result<Vec<_>, _>>()?;
        results.rules.insert(rule.name().to_string(), verdicts);
    }

    Ok(results)
}
