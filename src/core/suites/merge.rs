//! The `merge` suite: does the series apply to the target repository?
//!
//! The whole mbox is applied once on a disposable working branch. When `git
//! am` stops, the patches it applied before stopping pass, the patch it
//! stopped at fails with git's diagnostic, and the rest are skipped since
//! they were never tried.

use log::{debug, warn};

use super::{Rule, RuleContext, SeriesRule, Suite, SuiteOrigin};
use crate::core::error::RepoError;
use crate::core::models::{PatchSeries, RuleOutput};
use crate::core::ports::{MergeProbe, PatchTarget};

/// Suite name
pub const NAME: &str = "merge";

/// Reason given to every patch when no repository was supplied
pub const NO_REPOSITORY: &str = "No target repository provided for merge testing";

/// Build the `merge` suite
#[must_use]
pub fn suite() -> Suite {
    let rules: Vec<Box<dyn Rule>> = vec![Box::new(SeriesRule::new(
        "test_series_can_merge",
        series_can_merge,
    ))];
    Suite::new(NAME, SuiteOrigin::Builtin, rules)
}

fn series_can_merge(series: &PatchSeries, ctx: &RuleContext<'_>) -> Vec<RuleOutput> {
    let Some(repo) = ctx.repository else {
        return series
            .patches()
            .iter()
            .map(|p| RuleOutput::fail(&p.subject, NO_REPOSITORY))
            .collect();
    };

    let target = ctx
        .target_ref
        .map_or_else(|| repo.resolve_target(series.branch()), ToString::to_string);

    match probe(repo, series, &target) {
        Ok(MergeProbe::Applied) => series
            .patches()
            .iter()
            .map(|p| RuleOutput::pass(&p.subject))
            .collect(),
        Ok(MergeProbe::Failed(failure)) => {
            // Without a position from git, blame the whole series
            let failed_at = failure.failed_patch_index();
            debug!("Series stopped applying at {failed_at:?}");
            series
                .patches()
                .iter()
                .enumerate()
                .map(|(idx, p)| match failed_at {
                    Some(at) if idx < at => RuleOutput::pass(&p.subject),
                    Some(at) if idx > at => RuleOutput::skip(
                        &p.subject,
                        "Not tested: an earlier patch in the series failed to merge",
                    ),
                    _ => RuleOutput::fail(
                        &p.subject,
                        format!("Patch '{}' failed to merge: {}", p.shortlog, failure.detail),
                    ),
                })
                .collect()
        },
        Err(e) => series
            .patches()
            .iter()
            .map(|p| RuleOutput::fail(&p.subject, format!("Error testing merge: {e}")))
            .collect(),
    }
}

/// One working-branch cycle; cleanup runs whatever happened before it
fn probe(repo: &dyn PatchTarget, series: &PatchSeries, target: &str) -> Result<MergeProbe, RepoError> {
    let result = repo
        .checkout_working_branch(target)
        .map(|()| repo.can_be_merged(series.source_path()));

    match (result, repo.cleanup()) {
        (Ok(probe), Ok(())) => Ok(probe),
        (Err(e), cleanup) => {
            if let Err(cleanup_err) = cleanup {
                warn!("Cleanup after a failed checkout also failed: {cleanup_err}");
            }
            Err(e)
        },
        (Ok(probe), Err(e)) => {
            warn!("Cleanup after the merge probe failed: {e}");
            Ok(probe)
        },
    }
}
