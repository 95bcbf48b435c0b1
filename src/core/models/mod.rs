//! Domain models for patchtest
//!
//! - [`Patch`] - One parsed patch e-mail
//! - [`PatchSeries`] - The ordered patches of one mbox
//! - [`Verdict`] - What one rule concluded about one patch
//! - [`RunResults`] - Every verdict of a run, grouped by suite and rule

mod patch;
mod results;
mod series;
mod verdict;

pub use patch::{DIFF_DELIMITER, Patch, shortlog, split_body};
pub use results::{RunResults, SuiteResults, Summary};
pub use series::{MalformedPolicy, PatchSeries};
pub use verdict::{Outcome, RuleOutput, Verdict};
