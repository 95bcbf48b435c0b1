//! Command implementations

mod run;
mod suites;

pub use run::{RunArgs, run_series};
pub use suites::list_suites;
