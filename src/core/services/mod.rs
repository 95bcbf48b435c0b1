//! Business logic services
//!
//! - [`branch`] - Infer the target branch from a subject line
//! - [`engine`] - Run suites of rules over a patch series
//! - [`patterns`] - Regexes shared by the built-in rules

pub mod branch;
pub mod engine;
pub mod patterns;

pub use branch::infer_branch;
pub use engine::Engine;
