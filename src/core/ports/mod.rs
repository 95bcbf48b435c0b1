//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core business logic
//! and external systems. Implementations live in the `adapters` module.

mod patch_target;

pub use patch_target::{MergeFailure, MergeProbe, PatchTarget};
