//! Patch target port
//!
//! Defines the interface the merge suite uses to probe whether a patch
//! series applies to a repository.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::RepoError;

/// Repository a series can be applied to
///
/// The working-branch lifecycle is stateful: callers run
/// `checkout_working_branch`, then `can_be_merged`, then `cleanup`, one
/// cycle at a time.
pub trait PatchTarget {
    /// Branch checked out when the handle was opened
    fn start_branch(&self) -> &str;

    /// Pick the ref a series should be applied to
    ///
    /// Returns `branch` when the repository has it, otherwise the start
    /// branch.
    fn resolve_target(&self, branch: &str) -> String;

    /// Create or reset the working branch at `target` and check it out
    fn checkout_working_branch(&self, target: &str) -> Result<(), RepoError>;

    /// Try to apply an mbox to the working branch
    ///
    /// A failed application is rolled back before this returns.
    fn can_be_merged(&self, patch_file: &Path) -> MergeProbe;

    /// Return to the start branch and delete the working branch
    ///
    /// Succeeds when the working branch is already gone.
    fn cleanup(&self) -> Result<(), RepoError>;
}

/// Result of a mergeability probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeProbe {
    /// Every patch applied cleanly
    Applied,
    /// Application failed and was rolled back
    Failed(MergeFailure),
}

impl MergeProbe {
    /// Whether the probe applied cleanly
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a series did not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFailure {
    /// Raw diagnostic text from git
    pub detail: String,
}

static FAILED_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Patch failed at (\d+)").expect("failed patch regex is valid")
});

impl MergeFailure {
    /// Create a failure from git's diagnostic
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Zero-based index of the patch git stopped at, if it said so
    #[must_use]
    pub fn failed_patch_index(&self) -> Option<usize> {
        FAILED_AT
            .captures(&self.detail)
            .and_then(|c| c[1].parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
    }
}
