//! Git integration adapter
//!
//! Implements [`PatchTarget`] for an on-disk repository. Read-only queries
//! go through `git2`; anything that mutates the repository (checkout,
//! `git am`, branch deletion) shells out to the `git` CLI so hooks, config
//! and the index behave exactly as they would for a contributor.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{BranchType, Repository};
use log::{debug, info, warn};

use crate::core::error::RepoError;
use crate::core::ports::{MergeFailure, MergeProbe, PatchTarget};

/// Prefix of the disposable working branch
pub const WORKING_BRANCH_PREFIX: &str = "patchtest";

/// Where a [`TargetRepository`] is in its working-branch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoState {
    /// On the start branch
    #[default]
    Idle,
    /// The working branch is checked out
    WorkingBranchCheckedOut,
    /// A probe ran on the working branch
    MergeAttempted {
        /// Whether the probe applied cleanly
        success: bool,
    },
}

/// Handle over an existing git repository
///
/// The handle is `!Sync`: one working-branch cycle at a time.
#[derive(Debug)]
pub struct TargetRepository {
    root: PathBuf,
    start_branch: String,
    working_branch: String,
    state: Cell<RepoState>,
    last_merge_can_be_applied: Cell<Option<bool>>,
}

impl TargetRepository {
    /// Open the repository at `path` and remember the checked-out branch
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| RepoError::Open {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        let root = repo
            .workdir()
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);

        let start_branch = current_branch(&repo).ok_or_else(|| RepoError::DetachedHead(root.clone()))?;
        let working_branch = format!("{WORKING_BRANCH_PREFIX}_{}", std::process::id());
        debug!(
            "Opened {} on {start_branch}, working branch {working_branch}",
            root.display()
        );

        Ok(Self {
            root,
            start_branch,
            working_branch,
            state: Cell::new(RepoState::Idle),
            last_merge_can_be_applied: Cell::new(None),
        })
    }

    /// Repository working directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the disposable branch used for probes
    #[must_use]
    pub fn working_branch(&self) -> &str {
        &self.working_branch
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> RepoState {
        self.state.get()
    }

    /// Result of the most recent probe, `None` before the first one
    #[must_use]
    pub fn last_merge_can_be_applied(&self) -> Option<bool> {
        self.last_merge_can_be_applied.get()
    }

    /// Whether a local branch exists
    #[must_use]
    pub fn has_branch(&self, name: &str) -> bool {
        Repository::open(&self.root)
            .is_ok_and(|repo| repo.find_branch(name, BranchType::Local).is_ok())
    }

    /// Run git in the repository, returning stdout
    fn git(&self, args: &[&str]) -> Result<String, RepoError> {
        let command = args.join(" ");
        debug!("Running git {command} in {}", self.root.display());

        let output = Command::new("git").args(args).current_dir(&self.root).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(RepoError::Git {
                command,
                output: format!("{}\n{}", stderr.trim_end(), stdout.trim_end())
                    .trim()
                    .to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Put the working tree back to the working branch tip after a failed `git am`
    fn abort_merge(&self) {
        if let Err(e) = self.git(&["am", "--abort"]) {
            debug!("git am --abort failed ({e}), resetting instead");
            if let Err(e) = self.git(&["reset", "--hard", "HEAD"]) {
                warn!("Could not reset {} after a failed merge: {e}", self.root.display());
            }
        }
    }
}

impl PatchTarget for TargetRepository {
    fn start_branch(&self) -> &str {
        &self.start_branch
    }

    fn resolve_target(&self, branch: &str) -> String {
        if self.has_branch(branch) {
            branch.to_string()
        } else {
            debug!("Branch {branch} not found, using {}", self.start_branch);
            self.start_branch.clone()
        }
    }

    fn checkout_working_branch(&self, target: &str) -> Result<(), RepoError> {
        // -B resets a branch left behind by a crashed run
        self.git(&["checkout", "-B", &self.working_branch, target])?;
        self.state.set(RepoState::WorkingBranchCheckedOut);
        Ok(())
    }

    fn can_be_merged(&self, patch_file: &Path) -> MergeProbe {
        let patch_file = std::path::absolute(patch_file).unwrap_or_else(|_| patch_file.to_path_buf());
        let patch_arg = patch_file.to_string_lossy();

        let probe = match self.git(&["am", "--keep-cr", &patch_arg]) {
            Ok(_) => MergeProbe::Applied,
            Err(e) => {
                self.abort_merge();
                let detail = match e {
                    RepoError::Git { output, .. } => output,
                    other => other.to_string(),
                };
                MergeProbe::Failed(MergeFailure::new(detail))
            },
        };

        let success = probe.is_applied();
        info!(
            "{} {} to {}",
            patch_file.display(),
            if success { "applies" } else { "does not apply" },
            self.root.display()
        );
        self.last_merge_can_be_applied.set(Some(success));
        self.state.set(RepoState::MergeAttempted { success });
        probe
    }

    fn cleanup(&self) -> Result<(), RepoError> {
        self.git(&["checkout", &self.start_branch])?;
        if self.has_branch(&self.working_branch) {
            self.git(&["branch", "-D", &self.working_branch])?;
        }
        self.state.set(RepoState::Idle);
        Ok(())
    }
}

/// Short name of the checked-out branch, `None` when HEAD is detached
fn current_branch(repo: &Repository) -> Option<String> {
    if repo.head_detached().unwrap_or(false) {
        return None;
    }
    match repo.head() {
        Ok(head) => head.shorthand().map(ToString::to_string),
        // Unborn branch: HEAD names a branch with no commits yet
        Err(_) => repo
            .find_reference("HEAD")
            .ok()
            .and_then(|r| r.symbolic_target().map(ToString::to_string))
            .and_then(|target| target.strip_prefix("refs/heads/").map(ToString::to_string)),
    }
}
