//! Temporary git repository helper for integration tests

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary git repository for testing, on branch `main`
pub struct TempGitRepo {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TempGitRepo {
    /// Create a new temporary git repository
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().to_path_buf();

        let repo = Self {
            _temp_dir: temp_dir,
            path,
        };
        repo.git_ok(&["init", "-q", "-b", "main"]);
        repo.git_ok(&["config", "user.name", "Test User"]);
        repo.git_ok(&["config", "user.email", "test@yoctoproject.org"]);
        repo.git_ok(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Create a repository with one commit holding `a.txt`
    pub fn with_base_commit() -> Self {
        let repo = Self::new();
        repo.write_file("a.txt", "one\ntwo\nthree\n");
        repo.commit_all("base: initial commit");
        repo
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file to the repository
    pub fn write_file(&self, name: &str, content: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(file_path, content).expect("Failed to write file");
    }

    /// Stage everything and commit it with a sign-off
    pub fn commit_all(&self, message: &str) {
        self.git_ok(&["add", "-A"]);
        self.git_ok(&["commit", "-q", "-s", "-m", message]);
    }

    /// `git format-patch --stdout` for a revision range
    pub fn format_patch(&self, range: &str) -> String {
        let output = self.git_ok(&["format-patch", "--stdout", range]);
        String::from_utf8(output.stdout).expect("format-patch output is UTF-8")
    }

    /// Name of the checked-out branch
    pub fn current_branch(&self) -> String {
        self.stdout(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Commit id a revision points at
    pub fn rev_parse(&self, rev: &str) -> String {
        self.stdout(&["rev-parse", rev])
    }

    /// Whether a local branch exists
    pub fn has_branch(&self, name: &str) -> bool {
        self.git(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{name}")])
            .status
            .success()
    }

    /// `git status --porcelain`, empty for a clean tree
    pub fn status(&self) -> String {
        self.stdout(&["status", "--porcelain"])
    }

    /// Whether a `git am` session is still in progress
    pub fn am_in_progress(&self) -> bool {
        self.path.join(".git").join("rebase-apply").exists()
    }

    /// Run a git command and return output
    pub fn git(&self, args: &[&str]) -> std::process::Output {
        Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .expect("Failed to run git command")
    }

    /// Run a git command that must succeed
    pub fn git_ok(&self, args: &[&str]) -> std::process::Output {
        let output = self.git(args);
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn stdout(&self, args: &[&str]) -> String {
        String::from_utf8_lossy(&self.git_ok(args).stdout).trim().to_string()
    }
}

impl Default for TempGitRepo {
    fn default() -> Self {
        Self::new()
    }
}
