//! Error types for the patchtest core
//!
//! Each failure domain has its own enum so callers can tell apart
//! "the input could not be ingested", "git refused an operation" and
//! "a rule is broken".

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while splitting an mbox stream
#[derive(Debug, Error)]
pub enum MboxError {
    /// The stream does not start with an envelope marker line
    #[error("not an mbox: first line does not start with \"From \"")]
    MalformedInput,

    /// The underlying reader failed
    #[error("io error reading mbox: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing one message into a patch
#[derive(Debug, Error)]
pub enum PatchError {
    /// The message could not be decoded into headers and a body
    #[error("malformed patch: {0}")]
    MalformedPatch(String),
}

/// Errors raised while building a patch series
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The mbox could not be split
    #[error(transparent)]
    Mbox(#[from] MboxError),

    /// A message in the mbox could not be parsed
    #[error("message {index} in {path}: {source}")]
    Patch {
        /// Mbox file the message came from
        path: PathBuf,
        /// Zero-based position of the message in the mbox
        index: usize,
        /// Underlying parse failure
        source: PatchError,
    },

    /// The mbox contained no usable patches
    #[error("no patches found in {0}")]
    Empty(PathBuf),
}

/// Errors raised by git operations on the target repository
#[derive(Debug, Error)]
pub enum RepoError {
    /// The path is not an openable git repository
    #[error("cannot open repository {path}: {message}")]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// libgit2 diagnostic
        message: String,
    },

    /// HEAD does not point at a branch, so there is nothing to return to
    #[error("repository {0} has a detached HEAD")]
    DetachedHead(PathBuf),

    /// A git command exited unsuccessfully
    #[error("git {command} failed: {output}")]
    Git {
        /// Arguments passed to git
        command: String,
        /// Raw diagnostic text printed by git (stderr, then stdout)
        output: String,
    },

    /// Spawning git failed
    #[error("io error running git: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a suite that exists but is broken
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The suite file could not be read
    #[error("cannot read suite {path}: {source}")]
    Io {
        /// Suite file
        path: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// The suite file is not valid TOML or has the wrong shape
    #[error("cannot parse suite {path}: {message}")]
    Parse {
        /// Suite file
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// A rule declares a pattern that is not a valid regex
    #[error("rule {rule} in {path} has an invalid pattern: {message}")]
    InvalidPattern {
        /// Suite file
        path: PathBuf,
        /// Rule name
        rule: String,
        /// Regex diagnostic
        message: String,
    },
}

/// Errors raised by the rule engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule returned a result that breaks the verdict contract
    #[error("rule {suite}/{rule} returned an invalid verdict: {detail}")]
    InvalidVerdictShape {
        /// Suite the rule belongs to
        suite: String,
        /// Rule name
        rule: String,
        /// What was wrong with the result
        detail: String,
    },

    /// A discovered suite could not be loaded
    #[error(transparent)]
    Suite(#[from] SuiteError),
}
