//! Patch series
//!
//! The ordered patches of one mbox file plus the branch they target.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::Patch;
use crate::adapters::mbox::{MboxReader, RawMessage};
use crate::core::error::SeriesError;
use crate::core::services::branch::infer_branch;

/// What to do with a message that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the whole series (default)
    #[default]
    Abort,
    /// Log the message and leave it out of the series
    Skip,
}

/// An ordered, non-empty list of patches from one mbox
#[derive(Debug, Clone)]
pub struct PatchSeries {
    patches: Vec<Patch>,
    source_path: PathBuf,
    branch: String,
}

impl PatchSeries {
    /// Read and parse an mbox file, aborting on the first malformed message
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeriesError> {
        Self::from_path_with(path, MalformedPolicy::Abort)
    }

    /// Read and parse an mbox file with an explicit malformed-message policy
    pub fn from_path_with(
        path: impl AsRef<Path>,
        policy: MalformedPolicy,
    ) -> Result<Self, SeriesError> {
        let path = path.as_ref();
        let reader = MboxReader::open(path)?;
        let messages = reader.collect::<Result<Vec<_>, _>>()?;
        Self::from_messages(path, &messages, policy)
    }

    /// Build a series from already split messages
    pub fn from_messages(
        source_path: impl Into<PathBuf>,
        messages: &[RawMessage],
        policy: MalformedPolicy,
    ) -> Result<Self, SeriesError> {
        let source_path = source_path.into();
        let mut patches = Vec::with_capacity(messages.len());

        for (index, raw) in messages.iter().enumerate() {
            match Patch::parse(raw) {
                Ok(patch) => patches.push(patch),
                Err(source) if policy == MalformedPolicy::Skip => {
                    warn!(
                        "Skipping message {index} in {}: {source}",
                        source_path.display()
                    );
                },
                Err(source) => {
                    return Err(SeriesError::Patch {
                        path: source_path,
                        index,
                        source,
                    });
                },
            }
        }

        Self::new(source_path, patches)
    }

    /// Build a series from parsed patches
    ///
    /// Fails with [`SeriesError::Empty`] when `patches` is empty.
    pub fn new(source_path: impl Into<PathBuf>, patches: Vec<Patch>) -> Result<Self, SeriesError> {
        let source_path = source_path.into();
        let Some(first) = patches.first() else {
            return Err(SeriesError::Empty(source_path));
        };

        let branch = infer_branch(&first.subject);
        debug!(
            "Series {} has {} patch(es) targeting {branch}",
            source_path.display(),
            patches.len()
        );

        Ok(Self {
            patches,
            source_path,
            branch,
        })
    }

    /// The patches, in mbox order
    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Number of patches (always at least one)
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// The mbox file this series was read from
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Branch inferred from the first patch's subject
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}
