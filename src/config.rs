//! Configuration
//!
//! Settings are read from `.patchtest.toml` at the repository root, or,
//! when the repository has none, from `~/.patchtest/config.toml`.
//! Command-line flags are layered on top with [`RunConfig::merge`].
//!
//! ```toml
//! [run]
//! suites = ["oe"]
//! module_paths = ["/srv/patchtest/suites"]
//! target_branch = "master"
//! skip_malformed = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::models::MalformedPolicy;

/// Project configuration filename
pub const PROJECT_CONFIG: &str = ".patchtest.toml";

/// Directory of the global configuration, under the home directory
pub const GLOBAL_CONFIG_DIR: &str = ".patchtest";

/// Global configuration filename
pub const GLOBAL_CONFIG: &str = "config.toml";

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Defaults for `patchtest run`
    #[serde(default)]
    pub run: RunConfig,
}

/// Settings for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Suites to run besides `core`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suites: Vec<String>,
    /// Directories searched for suite files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub module_paths: Vec<PathBuf>,
    /// Branch to apply series to, overriding inference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Leave undecodable messages out instead of aborting
    #[serde(default)]
    pub skip_malformed: bool,
}

impl Config {
    /// Path of the global configuration file, if there is a home directory
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG))
    }

    /// Load the configuration that applies to `repo_root`
    ///
    /// Falls back to defaults when no file exists.
    pub fn load(repo_root: Option<&Path>) -> anyhow::Result<Self> {
        let project = repo_root.map(|root| root.join(PROJECT_CONFIG));
        let candidates = project.into_iter().chain(Self::global_path());

        for path in candidates {
            if path.is_file() {
                return Self::load_file(&path);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load one configuration file
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl RunConfig {
    /// Layer command-line values over file values
    ///
    /// Lists are concatenated (file first) without repeats; scalars from
    /// `overrides` win when set.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        for suite in overrides.suites {
            if !self.suites.contains(&suite) {
                self.suites.push(suite);
            }
        }
        for path in overrides.module_paths {
            if !self.module_paths.contains(&path) {
                self.module_paths.push(path);
            }
        }
        if overrides.target_branch.is_some() {
            self.target_branch = overrides.target_branch;
        }
        self.skip_malformed |= overrides.skip_malformed;
        self
    }

    /// Malformed-message policy for this run
    #[must_use]
    pub const fn malformed_policy(&self) -> MalformedPolicy {
        if self.skip_malformed {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }
}
