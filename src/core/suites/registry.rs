//! Suite discovery
//!
//! The registry holds an ordered list of search locations. The built-in
//! location always comes first, so a suite file can never shadow `core`.
//! Looking a suite up walks the locations in order and the first hit wins.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Suite, SuiteOrigin, core_suite, merge, oe, pattern};
use crate::core::error::SuiteError;

/// Extension of suite files
pub const SUITE_EXTENSION: &str = "toml";

/// Where suites are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchLocation {
    /// Suites compiled into patchtest
    Builtin,
    /// A directory of `<name>.toml` suite files
    Directory(PathBuf),
}

/// A discoverable suite, without loading its rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteInfo {
    /// Suite name
    pub name: String,
    /// Where it would be loaded from
    pub origin: SuiteOrigin,
}

const BUILTIN_SUITES: [&str; 3] = [super::CORE_SUITE, oe::NAME, merge::NAME];

fn builtin(name: &str) -> Option<Suite> {
    match name {
        super::CORE_SUITE => Some(core_suite::suite()),
        oe::NAME => Some(oe::suite()),
        merge::NAME => Some(merge::suite()),
        _ => None,
    }
}

/// Ordered set of search locations
#[derive(Debug, Clone)]
pub struct SuiteRegistry {
    locations: Vec<SearchLocation>,
}

impl Default for SuiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteRegistry {
    /// Registry with only the built-in suites
    #[must_use]
    pub fn new() -> Self {
        Self {
            locations: vec![SearchLocation::Builtin],
        }
    }

    /// Registry with the built-in suites, then `dirs` in order
    ///
    /// Repeated directories are kept once, at their first position.
    #[must_use]
    pub fn with_module_paths(dirs: &[PathBuf]) -> Self {
        let mut registry = Self::new();
        for dir in dirs {
            let location = SearchLocation::Directory(dir.clone());
            if !registry.locations.contains(&location) {
                registry.locations.push(location);
            }
        }
        registry
    }

    /// Search locations, in lookup order
    #[must_use]
    pub fn locations(&self) -> &[SearchLocation] {
        &self.locations
    }

    /// Look a suite up by name
    ///
    /// Returns `Ok(None)` when no location has it. A suite file that exists
    /// but cannot be loaded is an error.
    pub fn find(&self, name: &str) -> Result<Option<Suite>, SuiteError> {
        for location in &self.locations {
            match location {
                SearchLocation::Builtin => {
                    if let Some(suite) = builtin(name) {
                        debug!("Found suite {name} (builtin)");
                        return Ok(Some(suite));
                    }
                },
                SearchLocation::Directory(dir) => {
                    let path = suite_path(dir, name);
                    if path.is_file() {
                        debug!("Found suite {name} at {}", path.display());
                        return pattern::load_suite_file(name, &path).map(Some);
                    }
                },
            }
        }
        debug!("Suite {name} not found in {} location(s)", self.locations.len());
        Ok(None)
    }

    /// Every suite the registry can find, first location winning on name clashes
    pub fn available(&self) -> Result<Vec<SuiteInfo>, SuiteError> {
        let mut found: Vec<SuiteInfo> = Vec::new();

        for location in &self.locations {
            let candidates: Vec<SuiteInfo> = match location {
                SearchLocation::Builtin => BUILTIN_SUITES
                    .iter()
                    .map(|name| SuiteInfo {
                        name: (*name).to_string(),
                        origin: SuiteOrigin::Builtin,
                    })
                    .collect(),
                SearchLocation::Directory(dir) => list_suite_files(dir)?,
            };

            for info in candidates {
                if !found.iter().any(|f| f.name == info.name) {
                    found.push(info);
                }
            }
        }

        Ok(found)
    }
}

fn suite_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{SUITE_EXTENSION}"))
}

fn list_suite_files(dir: &Path) -> Result<Vec<SuiteInfo>, SuiteError> {
    let escaped = PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy()));
    let pattern = suite_path(&escaped, "*");
    let pattern = pattern.to_string_lossy();

    let paths = glob::glob(&pattern).map_err(|e| SuiteError::Parse {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut suites = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => {
                if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                    suites.push(SuiteInfo {
                        name: name.to_string(),
                        origin: SuiteOrigin::File(path.clone()),
                    });
                }
            },
            Ok(_) => {},
            Err(e) => warn!("Cannot read {}: {e}", e.path().display()),
        }
    }
    suites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(suites)
}
