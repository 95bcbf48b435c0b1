//! List discoverable suites

use std::path::{Path, PathBuf};

use patchtest::config::Config;
use patchtest::core::suites::SuiteRegistry;
use patchtest::output::{OutputMode, SuiteListResult};

/// List the suites the registry can find, configured directories included
pub fn list_suites(module_paths: &[PathBuf], mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(Some(Path::new(".")))?;

    let mut dirs = config.run.module_paths;
    dirs.extend(module_paths.iter().cloned());

    let registry = SuiteRegistry::with_module_paths(&dirs);
    let result = SuiteListResult::from(registry.available()?);
    result.render(mode);
    Ok(())
}
