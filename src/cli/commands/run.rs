//! Run suites over one or more mbox files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args};
use colored::Colorize;
use log::{debug, info};
use walkdir::WalkDir;

use crate::cli::app::{EXIT_FAILURES, EXIT_OK};
use patchtest::adapters::git::TargetRepository;
use patchtest::config::{Config, RunConfig};
use patchtest::core::models::{PatchSeries, Summary};
use patchtest::core::ports::PatchTarget;
use patchtest::core::services::Engine;
use patchtest::core::suites::SuiteRegistry;
use patchtest::output::{OutputMode, to_pretty};

/// Extension appended to the mbox name for result files
pub const RESULT_EXTENSION: &str = "testresult";

/// File names picked up by `--directory`
const MBOX_PATTERNS: [&str; 2] = ["*.mbox", "*.patch"];

/// Arguments of `patchtest run`
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["patch", "directory"])))]
#[command(group(ArgGroup::new("log").args(["log_results", "log_json"])))]
pub struct RunArgs {
    /// The mbox to test
    #[arg(long, value_name = "PATCH")]
    pub patch: Option<PathBuf>,

    /// A directory of mboxes (`*.mbox`, `*.patch`) to test
    #[arg(long, value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Repository the series is applied to [default: current directory, if it is one]
    #[arg(long, value_name = "REPO")]
    pub repodir: Option<PathBuf>,

    /// Comma-separated suites to run (core always runs)
    #[arg(short, long, value_delimiter = ',')]
    pub suites: Vec<String>,

    /// Extra directory to search for suite files (repeatable)
    #[arg(short = 'm', long = "module-path", value_name = "DIR")]
    pub module_paths: Vec<PathBuf>,

    /// Branch to apply the series to, instead of the one named in the subject
    #[arg(short = 'b', long)]
    pub target_branch: Option<String>,

    /// Write result lines to `<mbox>.testresult`
    #[arg(long)]
    pub log_results: bool,

    /// Write JSON results to `<mbox>.testresult`
    #[arg(long)]
    pub log_json: bool,

    /// Leave undecodable messages out instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

impl RunArgs {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            suites: self.suites.iter().map(|s| s.trim().to_string()).collect(),
            module_paths: self.module_paths.clone(),
            target_branch: self.target_branch.clone(),
            skip_malformed: self.skip_malformed,
        }
    }
}

/// Run the configured suites over every input; returns the exit status
pub fn run_series(args: &RunArgs, mode: OutputMode) -> anyhow::Result<u8> {
    let repository = open_repository(args.repodir.as_deref())?;
    let config = Config::load(repository.as_ref().map(TargetRepository::root))?;
    let settings = config.run.merge(args.overrides());

    let registry = SuiteRegistry::with_module_paths(&settings.module_paths);
    let engine = Engine::new(registry, &settings.suites);
    debug!("Running suites {:?}", engine.suites());

    let inputs = collect_inputs(args)?;
    let target = repository.as_ref().map(|repo| {
        let target: &dyn PatchTarget = repo;
        target
    });

    let mut total = Summary::default();
    let mut documents = serde_json::Map::new();

    for path in &inputs {
        let series = PatchSeries::from_path_with(path, settings.malformed_policy())
            .with_context(|| format!("cannot read {}", path.display()))?;
        let results = engine.run(&series, target, settings.target_branch.as_deref())?;

        match mode {
            OutputMode::Human => results.render(mode),
            OutputMode::Json => {
                documents.insert(path.display().to_string(), results.json_value());
            },
        }

        if args.log_results || args.log_json {
            let log_path = result_path(path);
            fs::write(&log_path, results.to_log(args.log_json))
                .with_context(|| format!("cannot write {}", log_path.display()))?;
            info!("Wrote {}", log_path.display());
        }

        let summary = results.summary();
        total.pass += summary.pass;
        total.fail += summary.fail;
        total.skip += summary.skip;
    }

    match mode {
        OutputMode::Human => print_summary(&total),
        OutputMode::Json if args.patch.is_some() => {
            let document = documents.into_iter().next().map(|(_, doc)| doc).unwrap_or_default();
            println!("{}", to_pretty(&document));
        },
        OutputMode::Json => println!("{}", to_pretty(&documents)),
    }

    Ok(if total.fail > 0 { EXIT_FAILURES } else { EXIT_OK })
}

/// An explicit `--repodir` must open; the current directory is optional
fn open_repository(repodir: Option<&Path>) -> anyhow::Result<Option<TargetRepository>> {
    match repodir {
        Some(dir) => TargetRepository::open(dir)
            .map(Some)
            .with_context(|| format!("cannot use {} as the target repository", dir.display())),
        None => match TargetRepository::open(".") {
            Ok(repo) => Ok(Some(repo)),
            Err(e) => {
                debug!("No target repository: {e}");
                Ok(None)
            },
        },
    }
}

fn collect_inputs(args: &RunArgs) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(patch) = &args.patch {
        return Ok(vec![patch.clone()]);
    }
    let Some(dir) = &args.directory else {
        anyhow::bail!("either --patch or --directory is required");
    };

    let patterns = MBOX_PATTERNS
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && patterns.iter().any(|p| p.matches(&name)) {
            inputs.push(entry.into_path());
        }
    }

    if inputs.is_empty() {
        anyhow::bail!("no mbox files found in {}", dir.display());
    }
    debug!("Found {} mbox file(s) in {}", inputs.len(), dir.display());
    Ok(inputs)
}

/// `<basename>.testresult` in the current directory
fn result_path(mbox: &Path) -> PathBuf {
    let name = mbox
        .file_name()
        .map_or_else(|| "patchtest".into(), |n| n.to_string_lossy().into_owned());
    PathBuf::from(format!("{name}.{RESULT_EXTENSION}"))
}

fn print_summary(summary: &Summary) {
    let fail = format!("{} failed", summary.fail);
    eprintln!(
        "\n{} verdict(s): {}, {}, {}",
        summary.total(),
        format!("{} passed", summary.pass).green(),
        if summary.fail > 0 { fail.red().bold() } else { fail.normal() },
        format!("{} skipped", summary.skip).yellow()
    );
}
