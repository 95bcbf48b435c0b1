//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use super::commands::{self, RunArgs};
use patchtest::core::error::{EngineError, SuiteError};
use patchtest::output::OutputMode;

/// No rule failed
pub const EXIT_OK: u8 = 0;
/// At least one rule failed
pub const EXIT_FAILURES: u8 = 1;
/// The input could not be ingested
pub const EXIT_INPUT_ERROR: u8 = 2;
/// A rule or suite is broken
pub const EXIT_RULE_DEFECT: u8 = 3;

/// patchtest - Validate mbox patch series
#[derive(Parser, Debug)]
#[command(
    name = "patchtest",
    version,
    about = "Validate mbox patch series before they are merged",
    long_about = "Run suites of rules over every patch of an mbox and check that the\n\
                  series applies to a target git repository.\n\n\
                  Exit status: 0 all rules passed or skipped, 1 a rule failed,\n\
                  2 the input could not be read, 3 a rule or suite is broken."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, visible_alias = "debug", short_alias = 'd')]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run suites over an mbox or a directory of mboxes
    Run(RunArgs),

    /// List the suites that can be run
    Suites {
        /// Extra directory to search for suite files (repeatable)
        #[arg(short = 'm', long = "module-path", value_name = "DIR")]
        module_paths: Vec<PathBuf>,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let result = match cli.command {
        Some(Command::Run(args)) => commands::run_series(&args, output_mode),
        Some(Command::Suites { module_paths }) => {
            commands::list_suites(&module_paths, output_mode).map(|()| EXIT_OK)
        },
        Some(Command::Version) => {
            print_version(output_mode, false);
            Ok(EXIT_OK)
        },
        None => {
            print_version(output_mode, true);
            Ok(EXIT_OK)
        },
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(exit_code_for(&e))
        },
    }
}

fn print_version(mode: OutputMode, hint: bool) {
    if mode == OutputMode::Json {
        let mut value = serde_json::json!({ "version": patchtest::VERSION });
        if hint {
            value["hint"] = "Use --help for usage".into();
        }
        println!("{value}");
    } else {
        println!("patchtest v{}", patchtest::VERSION);
        if hint {
            println!("\nRun 'patchtest --help' for usage");
            println!("Run 'patchtest run --patch <mbox>' to test a series");
        }
    }
}

/// Broken rules and suites are defects; anything else kept the input from being read
fn exit_code_for(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<EngineError>().is_some() || error.downcast_ref::<SuiteError>().is_some() {
        EXIT_RULE_DEFECT
    } else {
        EXIT_INPUT_ERROR
    }
}
