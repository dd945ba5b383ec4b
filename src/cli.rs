//! The compiler-test command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Every command returns an exit code; errors are
//! rendered as `miette` reports on stderr.

use std::{path::Path, process};

use clap::Parser;
use tracing::info;

use crate::{
    config::{Config, HarnessOptions, RunOptions},
    diagnostics::{print_error, Error, Result},
    discovery::TestDiscoverer,
    harness::{self, Manifest},
    syntax::parse_source,
    test::runner::TestRunner,
};

pub mod args;
pub mod output;

use args::{Command, CompilerTestArgs};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    crate::logging::init();
    let args = CompilerTestArgs::parse_from(args::normalize_args(std::env::args_os()));

    let result = match args.command {
        Command::Generate {
            source,
            output,
            depfile,
            language,
            config,
            runner,
            compiler,
        } => handle_generate(GenerateArgs {
            source: &source,
            output: &output,
            depfile: &depfile,
            language,
            config: config.as_deref(),
            runner: runner.as_deref(),
            compiler,
        }),
        Command::Run { harness, filter } => handle_run(&harness, filter),
        Command::List { source, config } => handle_list(&source, config.as_deref()),
        Command::Check { path, config } => handle_check(&path, config.as_deref()),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

struct GenerateArgs<'a> {
    source: &'a Path,
    output: &'a Path,
    depfile: &'a Path,
    language: Option<String>,
    config: Option<&'a Path>,
    runner: Option<&'a Path>,
    compiler: Vec<String>,
}

fn handle_generate(args: GenerateArgs<'_>) -> Result<i32> {
    let config = Config::load_or_default(args.config)?;
    let language = args.language.unwrap_or(config.language);
    let mut options = HarnessOptions::for_current_exe(args.compiler, language)?;
    if let Some(runner) = args.runner {
        options.runner = runner.to_path_buf();
    }

    harness::generate(
        args.source,
        args.output,
        args.depfile,
        &config.markers,
        &options,
    )?;
    Ok(0)
}

fn handle_run(harness: &Path, filter: Option<String>) -> Result<i32> {
    let manifest = Manifest::load(harness)?;
    let options = RunOptions {
        filter,
        ..RunOptions::default()
    };

    let outcomes = TestRunner::new(&manifest, &options).run()?;
    let mut stdout = output::stdout(options.use_colors);
    let summary = output::print_report(&mut stdout, &outcomes)
        .map_err(|e| Error::io("write report to", "stdout", e))?;

    info!(
        passed = summary.passed,
        failed = summary.failed.len(),
        "compiler tests finished"
    );
    Ok(if summary.has_failures() { 1 } else { 0 })
}

fn handle_list(source: &Path, config: Option<&Path>) -> Result<i32> {
    let config = Config::load_or_default(config)?;
    let name = source.display().to_string();
    let text = std::fs::read_to_string(source).map_err(|e| Error::io("read", source, e))?;
    let registry = parse_source(&name, &text, &config.markers)?;

    let mut stdout = output::stdout(RunOptions::default().use_colors);
    output::print_test_list(&mut stdout, &name, registry.tests())
        .map_err(|e| Error::io("write listing to", "stdout", e))?;
    Ok(0)
}

fn handle_check(root: &Path, config: Option<&Path>) -> Result<i32> {
    let config = Config::load_or_default(config)?;
    let discoverer = TestDiscoverer::new(&config.markers);
    let files = discoverer.discover(root)?;

    let mut tests = 0;
    let mut invalid = 0;
    for file in &files {
        match discoverer.load(file)? {
            Ok(registry) => tests += registry.len(),
            Err(e) => {
                invalid += 1;
                print_error(e);
            }
        }
    }

    println!(
        "Checked {} file(s): {} test(s), {} invalid file(s)",
        files.len(),
        tests,
        invalid
    );
    Ok(if invalid > 0 { 1 } else { 0 })
}
