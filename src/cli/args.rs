//! Defines the command-line arguments and subcommands for the compiler-test CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::{ffi::OsString, path::PathBuf};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "compiler-test",
    version,
    about = "Extracts embedded compiler acceptance tests and generates a runnable harness."
)]
pub struct CompilerTestArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse an annotated source and write an executable harness.
    Generate {
        /// The annotated compiler test source.
        #[arg(short = 'c', long = "source")]
        source: PathBuf,
        /// Where to write the harness.
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        /// Where to write the `<output>: <generator>` dependency record.
        #[arg(short = 'd', long = "depfile", visible_alias = "MF")]
        depfile: PathBuf,
        /// Overrides the language passed to the compiler's `-x` flag.
        #[arg(long)]
        language: Option<String>,
        /// YAML file overriding markers and language.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Executable the harness runs through (defaults to this binary).
        #[arg(long)]
        runner: Option<PathBuf>,
        /// Compiler invocation prefix, given after `--`.
        #[arg(last = true, required = true, num_args = 1..)]
        compiler: Vec<String>,
    },
    /// Execute a generated harness.
    Run {
        /// The harness file written by `generate`.
        harness: PathBuf,
        /// Run only tests whose name contains this text.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List the tests of an annotated source without generating anything.
    List {
        source: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate every annotated source under a directory.
    Check {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Rewrites the make-style `-MF <file>` spelling to `--depfile <file>`.
///
/// Arguments after `--` belong to the compiler and are left untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut in_compiler = false;
    args.into_iter()
        .map(|arg| {
            if in_compiler {
                return arg;
            }
            if arg == "--" {
                in_compiler = true;
                arg
            } else if arg == "-MF" {
                OsString::from("--depfile")
            } else {
                arg
            }
        })
        .collect()
}
