//! Harness generation.
//!
//! A generated harness is an executable file made of two parts: a short POSIX
//! shell shim that re-executes the runner (`compiler-test run <harness>`), and
//! after a `#@manifest` line, a JSON [`Manifest`] with every assembled unit, its
//! test name and expectation, and the compiler prefix.
//!
//! ```text
//! #!/bin/sh
//! # Generated by compiler-test from "vector_tests.cc". Do not edit.
//! runner='/usr/local/bin/compiler-test'
//! if [ ! -x "$runner" ]; then
//!   ...report a failed run and exit 1...
//! fi
//! exec "$runner" run "$0" "$@"
//! #@manifest
//! { "compiler": ["c++", "-std=c++17"], "language": "c++", "tests": [...] }
//! ```
//!
//! Rendering is deterministic: the same source and options always produce the
//! same bytes.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{HarnessOptions, Markers};
use crate::diagnostics::{Error, Result};
use crate::registry::TestRegistry;
use crate::syntax::parse_source;
use crate::test::Expectation;

/// Separates the shell shim from the JSON manifest.
pub const MANIFEST_MARKER: &str = "#@manifest";

// ============================================================================
// MANIFEST
// ============================================================================

/// One compilable unit and what its compilation must do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessRecord {
    pub code: String,
    pub name: String,
    pub expectation: Expectation,
}

/// Everything a harness needs at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub compiler: Vec<String>,
    pub language: String,
    pub tests: Vec<HarnessRecord>,
}

impl Manifest {
    pub fn new(registry: &TestRegistry, compiler: Vec<String>, language: impl Into<String>) -> Self {
        let tests = registry
            .units()
            .map(|(test, code)| HarnessRecord {
                code,
                name: test.name.clone(),
                expectation: test.expectation.clone(),
            })
            .collect();
        Self {
            compiler,
            language: language.into(),
            tests,
        }
    }

    /// Extracts the manifest embedded in a harness file's text.
    pub fn from_harness_text(path: &Path, text: &str) -> Result<Self> {
        let malformed = |message: String| Error::Manifest {
            path: path.to_path_buf(),
            message,
        };
        let (_, json) = text
            .split_once(&format!("\n{MANIFEST_MARKER}\n"))
            .ok_or_else(|| malformed(format!("no `{MANIFEST_MARKER}` line")))?;
        serde_json::from_str(json).map_err(|e| malformed(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        Self::from_harness_text(path, &text)
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Renders the full harness text for `manifest`.
pub fn render(manifest: &Manifest, source: &Path, runner: &Path) -> Result<String> {
    let json = serde_json::to_string_pretty(manifest)?;
    let runner = runner.to_string_lossy();
    Ok(format!(
        "#!/bin/sh\n\
         # Generated by compiler-test from {source:?}. Do not edit.\n\
         runner={runner}\n\
         if [ ! -x \"$runner\" ]; then\n\
         \x20 echo 'Running compiler tests'\n\
         \x20 echo \"harness FAILED: runner $runner is missing; regenerate this harness.\"\n\
         \x20 echo 'Test failed: harness'\n\
         \x20 exit 1\n\
         fi\n\
         exec \"$runner\" run \"$0\" \"$@\"\n\
         {MANIFEST_MARKER}\n\
         {json}\n",
        source = source.to_string_lossy(),
        runner = shell_quote(&runner),
    ))
}

/// Quotes `text` as a single POSIX shell word.
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// The single-line dependency record `<output>: <generator>`.
pub fn depfile_record(output: &Path, generator: &Path) -> String {
    format!("{}: {}", output.display(), generator.display())
}

// ============================================================================
// GENERATION
// ============================================================================

/// Parses `source`, then writes the harness to `output` and the dependency
/// record to `depfile`. Nothing is written if the source fails to parse.
///
/// Returns the number of tests in the harness.
pub fn generate(
    source: &Path,
    output: &Path,
    depfile: &Path,
    markers: &Markers,
    options: &HarnessOptions,
) -> Result<usize> {
    if options.compiler.is_empty() {
        return Err(Error::EmptyCompiler);
    }

    let text = fs::read_to_string(source).map_err(|e| Error::io("read", source, e))?;
    let registry = parse_source(&source.display().to_string(), &text, markers)?;

    let manifest = Manifest::new(&registry, options.compiler.clone(), options.language.as_str());
    let harness = render(&manifest, source, &options.runner)?;

    write_executable(output, &harness)?;
    fs::write(depfile, depfile_record(output, &options.generator))
        .map_err(|e| Error::io("write", depfile, e))?;

    info!(
        source = %source.display(),
        output = %output.display(),
        tests = registry.len(),
        "generated compiler test harness"
    );
    Ok(registry.len())
}

fn write_executable(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io("write", path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o775))
            .map_err(|e| Error::io("set permissions on", path, e))?;
    }
    Ok(())
}
