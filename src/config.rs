//! Configuration for parsing, generation and running.
//!
//! Nothing here is looked up implicitly: the CLI builds these values (from
//! flags and an optional YAML file) and passes them down explicitly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::diagnostics::{Error, Result};

/// The fixed literal lines that delimit an annotated source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Required first line of every file.
    pub global_header: String,
    /// Ends the preamble.
    pub tests_begin: String,
    /// Ends the tests section; everything after is epilogue.
    pub tests_end: String,
    /// Prefix that introduces a test header inside the tests section.
    pub sigil: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            global_header: "#error COMPILER TEST".to_string(),
            tests_begin: "#pragma tests begin".to_string(),
            tests_end: "#pragma tests end".to_string(),
            sigil: "#pragma".to_string(),
        }
    }
}

/// File-level configuration, loadable from YAML.
///
/// ```yaml
/// language: c
/// markers:
///   sigil: "#pragma"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub markers: Markers,
    /// Value passed to the compiler's `-x` flag.
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            language: "c++".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        Self::from_yaml(path, &text)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Inputs to harness generation beyond the parsed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessOptions {
    /// Compiler invocation prefix, e.g. `["c++", "-std=c++17", "-Iinclude"]`.
    pub compiler: Vec<String>,
    pub language: String,
    /// Recorded as the prerequisite in the dependency file.
    pub generator: PathBuf,
    /// Executable the harness shim hands itself to.
    pub runner: PathBuf,
}

impl HarnessOptions {
    /// Options using the running executable as both generator and runner.
    pub fn for_current_exe(compiler: Vec<String>, language: impl Into<String>) -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| Error::io("locate", "current executable", e))?;
        Ok(Self {
            compiler,
            language: language.into(),
            generator: exe.clone(),
            runner: exe,
        })
    }
}

/// Settings for executing a harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub use_colors: bool,
    /// Only run tests whose name contains this text.
    pub filter: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
            filter: None,
        }
    }
}

impl RunOptions {
    pub fn selects(&self, name: &str) -> bool {
        self.filter.as_deref().map_or(true, |f| name.contains(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_annotated_format() {
        let config = Config::default();
        assert_eq!(config.markers.global_header, "#error COMPILER TEST");
        assert_eq!(config.markers.tests_begin, "#pragma tests begin");
        assert_eq!(config.markers.tests_end, "#pragma tests end");
        assert_eq!(config.markers.sigil, "#pragma");
        assert_eq!(config.language, "c++");
    }

    #[test]
    fn yaml_overrides_only_what_it_names() {
        let config = Config::from_yaml(
            Path::new("cfg.yaml"),
            "language: c\nmarkers:\n  sigil: \"//@\"\n",
        )
        .unwrap();
        assert_eq!(config.language, "c");
        assert_eq!(config.markers.sigil, "//@");
        assert_eq!(config.markers.tests_end, "#pragma tests end");
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let err = Config::from_yaml(Path::new("cfg.yaml"), "langauge: c\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn filter_selects_by_substring() {
        let options = RunOptions {
            use_colors: false,
            filter: Some("vec".to_string()),
        };
        assert!(options.selects("vector basic"));
        assert!(!options.selects("map"));
        assert!(RunOptions {
            use_colors: false,
            filter: None
        }
        .selects("anything"));
    }
}
