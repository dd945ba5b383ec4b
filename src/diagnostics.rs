//! Unified, `miette`-based diagnostics for compiler-test.
//!
//! Every failure the tool can report is represented here. Parse failures carry
//! the offending file as a [`NamedSource`] plus a labelled span, so the CLI
//! renders them as annotated reports. Everything else (I/O, configuration,
//! harness manifests) wraps the underlying cause with a stable diagnostic code.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::{HeaderErrorKind, ParseState, Span};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A structural or grammar error in an annotated test source.
///
/// Any of these aborts processing of the whole file; no harness is written.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("First compiler test line must be \"{expected}\"")]
    #[diagnostic(
        code(compiler_test::parse::global_header),
        help("the global header marker must be the very first line of the file")
    )]
    MissingGlobalHeader {
        expected: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected the global header marker here")]
        span: SourceSpan,
    },

    #[error("{kind}")]
    #[diagnostic(code(compiler_test::parse::header), help("test headers read: test \"NAME\" must ( compile | fail [ with \"TEXT\" ] )"))]
    Header {
        kind: HeaderErrorKind,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this test header")]
        span: SourceSpan,
    },

    #[error("Test header expected.")]
    #[diagnostic(
        code(compiler_test::parse::orphan_line),
        help("every line of the tests section must belong to a test; start one with a test header")
    )]
    TestHeaderExpected {
        #[source_code]
        src: NamedSource<String>,
        #[label("this line comes before any test header")]
        span: SourceSpan,
    },

    #[error("Unexpected end of input.")]
    #[diagnostic(
        code(compiler_test::parse::eof),
        help("the file ended while {state}; did you forget the tests-end marker?")
    )]
    UnexpectedEof {
        state: ParseState,
        #[source_code]
        src: NamedSource<String>,
        #[label("input ends here")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Short machine-friendly classification, used by `check` summaries and tests.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParseError::MissingGlobalHeader { .. } => "global_header",
            ParseError::Header { .. } => "header",
            ParseError::TestHeaderExpected { .. } => "orphan_line",
            ParseError::UnexpectedEof { .. } => "eof",
        }
    }
}

// ============================================================================
// CRATE ERROR
// ============================================================================

/// Every failure mode of the generator and the runner.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to {action} `{}`", path.display())]
    #[diagnostic(code(compiler_test::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in `{}`", path.display())]
    #[diagnostic(
        code(compiler_test::config),
        help("configuration files are YAML with optional `markers` and `language` keys")
    )]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed harness `{}`: {message}", path.display())]
    #[diagnostic(
        code(compiler_test::harness::manifest),
        help("regenerate the harness with `compiler-test generate`")
    )]
    Manifest { path: PathBuf, message: String },

    #[error("could not encode the harness manifest")]
    #[diagnostic(code(compiler_test::harness::encode))]
    Encode(#[from] serde_json::Error),

    #[error("the compiler command is empty")]
    #[diagnostic(
        code(compiler_test::harness::compiler),
        help("pass the compiler invocation after `--`, e.g. `-- c++ -std=c++17`")
    )]
    EmptyCompiler,
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// Wraps file contents for attaching to a report.
pub fn to_named_source(name: impl AsRef<str>, text: &str) -> NamedSource<String> {
    NamedSource::new(name.as_ref(), text.to_string())
}

/// Renders an error as a full `miette` report on stderr.
pub fn print_error(error: impl Into<miette::Report>) {
    let report: miette::Report = error.into();
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn parse_error_report_carries_label_and_help() {
        let text = "#error NOT A TEST\n";
        let err = ParseError::MissingGlobalHeader {
            expected: "#error COMPILER TEST".to_string(),
            src: to_named_source("bad.cc", text),
            span: Span { start: 0, end: 17 }.into(),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("First compiler test line must be"));
        assert!(output.contains("expected the global header marker here"));
        assert!(output.contains("compiler_test::parse::global_header"));
    }

    #[test]
    fn transparent_parse_error_keeps_code() {
        let err: Error = ParseError::TestHeaderExpected {
            src: to_named_source("x.cc", "int x;\n"),
            span: Span { start: 0, end: 6 }.into(),
        }
        .into();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("compiler_test::parse::orphan_line"));
    }

    #[test]
    fn io_error_names_path_and_action() {
        let err = Error::io(
            "read",
            "missing.cc",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read `missing.cc`");
    }
}
