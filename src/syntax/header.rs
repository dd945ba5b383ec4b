//! Test header grammar.
//!
//! ```text
//! HEADER      ::= 'test' STRING EXPECTATION
//! EXPECTATION ::= 'must' ( 'compile' | 'fail' [ 'with' STRING ] )
//! STRING      ::= '"' .* '"'
//! ```
//!
//! The grammar is a small state machine: every token moves it one state
//! forward or fails. [`HeaderParser::finish`] accepts only in the two
//! accepting states, after `compile`/`with "..."` or directly after `fail`.

use std::fmt;

use thiserror::Error;

use super::{Span, Token};
use crate::test::Expectation;

/// Where the header grammar currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderState {
    ExpectKeywordTest,
    ExpectNameString,
    ExpectKeywordMust,
    ExpectOutcome,
    /// Accepting: `must fail` may stand alone or continue with `with STRING`.
    ExpectWithOrEnd,
    ExpectDiagnosticString,
    /// Accepting: nothing may follow.
    Complete,
}

impl HeaderState {
    pub fn is_accepting(self) -> bool {
        matches!(self, HeaderState::ExpectWithOrEnd | HeaderState::Complete)
    }
}

/// What the header grammar wanted but did not get.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderErrorKind {
    #[error("\"test\" expected.")]
    ExpectedTest,
    #[error("String expected.")]
    ExpectedString,
    #[error("\"must\" expected.")]
    ExpectedMust,
    #[error("\"compile\" or \"fail\" expected.")]
    ExpectedOutcome,
    #[error("\"with\" expected.")]
    ExpectedWith,
    #[error("Unexpected \"{0}\" after a complete test header.")]
    TrailingToken(String),
    #[error("Incomplete test header.")]
    Incomplete,
}

/// A header grammar failure, with a span relative to the annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderError {
    pub kind: HeaderErrorKind,
    pub span: Span,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.kind, self.span.start)
    }
}

impl std::error::Error for HeaderError {}

/// A validated test header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHeader {
    pub name: String,
    pub expectation: Expectation,
}

/// Incremental parser for one annotation line.
#[derive(Debug, Clone)]
pub struct HeaderParser {
    state: HeaderState,
    name: Option<String>,
    expectation: Option<Expectation>,
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            state: HeaderState::ExpectKeywordTest,
            name: None,
            expectation: None,
        }
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    /// Consumes one token, advancing the grammar or failing.
    pub fn feed(&mut self, token: &Token<'_>) -> Result<(), HeaderError> {
        let fail = |kind| HeaderError {
            kind,
            span: token.span(),
        };

        self.state = match (self.state, token.text) {
            (HeaderState::ExpectKeywordTest, "test") => HeaderState::ExpectNameString,
            (HeaderState::ExpectKeywordTest, _) => return Err(fail(HeaderErrorKind::ExpectedTest)),

            (HeaderState::ExpectNameString, _) => {
                let name = token
                    .unquoted()
                    .ok_or_else(|| fail(HeaderErrorKind::ExpectedString))?;
                self.name = Some(name.to_string());
                HeaderState::ExpectKeywordMust
            }

            (HeaderState::ExpectKeywordMust, "must") => HeaderState::ExpectOutcome,
            (HeaderState::ExpectKeywordMust, _) => return Err(fail(HeaderErrorKind::ExpectedMust)),

            (HeaderState::ExpectOutcome, "compile") => {
                self.expectation = Some(Expectation::MustCompile);
                HeaderState::Complete
            }
            (HeaderState::ExpectOutcome, "fail") => {
                self.expectation = Some(Expectation::MustFail);
                HeaderState::ExpectWithOrEnd
            }
            (HeaderState::ExpectOutcome, _) => return Err(fail(HeaderErrorKind::ExpectedOutcome)),

            (HeaderState::ExpectWithOrEnd, "with") => HeaderState::ExpectDiagnosticString,
            (HeaderState::ExpectWithOrEnd, _) => return Err(fail(HeaderErrorKind::ExpectedWith)),

            (HeaderState::ExpectDiagnosticString, _) => {
                let text = token
                    .unquoted()
                    .ok_or_else(|| fail(HeaderErrorKind::ExpectedString))?;
                self.expectation = Some(Expectation::MustFailWith(text.to_string()));
                HeaderState::Complete
            }

            (HeaderState::Complete, extra) => {
                return Err(fail(HeaderErrorKind::TrailingToken(extra.to_string())))
            }
        };
        Ok(())
    }

    /// Ends the header; `end` is the line length, used to place an
    /// "incomplete" diagnostic at the end of the line.
    pub fn finish(self, end: usize) -> Result<TestHeader, HeaderError> {
        let incomplete = HeaderError {
            kind: HeaderErrorKind::Incomplete,
            span: Span::point(end),
        };
        if !self.state.is_accepting() {
            return Err(incomplete);
        }
        match (self.name, self.expectation) {
            (Some(name), Some(expectation)) => Ok(TestHeader { name, expectation }),
            _ => Err(incomplete),
        }
    }
}

/// Runs the header grammar over `tokens` (sigil already removed).
///
/// ```rust
/// use compiler_test::syntax::{parse_header, tokenize};
/// use compiler_test::test::Expectation;
/// let line = r#"test "typo" must fail with "no member""#;
/// let header = parse_header(&tokenize(line), line.len()).unwrap();
/// assert_eq!(header.name, "typo");
/// assert_eq!(header.expectation, Expectation::MustFailWith("no member".into()));
/// ```
pub fn parse_header(tokens: &[Token<'_>], end: usize) -> Result<TestHeader, HeaderError> {
    let mut parser = HeaderParser::new();
    for token in tokens {
        parser.feed(token)?;
    }
    parser.finish(end)
}
