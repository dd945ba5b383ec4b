//! Whole-file parser for annotated compiler test sources.
//!
//! ```text
//! <global header marker>
//! <preamble lines>*
//! <tests begin marker>
//! ( <sigil> test "NAME" must ( compile | fail [ with "TEXT" ] )
//!   <body line>* )*
//! <tests end marker>
//! <epilogue lines>*
//! ```
//!
//! Lines are compared with trailing whitespace removed. The first error stops
//! the parse; no partial registry is ever returned.

use std::fmt;

use tracing::{debug, trace};

use super::{parse_header, tokenize, Span};
use crate::config::Markers;
use crate::diagnostics::{to_named_source, ParseError};
use crate::registry::TestRegistry;
use crate::test::Test;

/// Phase of the file parser. `Epilogue` is the only accepting state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseState {
    ExpectGlobalHeader,
    Preamble,
    Body,
    Epilogue,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            ParseState::ExpectGlobalHeader => "expecting the global header",
            ParseState::Preamble => "reading the preamble",
            ParseState::Body => "reading tests",
            ParseState::Epilogue => "reading the epilogue",
        };
        f.write_str(phase)
    }
}

/// Line-driven state machine over one source text.
pub struct SourceParser<'a> {
    name: &'a str,
    text: &'a str,
    markers: &'a Markers,
    state: ParseState,
    registry: TestRegistry,
}

impl<'a> SourceParser<'a> {
    /// `name` only labels diagnostics; `text` is the full file contents.
    pub fn new(name: &'a str, text: &'a str, markers: &'a Markers) -> Self {
        Self {
            name,
            text,
            markers,
            state: ParseState::ExpectGlobalHeader,
            registry: TestRegistry::new(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn parse(mut self) -> Result<TestRegistry, ParseError> {
        let text = self.text;
        let mut offset = 0;
        for (index, raw) in text.split_inclusive('\n').enumerate() {
            let line = raw.trim_end();
            self.step(line, offset, index + 1)?;
            offset += raw.len();
        }
        self.finish()
    }

    /// Single transition function: one line in, next state out.
    fn step(&mut self, line: &str, offset: usize, number: usize) -> Result<(), ParseError> {
        let span = Span::new(offset, offset + line.len());
        trace!(number, state = ?self.state, line, "step");

        self.state = match self.state {
            ParseState::ExpectGlobalHeader if line == self.markers.global_header => {
                ParseState::Preamble
            }
            ParseState::ExpectGlobalHeader => {
                return Err(ParseError::MissingGlobalHeader {
                    expected: self.markers.global_header.clone(),
                    src: self.named_source(),
                    span: span.into(),
                })
            }

            ParseState::Preamble if line == self.markers.tests_begin => ParseState::Body,
            ParseState::Preamble => {
                self.registry.push_preamble(line);
                ParseState::Preamble
            }

            ParseState::Body if line == self.markers.tests_end => ParseState::Epilogue,
            ParseState::Body if line.trim_start().starts_with(self.markers.sigil.as_str()) => {
                let test = self.test_header(line, offset, number)?;
                debug!(name = %test.name, line = number, expectation = %test.expectation, "found test");
                self.registry.push_test(test);
                ParseState::Body
            }
            ParseState::Body if line.is_empty() => ParseState::Body,
            ParseState::Body => {
                if !self.registry.push_body_line(line) {
                    return Err(ParseError::TestHeaderExpected {
                        src: self.named_source(),
                        span: span.into(),
                    });
                }
                ParseState::Body
            }

            ParseState::Epilogue => {
                self.registry.push_epilogue(line);
                ParseState::Epilogue
            }
        };
        Ok(())
    }

    fn test_header(&self, line: &str, offset: usize, number: usize) -> Result<Test, ParseError> {
        // The sigil is matched by prefix, so it may itself contain spaces.
        let rest = line
            .trim_start()
            .strip_prefix(self.markers.sigil.as_str())
            .unwrap_or_default();
        let rest_offset = offset + (line.len() - rest.len());
        let mut words = tokenize(rest);
        words.retain(|token| !token.text.is_empty());
        let header = parse_header(&words, rest.len()).map_err(|e| ParseError::Header {
            kind: e.kind,
            src: self.named_source(),
            span: e.span.shift(rest_offset).into(),
        })?;
        Ok(Test::new(header.name, header.expectation, number))
    }

    fn finish(self) -> Result<TestRegistry, ParseError> {
        if self.state != ParseState::Epilogue {
            return Err(ParseError::UnexpectedEof {
                state: self.state,
                src: self.named_source(),
                span: Span::point(self.text.len()).into(),
            });
        }
        Ok(self.registry)
    }

    fn named_source(&self) -> miette::NamedSource<String> {
        to_named_source(self.name, self.text)
    }
}

/// Parses `text` (named `name` in diagnostics) into a [`TestRegistry`].
pub fn parse_source(name: &str, text: &str, markers: &Markers) -> Result<TestRegistry, ParseError> {
    let registry = SourceParser::new(name, text, markers).parse()?;
    debug!(file = name, tests = registry.len(), "parsed compiler test source");
    Ok(registry)
}
