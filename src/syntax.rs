//! Syntax of annotated compiler test sources.
//!
//! Three layers, each feeding the next:
//! - [`tokenizer`] splits one line into whitespace-separated, quote-aware tokens;
//! - [`header`] runs the per-annotation grammar `test STRING must (compile | fail [with STRING])`;
//! - [`parser`] runs the whole-file state machine and fills a [`TestRegistry`](crate::registry::TestRegistry).

pub mod header;
pub mod parser;
pub mod tokenizer;

pub use header::{parse_header, HeaderError, HeaderErrorKind, HeaderParser, HeaderState, TestHeader};
pub use parser::{parse_source, ParseState, SourceParser};
pub use tokenizer::{tokenize, Token};

/// A byte range in a source text.
///
/// # Examples
///
/// ```rust
/// use compiler_test::syntax::Span;
/// let span = Span { start: 3, end: 8 };
/// assert_eq!(span.len(), 5);
/// assert_eq!(span.shift(10), Span { start: 13, end: 18 });
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span positioned at `at`.
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the span by `offset` bytes, e.g. from line-relative to file-relative.
    pub fn shift(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}
