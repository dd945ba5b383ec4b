//! Quote-aware line tokenizer.
//!
//! A token is a run of non-whitespace characters. A double quote toggles a
//! quoted mode in which whitespace no longer splits; the quotes stay part of the
//! token. Unterminated quotes are left for the grammar layer to reject.

use super::Span;

/// One token of a line, borrowed from the line text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of the token within its line.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }

    /// The contents of a `"..."` token with the outer quotes removed.
    ///
    /// The match is greedy: `"a"b"` yields `a"b`.
    pub fn unquoted(&self) -> Option<&'a str> {
        let inner = self.text.strip_prefix('"')?.strip_suffix('"')?;
        Some(inner)
    }
}

/// Splits `line` into tokens.
///
/// A line with no tokens at all (empty or whitespace only) yields a single empty
/// token, so callers must skip blank lines before treating tokens as structure.
///
/// ```rust
/// use compiler_test::syntax::tokenize;
/// let words: Vec<_> = tokenize(r#"#pragma test "two words" must compile"#)
///     .into_iter()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(words, ["#pragma", "test", "\"two words\"", "must", "compile"]);
/// ```
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut quoted = false;

    for (i, ch) in line.char_indices() {
        if ch.is_whitespace() && !quoted {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &line[s..i],
                    offset: s,
                });
            }
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        if ch == '"' {
            quoted = !quoted;
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &line[s..],
            offset: s,
        });
    }

    if tokens.is_empty() {
        tokens.push(Token {
            text: "",
            offset: line.len(),
        });
    }
    tokens
}
