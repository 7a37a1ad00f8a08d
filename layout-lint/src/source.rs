//! Raw source text with a line-start table.

use crate::syntax::SyntaxTree;
use crate::token::{Position, Span, TokenStream};

/// The text of one source unit together with the byte index of every line start.
///
/// Lines are split on `\n` only; a trailing `\r` stays part of the line text
/// and is treated as whitespace by every check that inspects it.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Creates a new `SourceText` by scanning the text for newlines.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        // newlines are always single bytes in UTF-8
        for (i, byte) in text.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// The full text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of lines (a text without newline has one line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where the 1-based `line` starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }

    /// Text of the 1-based `line`, without its terminating newline.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line)
            .map_or(self.text.len(), |next| next - 1);
        self.text.get(start..end)
    }

    /// Converts a byte offset to a 1-indexed line and 0-indexed byte column.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        };
        Position {
            line,
            column: offset - self.line_starts[line - 1],
        }
    }

    /// The text covered by `span`, or `""` when the span is out of bounds.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or_default()
    }
}

/// One immutable snapshot handed over by a token/AST provider.
///
/// Every rule pass reads a `SourceUnit` and never mutates it.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Raw text and line table.
    pub text: SourceText,
    /// Ordered tokens, comments included.
    pub tokens: TokenStream,
    /// Syntax tree over the same text.
    pub tree: SyntaxTree,
}

impl SourceUnit {
    /// Bundles the three provider outputs.
    #[must_use]
    pub fn new(text: SourceText, tokens: TokenStream, tree: SyntaxTree) -> Self {
        Self { text, tokens, tree }
    }
}
