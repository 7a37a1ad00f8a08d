//! Lexical tokens as supplied by a provider.

use compact_str::CompactString;
use std::ops::Deref;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span from two offsets.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` lies inside the span.
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A line/column pair. Lines are 1-based, columns are 0-based byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based byte column.
    pub column: usize,
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Operators and delimiters: `(`, `{`, `;`, `=>`, ...
    Punctuator,
    /// `// ...` up to the end of the line.
    LineComment,
    /// `/* ... */`, possibly spanning lines.
    BlockComment,
    /// Identifiers and keywords.
    Identifier,
    /// Numeric literals.
    Numeric,
    /// String literals.
    String,
}

impl TokenKind {
    /// Whether this is one of the two comment kinds.
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

/// An immutable token with its span and line/column bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenKind,
    /// Literal text as it appears in the source.
    pub text: CompactString,
    /// Byte range.
    pub span: Span,
    /// Position of the first byte.
    pub start: Position,
    /// Position just past the last byte.
    pub end: Position,
}

impl Token {
    /// Whether this token is the punctuator `text`.
    #[must_use]
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == text
    }

    /// `(` punctuator.
    #[must_use]
    pub fn is_opening_paren(&self) -> bool {
        self.is_punct("(")
    }

    /// `)` punctuator.
    #[must_use]
    pub fn is_closing_paren(&self) -> bool {
        self.is_punct(")")
    }

    /// Whether this is a comment of either kind.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }
}

/// The ordered token stream of one source unit, comments included.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wraps tokens that are already sorted by position.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Index of the first token starting at or after `offset`.
    #[must_use]
    pub fn first_at_or_after(&self, offset: usize) -> Option<usize> {
        let index = self.tokens.partition_point(|t| t.span.start < offset);
        (index < self.tokens.len()).then_some(index)
    }

    /// Index of the last token ending at or before `offset`.
    #[must_use]
    pub fn last_ending_at_or_before(&self, offset: usize) -> Option<usize> {
        self.tokens
            .partition_point(|t| t.span.end <= offset)
            .checked_sub(1)
    }
}

impl Deref for TokenStream {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse;

    #[test]
    fn test_offset_lookups() {
        let unit = parse("foo( bar )").expect("valid source");
        let tokens = &unit.tokens;
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens.first_at_or_after(0), Some(0));
        assert_eq!(tokens.first_at_or_after(4), Some(2));
        assert_eq!(tokens.first_at_or_after(10), None);
        assert_eq!(tokens.last_ending_at_or_before(10), Some(3));
        assert_eq!(tokens.last_ending_at_or_before(8), Some(2));
        assert_eq!(tokens.last_ending_at_or_before(2), None);
    }

    #[test]
    fn test_paren_predicates() {
        let unit = parse("(a)").expect("valid source");
        assert!(unit.tokens[0].is_opening_paren());
        assert!(unit.tokens[2].is_closing_paren());
        assert!(!unit.tokens[1].is_punct("a"));
    }
}
