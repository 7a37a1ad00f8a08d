//! Diagnostics and the fixes they carry.

use crate::token::{Position, Span};
use std::fmt;

/// What a diagnostic complains about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Padding is required and missing.
    AlwaysPadBlock,
    /// Padding is forbidden and present.
    NeverPadBlock,
    /// A sliced block (loose mode) is missing its padding.
    AlwaysPadSlicedBlock,
    /// A monolith block (loose mode) carries padding.
    NeverPadMonolithBlock,
    /// Bottom padding while `no_bottom_padding` is set.
    NeverPadBottom,
    /// No space after `(`.
    MissingOpeningSpace,
    /// No space before `)`.
    MissingClosingSpace,
    /// Space after `(` that must go.
    RejectedOpeningSpace,
    /// Space before `)` that must go.
    RejectedClosingSpace,
}

impl MessageKind {
    /// Human readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AlwaysPadBlock => "Block must be padded by blank lines.",
            Self::NeverPadBlock => "Block must not be padded by blank lines.",
            Self::AlwaysPadSlicedBlock => {
                "Block containing blank lines must be padded by blank lines."
            }
            Self::NeverPadMonolithBlock => {
                "Block without blank lines must not be padded by blank lines."
            }
            Self::NeverPadBottom => "Bottom of a block must not be padded by blank lines.",
            Self::MissingOpeningSpace => "There must be a space after this paren.",
            Self::MissingClosingSpace => "There must be a space before this paren.",
            Self::RejectedOpeningSpace => "There should be no space after this paren.",
            Self::RejectedClosingSpace => "There should be no space before this paren.",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Replace `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// Range to replace; empty for insertions.
    pub span: Span,
    /// Replacement text; empty for removals.
    pub replacement: String,
}

impl Fix {
    /// Insert `text` at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(Span::empty(offset), text)
    }

    /// Remove the bytes of `span`.
    #[must_use]
    pub fn remove(span: Span) -> Self {
        Self::replace(span, "")
    }

    /// Replace the bytes of `span` with `text`.
    #[must_use]
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            replacement: text.into(),
        }
    }
}

/// A single layout violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// ID of the rule that reported it.
    pub rule_id: &'static str,
    /// What is wrong.
    pub kind: MessageKind,
    /// Where it is wrong.
    pub span: Span,
    /// Line and column of `span.start`.
    pub start: Position,
    /// The edit that resolves it, if the rule proposes one.
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {}",
            self.start.line, self.start.column, self.rule_id, self.kind
        )
    }
}

/// Orders diagnostics by position. The sort is stable, so diagnostics at the
/// same span keep the order in which they were reported.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
}
