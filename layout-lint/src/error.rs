//! Error types.
//!
//! Style violations are never errors; they are reported as diagnostics.
//! Everything here aborts the current pass.

use crate::syntax::NodeId;

/// Invalid rule configuration, detected while resolving policies.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Mode outside `always`, `never`, `loose`.
    #[error("unknown mode {value:?}, expected one of \"always\", \"never\", \"loose\"")]
    UnknownMode {
        /// The rejected value.
        value: String,
    },
    /// Key in the per-category table other than `blocks`, `switches`, `classes`.
    #[error("unknown padding category {key:?}, expected \"blocks\", \"switches\" or \"classes\"")]
    UnknownCategory {
        /// The rejected key.
        key: String,
    },
    /// The per-category table has no entries.
    #[error("padding category table must configure at least one category")]
    EmptyCategoryTable,
    /// Exception tag outside the supported set.
    #[error("unknown paren spacing exception {value:?}")]
    UnknownException {
        /// The rejected value.
        value: String,
    },
    /// Exception tag listed twice.
    #[error("paren spacing exception {value:?} is listed more than once")]
    DuplicateException {
        /// The repeated value.
        value: String,
    },
    /// The configuration text could not be deserialized.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// The tokens and tree handed over by the provider contradict each other.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StructuralError {
    /// A non-empty padded node has no `{` / `}` where one is required.
    #[error("node {node:?} has no {expected:?} delimiter near offset {offset}")]
    MissingDelimiter {
        /// The offending node.
        node: NodeId,
        /// The delimiter text that was looked for.
        expected: &'static str,
        /// Where the delimiter was expected.
        offset: usize,
    },
    /// A token walk ran off either end of the stream.
    #[error("token stream ends before the content of node {node:?}")]
    TruncatedStream {
        /// The node being inspected.
        node: NodeId,
    },
    /// `)` with no unmatched `(` before it.
    #[error("closing paren at offset {offset} has no matching opening paren")]
    UnmatchedClosingParen {
        /// Offset of the paren.
        offset: usize,
    },
    /// `(` with nothing after it.
    #[error("opening paren at offset {offset} is the last token")]
    DanglingOpeningParen {
        /// Offset of the paren.
        offset: usize,
    },
}

/// Any failure of a lint pass.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LintError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Provider contract violation.
    #[error(transparent)]
    Structural(#[from] StructuralError),
}
