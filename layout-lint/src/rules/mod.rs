use crate::diagnostic::Diagnostic;
use crate::error::StructuralError;
use crate::source::SourceUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Metadata associated with a rule.
pub struct RuleMetadata {
    /// Unique code/ID of the rule.
    pub id: &'static str,
    /// Category of the rule.
    pub category: &'static str,
}

/// Trait defining a layout rule.
///
/// A rule holds its resolved policy and nothing else, so one instance can
/// check any number of source units, from any thread.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str {
        self.metadata().id
    }
    /// Returns the category/functional group of the rule.
    fn category(&self) -> &'static str {
        self.metadata().category
    }
    /// Returns the full metadata for the rule.
    fn metadata(&self) -> RuleMetadata;
    /// Runs one pass over `unit`.
    ///
    /// Diagnostics come back sorted by position. A provider contract
    /// violation aborts the pass with no partial result.
    fn check(&self, unit: &SourceUnit) -> Result<Vec<Diagnostic>, StructuralError>;
}

/// Category shared by every rule of this crate.
pub const CATEGORY_LAYOUT: &str = "layout";

/// Module containing rule ID constants.
pub mod ids;
/// Blank-line padding inside braces.
pub mod padded_blocks;
/// Whitespace just inside parentheses.
pub mod paren_spacing;

pub use padded_blocks::PaddedBlocks;
pub use paren_spacing::ParenSpacing;
