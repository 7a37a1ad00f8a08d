//! Byte-range safe code rewriter.
//!
//! # Usage
//!
//! ```
//! use layout_lint::diagnostic::Fix;
//! use layout_lint::fix::ByteRangeRewriter;
//! use layout_lint::token::Span;
//!
//! let mut rewriter = ByteRangeRewriter::new("foo( bar)");
//! rewriter.add_fix(Fix::remove(Span::new(4, 5)));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, "foo(bar)");
//! ```

use tracing::debug;

use crate::diagnostic::{Diagnostic, Fix};

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// Two fixes touch the same bytes, or insert at the same offset
    #[error("Overlapping fixes at indices {fix_a} and {fix_b}")]
    OverlappingFixes {
        /// Index of first overlapping fix
        fix_a: usize,
        /// Index of second overlapping fix
        fix_b: usize,
    },
    /// Fix range is out of bounds or not on a char boundary
    #[error("Fix {fix_index} out of bounds: end {end} > source length {source_len}")]
    OutOfBounds {
        /// Index of the bad fix
        fix_index: usize,
        /// End offset of the fix
        end: usize,
        /// Length of the source
        source_len: usize,
    },
}

/// Whether applying `a` and `b` in either order could give different text.
fn collides(a: &Fix, b: &Fix) -> bool {
    let (a, b) = (a.span, b.span);
    (a.start < b.end && b.start < a.end) || a.start == b.start
}

/// Safe code rewriter using byte ranges
///
/// This rewriter applies fixes in reverse order to preserve byte positions,
/// and validates that fixes don't overlap. Two insertions at one offset
/// count as overlapping since their order would be ambiguous.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    source: String,
    fixes: Vec<Fix>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fixes: Vec::new(),
        }
    }

    /// Add a fix to the pending list
    pub fn add_fix(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }

    /// Add multiple fixes
    pub fn add_fixes(&mut self, fixes: impl IntoIterator<Item = Fix>) {
        self.fixes.extend(fixes);
    }

    /// Get the number of pending fixes
    #[must_use]
    pub fn fix_count(&self) -> usize {
        self.fixes.len()
    }

    /// Validate fixes without applying them
    ///
    /// # Errors
    /// Returns error if fixes overlap or are out of bounds
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, fix) in self.fixes.iter().enumerate() {
            let span = fix.span;
            if span.end > self.source.len()
                || span.start > span.end
                || !self.source.is_char_boundary(span.start)
                || !self.source.is_char_boundary(span.end)
            {
                return Err(RewriteError::OutOfBounds {
                    fix_index: i,
                    end: span.end,
                    source_len: self.source.len(),
                });
            }
        }

        for i in 0..self.fixes.len() {
            for j in (i + 1)..self.fixes.len() {
                if collides(&self.fixes[i], &self.fixes[j]) {
                    return Err(RewriteError::OverlappingFixes { fix_a: i, fix_b: j });
                }
            }
        }

        Ok(())
    }

    /// Apply all fixes and return the modified source
    ///
    /// # Errors
    /// Returns error if fixes overlap or are out of bounds
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted = self.fixes;
        sorted.sort_by(|a, b| b.span.start.cmp(&a.span.start));

        for fix in &sorted {
            result.replace_range(fix.span.start..fix.span.end, &fix.replacement);
        }
        debug!(applied = sorted.len(), "fixes applied");

        Ok(result)
    }
}

/// Applies the fix of every diagnostic that carries one.
///
/// # Errors
/// Returns error if two fixes overlap or a fix lies outside `source`
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> Result<String, RewriteError> {
    let mut rewriter = ByteRangeRewriter::new(source);
    rewriter.add_fixes(diagnostics.iter().filter_map(|d| d.fix.clone()));
    rewriter.apply()
}
