//! Application of diagnostic fixes to source text.
//!
//! The core component is `ByteRangeRewriter`, which applies
//! fixes using byte offsets and refuses overlapping ones.

mod rewriter;

pub use rewriter::{apply_fixes, ByteRangeRewriter, RewriteError};
