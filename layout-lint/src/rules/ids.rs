//! Centralized Rule IDs.

/// Layout: blank-line padding of blocks, switch bodies and class bodies
pub const RULE_ID_PADDED_BLOCKS: &str = "LAY001";
/// Layout: spacing just inside parentheses
pub const RULE_ID_PAREN_SPACING: &str = "LAY002";
