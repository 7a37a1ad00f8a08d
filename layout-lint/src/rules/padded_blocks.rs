//! Blank-line padding at the inner edges of blocks, switch bodies and class
//! bodies.
//!
//! The content of a body is delimited by its first and last "real" tokens:
//! comments trailing on the brace line are treated as part of the brace.
//! Padding is then the presence of at least one blank line between a brace
//! and that content. In loose mode a body is padded only when it is
//! "sliced", i.e. contains a blank line of its own (nested blocks, switches,
//! classes, static blocks and methods keep their blank lines to themselves).

use tracing::{debug, trace};

use crate::config::PaddedBlocksOptions;
use crate::diagnostic::{sort_diagnostics, Diagnostic, Fix, MessageKind};
use crate::error::{ConfigError, StructuralError};
use crate::geometry::{
    closing_delimiter, is_sliced, next_real_token, opening_delimiter, prev_real_token, same_line,
    OwnRangeCache,
};
use crate::policy::{BlockPolicy, PaddingPolicy};
use crate::rules::ids::RULE_ID_PADDED_BLOCKS;
use crate::rules::{Rule, RuleMetadata, CATEGORY_LAYOUT};
use crate::source::SourceUnit;
use crate::syntax::{BlockKind, NodeId};
use crate::token::{Span, Token};

/// Enforces or forbids blank lines just inside braces.
#[derive(Debug, Clone)]
pub struct PaddedBlocks {
    policy: BlockPolicy,
}

impl PaddedBlocks {
    /// Creates the rule from an already resolved policy.
    #[must_use]
    pub fn new(policy: BlockPolicy) -> Self {
        Self { policy }
    }

    /// Resolves `options` and creates the rule.
    pub fn from_options(options: &PaddedBlocksOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(BlockPolicy::resolve(options)?))
    }

    /// The policy this rule enforces.
    #[must_use]
    pub fn policy(&self) -> &BlockPolicy {
        &self.policy
    }

    fn check_node(
        &self,
        unit: &SourceUnit,
        cache: &mut OwnRangeCache,
        id: NodeId,
        kind: BlockKind,
        padding: PaddingPolicy,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), StructuralError> {
        let tokens = &unit.tokens;
        let truncated = || StructuralError::TruncatedStream { node: id };

        let open = opening_delimiter(unit, id, kind)?;
        let close = closing_delimiter(unit, id)?;
        let first_index = next_real_token(tokens, open).ok_or_else(truncated)?;
        let last_index = prev_real_token(tokens, close).ok_or_else(truncated)?;
        let after_last_index = last_index + 1;
        if after_last_index >= tokens.len() {
            return Err(truncated());
        }

        let first = &tokens[first_index];
        let before_first = &tokens[first_index - 1];
        let last = &tokens[last_index];
        let after_last = &tokens[after_last_index];

        if self.policy.allow_single_line_blocks && same_line(before_first, after_last) {
            trace!(node = id.index(), "single-line block skipped");
            return Ok(());
        }

        let has_top = first.start.line.saturating_sub(before_first.end.line) >= 2;
        let has_bottom = after_last.start.line.saturating_sub(last.end.line) >= 2;
        let sliced = is_sliced(unit, cache, id, first, last)?;
        let require = padding.requires_padding(sliced);
        trace!(
            node = id.index(),
            ?kind,
            has_top,
            has_bottom,
            sliced,
            require,
            "block padding"
        );

        let top = Span::new(before_first.span.start, first.span.start);
        let bottom = Span::new(last.span.end, after_last.span.start);
        let no_bottom_padding = self.policy.no_bottom_padding;
        let never_kind = if padding.only_pad_sliced {
            MessageKind::NeverPadMonolithBlock
        } else {
            MessageKind::NeverPadBlock
        };

        if require {
            let always_kind = if padding.only_pad_sliced {
                MessageKind::AlwaysPadSlicedBlock
            } else {
                MessageKind::AlwaysPadBlock
            };
            if !has_top {
                diagnostics.push(report(
                    unit,
                    always_kind,
                    top,
                    Fix::insert(before_first.span.end, "\n"),
                ));
            }
            if !has_bottom && !no_bottom_padding {
                diagnostics.push(report(
                    unit,
                    always_kind,
                    bottom,
                    Fix::insert(after_last.span.start, "\n"),
                ));
            }
        } else if has_top {
            diagnostics.push(report(
                unit,
                never_kind,
                top,
                Fix::replace(Span::new(before_first.span.end, line_start(first)), "\n"),
            ));
        }

        if (!require || no_bottom_padding) && has_bottom {
            let kind = if no_bottom_padding {
                MessageKind::NeverPadBottom
            } else {
                never_kind
            };
            diagnostics.push(report(
                unit,
                kind,
                bottom,
                Fix::replace(Span::new(last.span.end, line_start(after_last)), "\n"),
            ));
        }
        Ok(())
    }
}

impl Rule for PaddedBlocks {
    fn name(&self) -> &'static str {
        "PaddedBlocks"
    }

    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            id: RULE_ID_PADDED_BLOCKS,
            category: CATEGORY_LAYOUT,
        }
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Diagnostic>, StructuralError> {
        let mut cache = OwnRangeCache::new();
        let mut diagnostics = Vec::new();

        for (id, kind, node) in unit.tree.padded_nodes() {
            let Some(padding) = self.policy.category(kind.category()) else {
                continue;
            };
            if node.children.is_empty() {
                continue;
            }
            self.check_node(unit, &mut cache, id, kind, padding, &mut diagnostics)?;
        }

        sort_diagnostics(&mut diagnostics);
        debug!(
            rule = RULE_ID_PADDED_BLOCKS,
            diagnostics = diagnostics.len(),
            memoized = cache.len(),
            "pass complete"
        );
        Ok(diagnostics)
    }
}

/// Offset of the start of the line `token` starts on.
fn line_start(token: &Token) -> usize {
    token.span.start - token.start.column
}

fn report(unit: &SourceUnit, kind: MessageKind, span: Span, fix: Fix) -> Diagnostic {
    Diagnostic {
        rule_id: RULE_ID_PADDED_BLOCKS,
        kind,
        span,
        start: unit.text.position(span.start),
        fix: Some(fix),
    }
}
