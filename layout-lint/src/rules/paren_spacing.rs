//! Whitespace just inside parentheses.
//!
//! Every `(` is checked against the token after it and every `)` against
//! the token before it. The mode says whether a space is wanted; an
//! exception match inverts that answer for the paren at hand.

use tracing::{debug, trace};

use crate::config::ParenSpacingOptions;
use crate::diagnostic::{sort_diagnostics, Diagnostic, Fix, MessageKind};
use crate::error::{ConfigError, StructuralError};
use crate::geometry::{has_gap, in_bracket_context, same_line, BracketScope, WalkDirection};
use crate::policy::{ExceptionTag, Mode, ParenPolicy};
use crate::rules::ids::RULE_ID_PAREN_SPACING;
use crate::rules::{Rule, RuleMetadata, CATEGORY_LAYOUT};
use crate::source::SourceUnit;
use crate::token::{Span, Token, TokenKind};

/// Enforces or forbids spaces after `(` and before `)`.
#[derive(Debug, Clone)]
pub struct ParenSpacing {
    policy: ParenPolicy,
    openers: Vec<&'static str>,
    closers: Vec<&'static str>,
}

impl ParenSpacing {
    /// Creates the rule from an already resolved policy.
    #[must_use]
    pub fn new(policy: ParenPolicy) -> Self {
        let openers = policy.opener_exceptions();
        let closers = policy.closer_exceptions();
        Self {
            policy,
            openers,
            closers,
        }
    }

    /// Resolves `options` and creates the rule.
    pub fn from_options(options: &ParenSpacingOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(ParenPolicy::resolve(options)?))
    }

    /// The policy this rule enforces.
    #[must_use]
    pub fn policy(&self) -> &ParenPolicy {
        &self.policy
    }

    fn requires_space(&self, unit: &SourceUnit, index: usize) -> bool {
        match self.policy.mode {
            Mode::Always => true,
            Mode::Never => false,
            Mode::Loose => needs_space_loose(unit, index),
        }
    }

    /// Whether the paren at `index`, whose inner neighbour is `adjacent`,
    /// falls under a configured exception. `side` is the direction of the
    /// paren's inside.
    fn is_exception(
        &self,
        tokens: &[Token],
        index: usize,
        adjacent: &Token,
        side: WalkDirection,
    ) -> bool {
        let texts = if side == WalkDirection::Forward {
            &self.openers
        } else {
            &self.closers
        };
        let has = |tag| self.policy.has(tag);

        texts.iter().any(|&text| text == adjacent.text.as_str())
            || (has(ExceptionTag::BracketLines)
                && in_bracket_context(tokens, index, BracketScope::Line))
            || (has(ExceptionTag::BracketSides)
                && in_bracket_context(tokens, index, BracketScope::Sides(side)))
            || (has(ExceptionTag::BracketUnclosed)
                && in_bracket_context(tokens, index, BracketScope::Unclosed))
            || (has(ExceptionTag::BracketWithin)
                && in_bracket_context(tokens, index, BracketScope::Within))
    }

    fn opener_missing_space(&self, unit: &SourceUnit, index: usize) -> bool {
        let tokens = &unit.tokens;
        let (paren, next) = (&tokens[index], &tokens[index + 1]);
        if has_gap(&unit.text, paren, next) {
            return false;
        }
        if !self.policy.has(ExceptionTag::Empty) && next.is_closing_paren() {
            return false;
        }
        let exception = self.is_exception(tokens, index, next, WalkDirection::Forward);
        self.requires_space(unit, index) != exception
    }

    fn opener_rejects_space(&self, unit: &SourceUnit, index: usize) -> bool {
        let tokens = &unit.tokens;
        let (paren, next) = (&tokens[index], &tokens[index + 1]);
        if !same_line(paren, next) || next.kind == TokenKind::LineComment {
            return false;
        }
        if !has_gap(&unit.text, paren, next) {
            return false;
        }
        let exception = self.is_exception(tokens, index, next, WalkDirection::Forward);
        self.requires_space(unit, index) == exception
    }

    fn closer_missing_space(&self, unit: &SourceUnit, index: usize) -> bool {
        let tokens = &unit.tokens;
        let (prev, paren) = (&tokens[index - 1], &tokens[index]);
        if has_gap(&unit.text, prev, paren) {
            return false;
        }
        if !self.policy.has(ExceptionTag::Empty) && prev.is_opening_paren() {
            return false;
        }
        let exception = self.is_exception(tokens, index, prev, WalkDirection::Backward);
        self.requires_space(unit, index) != exception
    }

    fn closer_rejects_space(&self, unit: &SourceUnit, index: usize) -> bool {
        let tokens = &unit.tokens;
        let (prev, paren) = (&tokens[index - 1], &tokens[index]);
        if !same_line(prev, paren) || !has_gap(&unit.text, prev, paren) {
            return false;
        }
        let exception = self.is_exception(tokens, index, prev, WalkDirection::Backward);
        self.requires_space(unit, index) == exception
    }
}

impl Rule for ParenSpacing {
    fn name(&self) -> &'static str {
        "ParenSpacing"
    }

    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            id: RULE_ID_PAREN_SPACING,
            category: CATEGORY_LAYOUT,
        }
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Diagnostic>, StructuralError> {
        validate_parens(&unit.tokens)?;

        let tokens = &unit.tokens;
        let mut diagnostics = Vec::new();
        // `(` index whose inner gap already carries a fix
        let mut fixed_opener: Option<usize> = None;

        for (index, paren) in tokens.iter().enumerate() {
            if paren.is_opening_paren() {
                let next = &tokens[index + 1];
                if self.opener_missing_space(unit, index) {
                    diagnostics.push(report(
                        unit,
                        MessageKind::MissingOpeningSpace,
                        paren.span,
                        Some(Fix::insert(paren.span.end, " ")),
                    ));
                    fixed_opener = Some(index);
                }
                if self.opener_rejects_space(unit, index) {
                    let gap = Span::new(paren.span.end, next.span.start);
                    diagnostics.push(report(
                        unit,
                        MessageKind::RejectedOpeningSpace,
                        gap,
                        Some(Fix::remove(gap)),
                    ));
                    fixed_opener = Some(index);
                }
            } else if paren.is_closing_paren() {
                let prev = &tokens[index - 1];
                let shared_gap = fixed_opener == Some(index - 1);
                if self.closer_missing_space(unit, index) {
                    let fix = (!shared_gap).then(|| Fix::insert(paren.span.start, " "));
                    diagnostics.push(report(
                        unit,
                        MessageKind::MissingClosingSpace,
                        paren.span,
                        fix,
                    ));
                }
                if self.closer_rejects_space(unit, index) {
                    let gap = Span::new(prev.span.end, paren.span.start);
                    let fix = (!shared_gap).then(|| Fix::remove(gap));
                    diagnostics.push(report(unit, MessageKind::RejectedClosingSpace, gap, fix));
                }
                if shared_gap {
                    trace!(offset = paren.span.start, "fix left to the opening paren");
                }
            }
        }

        sort_diagnostics(&mut diagnostics);
        debug!(
            rule = RULE_ID_PAREN_SPACING,
            mode = ?self.policy.mode,
            diagnostics = diagnostics.len(),
            "pass complete"
        );
        Ok(diagnostics)
    }
}

/// Every `(` must have a following token and every `)` a preceding `(`.
fn validate_parens(tokens: &[Token]) -> Result<(), StructuralError> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if token.is_opening_paren() {
            if index + 1 == tokens.len() {
                return Err(StructuralError::DanglingOpeningParen {
                    offset: token.span.start,
                });
            }
            depth += 1;
        } else if token.is_closing_paren() {
            if index == 0 || depth == 0 {
                return Err(StructuralError::UnmatchedClosingParen {
                    offset: token.span.start,
                });
            }
            depth -= 1;
        }
    }
    Ok(())
}

/// Loose-mode heuristic: a paren wants inner space when its group is not a
/// single tight item.
///
/// From `(` the walk goes forward, from `)` backward. A block comment right
/// ahead or a nested paren of the same orientation asks for space; reaching
/// the group's other end, or the token just before it, asks for none; any
/// whitespace between the visited token and the next one in walk order asks
/// for space.
fn needs_space_loose(unit: &SourceUnit, index: usize) -> bool {
    let tokens = &unit.tokens;
    let text = &unit.text;
    let mut i = index;

    if tokens[index].is_opening_paren() {
        loop {
            if i + 1 >= tokens.len() {
                return false;
            }
            if tokens[i + 1].kind == TokenKind::BlockComment {
                return true;
            }
            i += 1;
            let token = &tokens[i];
            if token.is_opening_paren() {
                return true;
            }
            let after = tokens.get(i + 1).unwrap_or(token);
            if token.is_closing_paren() || after.is_closing_paren() {
                return false;
            }
            if has_gap(text, token, after) {
                return true;
            }
        }
    } else if tokens[index].is_closing_paren() {
        loop {
            // two tokens of look-behind are needed
            if i < 2 {
                return false;
            }
            if tokens[i - 1].kind == TokenKind::BlockComment {
                return true;
            }
            i -= 1;
            let token = &tokens[i];
            if token.is_closing_paren() {
                return true;
            }
            let before = &tokens[i - 1];
            if token.is_opening_paren() || before.is_opening_paren() {
                return false;
            }
            if has_gap(text, before, token) {
                return true;
            }
        }
    }
    false
}

fn report(unit: &SourceUnit, kind: MessageKind, span: Span, fix: Option<Fix>) -> Diagnostic {
    Diagnostic {
        rule_id: RULE_ID_PAREN_SPACING,
        kind,
        span,
        start: unit.text.position(span.start),
        fix,
    }
}
