//! Token geometry shared by the layout rules.
//!
//! Everything here is a pure function of one [`SourceUnit`] except the
//! [`OwnRangeCache`], which lives for a single pass.

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use std::collections::hash_map::Entry;
use std::ops::Range;

use crate::error::StructuralError;
use crate::source::{SourceText, SourceUnit};
use crate::syntax::{BlockKind, NodeId, NodeKind};
use crate::token::{Span, Token, TokenKind};

/// Whether `b` starts on the line where `a` ends.
#[must_use]
pub fn same_line(a: &Token, b: &Token) -> bool {
    b.start.line == a.end.line
}

/// Whether any whitespace separates the end of `a` from the start of `b`.
#[must_use]
pub fn has_gap(text: &SourceText, a: &Token, b: &Token) -> bool {
    text.slice(Span::new(a.span.end, b.span.start))
        .chars()
        .any(char::is_whitespace)
}

/// First token after `index` that is not a comment trailing on the line of
/// the token visited before it.
#[must_use]
pub fn next_real_token(tokens: &[Token], index: usize) -> Option<usize> {
    let mut prev = index;
    loop {
        let current = prev + 1;
        let token = tokens.get(current)?;
        if !(token.is_comment() && token.start.line == tokens[prev].end.line) {
            return Some(current);
        }
        prev = current;
    }
}

/// Mirror of [`next_real_token`]: last token before `index` that is not a
/// comment sitting on the line of the token visited after it.
#[must_use]
pub fn prev_real_token(tokens: &[Token], index: usize) -> Option<usize> {
    let mut next = index;
    loop {
        let current = next.checked_sub(1)?;
        let token = &tokens[current];
        if !(token.is_comment() && token.end.line == tokens[next].start.line) {
            return Some(current);
        }
        next = current;
    }
}

/// Index of the `{` that opens the body of a padded node.
pub fn opening_delimiter(
    unit: &SourceUnit,
    id: NodeId,
    kind: BlockKind,
) -> Result<usize, StructuralError> {
    let tokens = &unit.tokens;
    let node = unit.tree.node(id);
    let missing = || StructuralError::MissingDelimiter {
        node: id,
        expected: "{",
        offset: node.span.start,
    };
    let first = tokens.first_at_or_after(node.span.start).ok_or_else(missing)?;

    let index = match kind {
        BlockKind::Block | BlockKind::Class => Some(first),
        // skip the `static` keyword
        BlockKind::StaticBlock => next_code_token(tokens, first),
        BlockKind::Switch => match node.children.first() {
            Some(&case) => tokens
                .first_at_or_after(unit.tree.node(case).span.start)
                .and_then(|case_start| tokens[..case_start].iter().rposition(|t| !t.is_comment())),
            None => {
                let close = closing_delimiter(unit, id)?;
                tokens[..close].iter().rposition(|t| t.is_punct("{"))
            }
        },
    };

    match index {
        Some(i) if tokens[i].is_punct("{") && node.span.contains(tokens[i].span.start) => Ok(i),
        _ => Err(missing()),
    }
}

/// Index of the `}` that ends a padded node.
pub fn closing_delimiter(unit: &SourceUnit, id: NodeId) -> Result<usize, StructuralError> {
    let tokens = &unit.tokens;
    let node = unit.tree.node(id);
    tokens
        .last_ending_at_or_before(node.span.end)
        .filter(|&i| tokens[i].is_punct("}") && tokens[i].span.start >= node.span.start)
        .ok_or(StructuralError::MissingDelimiter {
            node: id,
            expected: "}",
            offset: node.span.end,
        })
}

fn next_code_token(tokens: &[Token], index: usize) -> Option<usize> {
    let rest = tokens.get(index + 1..)?;
    rest.iter().position(|t| !t.is_comment()).map(|p| index + 1 + p)
}

/// Per-pass memo of [`own_ranges`], keyed by node id.
#[derive(Debug, Default)]
pub struct OwnRangeCache {
    ranges: FxHashMap<NodeId, Vec<Range<usize>>>,
}

impl OwnRangeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Own ranges of `id`, computed on first access.
    pub fn get(&mut self, unit: &SourceUnit, id: NodeId) -> Result<&[Range<usize>], StructuralError> {
        match self.ranges.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(own_ranges(unit, id)?)),
        }
    }

    /// Number of memoized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// The parts of a node's span not claimed by a direct child that owns its
/// own scope, as ordered disjoint half-open intervals.
///
/// A padded child is cut from its opening brace, so a `switch (x)` head or a
/// `static` keyword stays with the parent; a method is cut from its first
/// token. Every cut ends where the child ends.
pub fn own_ranges(unit: &SourceUnit, id: NodeId) -> Result<Vec<Range<usize>>, StructuralError> {
    let node = unit.tree.node(id);
    let mut ranges = Vec::new();
    let mut start = node.span.start;

    for &child_id in &node.children {
        let child = unit.tree.node(child_id);
        let cut = match child.kind {
            NodeKind::Padded(kind) => unit.tokens[opening_delimiter(unit, child_id, kind)?].span.start,
            NodeKind::Method => child.span.start,
            NodeKind::Other => continue,
        };
        ranges.push(start..cut);
        start = child.span.end;
    }
    ranges.push(start..node.span.end);
    Ok(ranges)
}

/// Whether the 1-based `line` is blank and starts inside `ranges`.
#[must_use]
pub fn is_own_blank_line(text: &SourceText, ranges: &[Range<usize>], line: usize) -> bool {
    let Some(start) = text.line_start(line) else {
        return false;
    };
    ranges.iter().any(|range| range.contains(&start))
        && text.line_text(line).is_some_and(|t| t.trim().is_empty())
}

/// Whether the node's own scope has a blank line between `first` and `last`.
pub fn is_sliced(
    unit: &SourceUnit,
    cache: &mut OwnRangeCache,
    id: NodeId,
    first: &Token,
    last: &Token,
) -> Result<bool, StructuralError> {
    let ranges = cache.get(unit, id)?;
    let from = first.start.line;
    let to = last.end.line.max(from);
    Ok((from..=to).any(|line| is_own_blank_line(&unit.text, ranges, line)))
}

/// Direction of a same-line token walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    /// Towards the start of the line.
    Backward,
    /// Towards the end of the line.
    Forward,
    /// Backward, then forward.
    Both,
}

/// Result of [`bracket_stack_walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketWalk {
    /// Indices of every visited token, the start token first.
    pub scanned: SmallVec<[usize; 8]>,
    /// Unmatched brackets left on the stack.
    pub depth: usize,
}

/// Walks the tokens on the start token's line, keeping a stack of unmatched
/// brackets seeded with the start token.
///
/// With `track_nesting` the walk in a direction stops once the stack empties.
#[must_use]
pub fn bracket_stack_walk(
    tokens: &[Token],
    index: usize,
    direction: WalkDirection,
    track_nesting: bool,
) -> BracketWalk {
    let origin = &tokens[index];
    let mut scanned: SmallVec<[usize; 8]> = smallvec![index];
    let mut stack: SmallVec<[&str; 8]> = smallvec![origin.text.as_str()];

    let mut visit = |i: usize, scanned: &mut SmallVec<[usize; 8]>| -> bool {
        let token = &tokens[i];
        if token.end.line != origin.start.line {
            return false;
        }
        scanned.push(i);
        !(track_nesting && push_or_pop(&mut stack, token))
    };

    if direction != WalkDirection::Forward {
        for i in (0..index).rev() {
            if !visit(i, &mut scanned) {
                break;
            }
        }
    }
    if direction != WalkDirection::Backward {
        for i in index + 1..tokens.len() {
            if !visit(i, &mut scanned) {
                break;
            }
        }
    }

    BracketWalk {
        scanned,
        depth: stack.len(),
    }
}

/// Pops the stack when `token` matches its top, pushes it otherwise.
/// Returns whether the stack is now empty. Non-bracket tokens are ignored.
fn push_or_pop<'a>(stack: &mut SmallVec<[&'a str; 8]>, token: &'a Token) -> bool {
    let counterpart = match token.text.as_str() {
        "(" => ")",
        ")" => "(",
        "{" => "}",
        "}" => "{",
        "[" => "]",
        "]" => "[",
        _ => return stack.is_empty(),
    };
    if stack.last() == Some(&counterpart) {
        stack.pop();
    } else {
        stack.push(token.text.as_str());
    }
    stack.is_empty()
}

/// Which bracket-context exception to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketScope {
    /// The whole line is brackets.
    Line,
    /// Everything on one side of the token is brackets.
    Sides(WalkDirection),
    /// The token's group does not close on this line and is all brackets so far.
    Unclosed,
    /// The token's group, up to where it balances on this line, is all brackets.
    Within,
}

/// Whether the token at `index` sits in a same-line run of punctuators
/// described by `scope`.
#[must_use]
pub fn in_bracket_context(tokens: &[Token], index: usize, scope: BracketScope) -> bool {
    let walk = match scope {
        BracketScope::Line => bracket_stack_walk(tokens, index, WalkDirection::Both, false),
        BracketScope::Sides(direction) => bracket_stack_walk(tokens, index, direction, false),
        BracketScope::Unclosed | BracketScope::Within => {
            let Some(direction) = bracket_direction(&tokens[index]) else {
                return false;
            };
            let walk = bracket_stack_walk(tokens, index, direction, true);
            if scope == BracketScope::Unclosed && walk.depth == 0 {
                return false;
            }
            walk
        }
    };
    walk.scanned
        .iter()
        .all(|&i| tokens[i].kind == TokenKind::Punctuator)
}

fn bracket_direction(token: &Token) -> Option<WalkDirection> {
    match token.text.as_str() {
        "(" | "{" | "[" => Some(WalkDirection::Forward),
        ")" | "}" | "]" => Some(WalkDirection::Backward),
        _ => None,
    }
}
