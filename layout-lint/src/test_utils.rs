//! Reference token/tree provider for a small brace language.
//!
//! Production callers bring their own tokens and tree; this module exists so
//! the rules can be exercised end to end. It understands JS-like statements,
//! `switch` with `case`/`default`, `class` bodies with methods, fields and
//! `static {}` blocks, and both comment styles. Object literals are told
//! apart from blocks by the token in front of the `{`.
//!
//! ```
//! use layout_lint::test_utils::parse;
//!
//! let unit = parse("if (a) {\n  b();\n}").expect("valid source");
//! assert_eq!(unit.tree.padded_nodes().count(), 1);
//! ```

use compact_str::CompactString;
use logos::Logos;

use crate::source::{SourceText, SourceUnit};
use crate::syntax::{BlockKind, NodeId, NodeKind, SyntaxTree};
use crate::token::{Span, Token, TokenKind, TokenStream};

/// Errors of the reference provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Text that no token matches.
    #[error("invalid token at offset {offset}")]
    InvalidToken {
        /// Start of the unmatched text.
        offset: usize,
    },
    /// A brace (or a construct that needs one) is never closed.
    #[error("construct at offset {offset} is never closed")]
    Unclosed {
        /// Start of the construct.
        offset: usize,
    },
    /// A token that cannot appear here.
    #[error("unexpected {text:?} at offset {offset}")]
    UnexpectedToken {
        /// Start of the token.
        offset: usize,
        /// The token text.
        text: String,
    },
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Numeric,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,

    #[regex(r"=>|===|!==|==|!=|<=|>=|&&|\|\||\+\+|--|[-+*/%=!<>&|^~?:;,.(){}\[\]]")]
    Punctuator,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::LineComment => Self::LineComment,
            RawToken::BlockComment => Self::BlockComment,
            RawToken::Identifier => Self::Identifier,
            RawToken::Numeric => Self::Numeric,
            RawToken::String => Self::String,
            RawToken::Punctuator => Self::Punctuator,
        }
    }
}

/// Splits `source` into tokens, comments included.
pub fn tokenize(text: &SourceText) -> Result<TokenStream, ParseError> {
    let source = text.as_str();
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let Ok(raw) = result else {
            return Err(ParseError::InvalidToken {
                offset: range.start,
            });
        };
        tokens.push(Token {
            kind: raw.into(),
            text: CompactString::new(lexer.slice()),
            span: Span::new(range.start, range.end),
            start: text.position(range.start),
            end: text.position(range.end),
        });
    }

    Ok(TokenStream::new(tokens))
}

/// Tokenizes and parses `source` into a [`SourceUnit`].
pub fn parse(source: &str) -> Result<SourceUnit, ParseError> {
    let text = SourceText::new(source);
    let tokens = tokenize(&text)?;
    let tree = Parser::new(&tokens, source.len()).parse_program()?;
    Ok(SourceUnit::new(text, tokens, tree))
}

/// Recursive descent over the non-comment tokens.
struct Parser<'a> {
    tokens: &'a [Token],
    code: Vec<usize>,
    pos: usize,
    tree: SyntaxTree,
    source_len: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], source_len: usize) -> Self {
        let code = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_comment())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            code,
            pos: 0,
            tree: SyntaxTree::new(),
            source_len,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.nth(self.pos)
    }

    fn nth(&self, pos: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        self.code.get(pos).map(|&i| &tokens[i])
    }

    fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|pos| self.nth(pos))
    }

    fn prev_end(&self) -> usize {
        self.previous().map_or(0, |t| t.span.end)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier && t.text == text)
    }

    fn expect_punct(&mut self, text: &str, opened_at: usize) -> Result<&'a Token, ParseError> {
        match self.peek() {
            Some(t) if t.is_punct(text) => {
                self.bump();
                Ok(t)
            }
            Some(t) => Err(unexpected(t)),
            None => Err(ParseError::Unclosed { offset: opened_at }),
        }
    }

    fn parse_program(mut self) -> Result<SyntaxTree, ParseError> {
        let root = self.tree.open_node(NodeKind::Other, 0, None);
        while let Some(token) = self.peek() {
            if token.is_punct("}") {
                return Err(unexpected(token));
            }
            self.parse_statement(root)?;
        }
        self.tree.close_node(root, self.source_len);
        Ok(self.tree)
    }

    /// Statements up to (not including) the `}` closing `parent`.
    fn parse_statements(&mut self, parent: NodeId) -> Result<(), ParseError> {
        while let Some(token) = self.peek() {
            if token.is_punct("}") {
                break;
            }
            self.parse_statement(parent)?;
        }
        Ok(())
    }

    fn parse_statement(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let Some(token) = self.peek() else {
            return Ok(());
        };
        if token.is_punct("{") {
            self.parse_block(parent, BlockKind::Block, token.span.start)
        } else if token.is_punct(";") {
            let node = self.tree.open_node(NodeKind::Other, token.span.start, Some(parent));
            self.bump();
            self.tree.close_node(node, token.span.end);
            Ok(())
        } else if self.at_keyword("switch") {
            self.parse_switch(parent)
        } else {
            let node = self.tree.open_node(NodeKind::Other, token.span.start, Some(parent));
            self.parse_expression(node)?;
            self.tree.close_node(node, self.prev_end());
            Ok(())
        }
    }

    /// Parses `{ statements }` at the current `{`; the node span starts at `start`.
    fn parse_block(&mut self, parent: NodeId, kind: BlockKind, start: usize) -> Result<(), ParseError> {
        let node = self.tree.open_node(NodeKind::Padded(kind), start, Some(parent));
        let open = self.expect_punct("{", start)?;
        self.parse_statements(node)?;
        let close = self.expect_punct("}", open.span.start)?;
        self.tree.close_node(node, close.span.end);
        Ok(())
    }

    /// Consumes tokens up to a `;` (consumed) or `}` (left) at nesting depth
    /// zero, turning function bodies and class bodies into child nodes.
    fn parse_expression(&mut self, node: NodeId) -> Result<(), ParseError> {
        let mut depth = 0usize;
        let statement_start = self.pos;
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Identifier && token.text == "class" {
                let declaration = self.pos == statement_start;
                self.parse_class(node)?;
                if declaration && self.ends_after_block() {
                    break;
                }
                continue;
            }
            if token.kind != TokenKind::Punctuator {
                self.bump();
                continue;
            }
            match token.text.as_str() {
                ";" if depth == 0 => {
                    self.bump();
                    break;
                }
                "}" if depth == 0 => break,
                "{" if self.starts_block() => {
                    self.parse_block(node, BlockKind::Block, token.span.start)?;
                    if depth == 0 && self.ends_after_block() {
                        break;
                    }
                }
                "(" | "[" | "{" => {
                    depth += 1;
                    self.bump();
                }
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        Ok(())
    }

    /// Whether the `{` at the current position opens a block rather than an
    /// object literal.
    fn starts_block(&self) -> bool {
        match self.previous() {
            None => true,
            Some(prev) if prev.kind == TokenKind::Punctuator => {
                matches!(prev.text.as_str(), ")" | "=>" | ";" | "}")
            }
            Some(prev) if prev.kind == TokenKind::Identifier => matches!(
                prev.text.as_str(),
                "else" | "try" | "catch" | "finally" | "do"
            ),
            Some(_) => false,
        }
    }

    /// After a block at depth zero: whether the statement is over.
    /// A following `;` is consumed.
    fn ends_after_block(&mut self) -> bool {
        let Some(next) = self.peek() else {
            return true;
        };
        match next.kind {
            TokenKind::Punctuator if next.text == ";" => {
                self.bump();
                true
            }
            TokenKind::Punctuator => matches!(next.text.as_str(), "{" | "}"),
            TokenKind::Identifier => {
                !matches!(next.text.as_str(), "else" | "catch" | "finally" | "while")
            }
            _ => true,
        }
    }

    fn parse_switch(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let start = self.peek().map_or(self.source_len, |t| t.span.start);
        let node = self.tree.open_node(NodeKind::Padded(BlockKind::Switch), start, Some(parent));
        self.bump();

        let head = self.expect_punct("(", start)?;
        self.skip_until_balanced(head.span.start)?;
        let open = self.expect_punct("{", start)?;

        while let Some(token) = self.peek() {
            if token.is_punct("}") {
                break;
            }
            if !(self.at_keyword("case") || self.at_keyword("default")) {
                return Err(unexpected(token));
            }
            let case = self.tree.open_node(NodeKind::Other, token.span.start, Some(node));
            self.bump();
            self.skip_case_test(token.span.start)?;
            while let Some(next) = self.peek() {
                if next.is_punct("}") || self.at_keyword("case") || self.at_keyword("default") {
                    break;
                }
                self.parse_statement(case)?;
            }
            self.tree.close_node(case, self.prev_end());
        }

        let close = self.expect_punct("}", open.span.start)?;
        self.tree.close_node(node, close.span.end);
        Ok(())
    }

    /// Skips to just past the `)` matching an already consumed `(`.
    fn skip_until_balanced(&mut self, opened_at: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while let Some(token) = self.peek() {
            self.bump();
            if token.is_opening_paren() {
                depth += 1;
            } else if token.is_closing_paren() {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(ParseError::Unclosed { offset: opened_at })
    }

    /// Skips a case test up to and including its `:`.
    fn skip_case_test(&mut self, case_at: usize) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            self.bump();
            match token.text.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                ":" if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::Unclosed { offset: case_at })
    }

    /// Parses `class Name extends Base { members }` at the `class` keyword.
    fn parse_class(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let class_at = self.peek().map_or(self.source_len, |t| t.span.start);
        self.bump();

        let mut depth = 0usize;
        let open = loop {
            let Some(token) = self.peek() else {
                return Err(ParseError::Unclosed { offset: class_at });
            };
            if token.is_punct("{") && depth == 0 {
                break token;
            }
            match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        };

        let body = self.tree.open_node(
            NodeKind::Padded(BlockKind::Class),
            open.span.start,
            Some(parent),
        );
        self.bump();

        loop {
            let Some(token) = self.peek() else {
                return Err(ParseError::Unclosed {
                    offset: open.span.start,
                });
            };
            if token.is_punct("}") {
                break;
            }
            if token.is_punct(";") {
                self.bump();
            } else if self.at_keyword("static") && self.nth(self.pos + 1).is_some_and(|t| t.is_punct("{")) {
                self.bump();
                self.parse_block(body, BlockKind::StaticBlock, token.span.start)?;
            } else {
                self.parse_member(body)?;
            }
        }

        let close = self.expect_punct("}", open.span.start)?;
        self.tree.close_node(body, close.span.end);
        Ok(())
    }

    /// A method (`name(args) { body }`) or a field (`name = value;`).
    fn parse_member(&mut self, body: NodeId) -> Result<(), ParseError> {
        let Some(first) = self.peek() else {
            return Ok(());
        };
        let start = first.span.start;

        let mut depth = 0usize;
        let mut lookahead = self.pos;
        let is_method = loop {
            let Some(token) = self.nth(lookahead) else {
                return Err(ParseError::Unclosed { offset: start });
            };
            if token.kind == TokenKind::Punctuator {
                match token.text.as_str() {
                    "(" | "[" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    "{" if depth == 0 => break true,
                    "=" | ";" | "}" if depth == 0 => break false,
                    _ => {}
                }
            }
            lookahead += 1;
        };

        if is_method {
            let node = self.tree.open_node(NodeKind::Method, start, Some(body));
            self.pos = lookahead;
            let open = self.peek().map_or(start, |t| t.span.start);
            self.parse_block(node, BlockKind::Block, open)?;
            self.tree.close_node(node, self.prev_end());
        } else {
            let node = self.tree.open_node(NodeKind::Other, start, Some(body));
            self.parse_expression(node)?;
            self.tree.close_node(node, self.prev_end());
        }
        Ok(())
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        offset: token.span.start,
        text: token.text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<NodeKind> {
        parse(src).unwrap().tree.iter().map(|(_, n)| n.kind).collect()
    }

    #[test]
    fn test_tokenize_kinds_and_positions() {
        let text = SourceText::new("a /* x\ny */ 'b' // c\n12;");
        let tokens = tokenize(&text).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::BlockComment,
                TokenKind::String,
                TokenKind::LineComment,
                TokenKind::Numeric,
                TokenKind::Punctuator,
            ]
        );
        assert_eq!(tokens[1].start.line, 1);
        assert_eq!(tokens[1].end.line, 2);
        assert_eq!(tokens[3].text, "// c");
        assert_eq!(tokens[4].start.line, 3);
        assert_eq!(tokens[4].start.column, 0);
    }

    #[test]
    fn test_tokenize_multi_char_punctuators() {
        let text = SourceText::new("a => b === c");
        let tokens = tokenize(&text).unwrap();
        assert_eq!(tokens[1].text, "=>");
        assert_eq!(tokens[3].text, "===");
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            parse("a # b").map(|_| ()),
            Err(ParseError::InvalidToken { offset: 2 })
        );
    }

    #[test]
    fn test_blocks_and_object_literals() {
        use NodeKind::{Other, Padded};
        assert_eq!(
            kinds("if (a) { x = { b: 1 }; }"),
            vec![Other, Other, Padded(BlockKind::Block), Other]
        );
    }

    #[test]
    fn test_switch_cases() {
        let unit = parse("switch (a) {\ncase 1:\n  b();\ndefault:\n}").unwrap();
        let (id, kind, node) = unit.tree.padded_nodes().next().unwrap();
        assert_eq!(kind, BlockKind::Switch);
        assert_eq!(node.span.start, 0);
        assert_eq!(node.children.len(), 2);
        let case = unit.tree.node(node.children[0]);
        assert_eq!(case.children.len(), 1);
        assert_eq!(id.index(), 1);
    }

    #[test]
    fn test_class_members() {
        let unit = parse("class A {\n  x = 1;\n  static { init(); }\n  m() {}\n}").unwrap();
        let body = unit
            .tree
            .padded_nodes()
            .find(|(_, kind, _)| *kind == BlockKind::Class)
            .map(|(_, _, node)| node)
            .unwrap();
        let members: Vec<_> = body
            .children
            .iter()
            .map(|&id| unit.tree.node(id).kind)
            .collect();
        assert_eq!(
            members,
            vec![
                NodeKind::Other,
                NodeKind::Padded(BlockKind::StaticBlock),
                NodeKind::Method
            ]
        );
        let static_block = unit.tree.node(body.children[1]);
        assert_eq!(
            &unit.text.as_str()[static_block.span.start..static_block.span.end],
            "static { init(); }"
        );
    }

    #[test]
    fn test_else_chains_stay_in_one_statement() {
        let unit = parse("if (a) {\n} else {\n}\nb();").unwrap();
        let (_, root) = unit.tree.iter().next().unwrap();
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_unclosed_and_stray_braces() {
        assert_eq!(
            parse("{\na();").map(|_| ()),
            Err(ParseError::Unclosed { offset: 0 })
        );
        assert_eq!(
            parse("a();\n}").map(|_| ()),
            Err(ParseError::UnexpectedToken {
                offset: 5,
                text: "}".to_owned()
            })
        );
    }

    #[test]
    fn test_unbalanced_parens_are_left_to_rules() {
        assert!(parse("foo(").is_ok());
        assert!(parse("a)").is_ok());
    }
}
