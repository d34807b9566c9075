//! Pratt parser turning a token stream into a template tree.
//!
//! The parser is error tolerant: every problem is recorded as a
//! [`SyntaxError`] and replaced by a [`Node::Invalid`] placeholder, so a
//! tree is always produced. Recovery never runs past the `}` that closes the
//! current expression.

use std::mem;

use crate::parser::ast::{BinaryOp, Builtin, LiteralKind, Node, SelectOption, UnaryOp};
use crate::parser::error::{ParseError, SyntaxError};
use crate::parser::scanner::Scanner;
use crate::parser::token::{Token, TokenKind};

/// Deepest expression nesting accepted before parsing gives up on a fragment.
pub const MAX_NESTING: usize = 128;

/// Binding power of infix operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Power {
    None,
    Or,
    And,
    Comparison,
    Term,
    Factor,
    Range,
    Select,
    Unary,
    Call,
}

fn infix_power(kind: TokenKind) -> Power {
    match kind {
        TokenKind::Or => Power::Or,
        TokenKind::And => Power::And,
        TokenKind::EqualEqual
        | TokenKind::BangEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => Power::Comparison,
        TokenKind::Plus | TokenKind::Minus => Power::Term,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Power::Factor,
        TokenKind::Colon => Power::Range,
        TokenKind::EqualGreater => Power::Select,
        TokenKind::LParen | TokenKind::LBrack => Power::Call,
        _ => Power::None,
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    })
}

/// Parses a template, failing if any syntax error was recorded.
///
/// The returned [`ParseError`] still carries the recovered tree, so callers
/// that want lenient behavior can fall back to [`ParseError::into_root`].
pub fn parse_template(source: &str) -> Result<Node, ParseError> {
    let (root, errors) = TemplateParser::new(source).parse();
    if errors.is_empty() {
        Ok(root)
    } else {
        Err(ParseError { root, errors })
    }
}

/// Parses a template and returns the tree together with every syntax error.
pub fn parse_template_lenient(source: &str) -> (Node, Vec<SyntaxError>) {
    TemplateParser::new(source).parse()
}

struct TemplateParser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    errors: Vec<SyntaxError>,
    depth: usize,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self {
            scanner,
            current,
            errors: Vec::new(),
            // The root is the first level.
            depth: 1,
        }
    }

    fn parse(mut self) -> (Node, Vec<SyntaxError>) {
        let mut fragments = Vec::new();
        while !self.at(TokenKind::Eof) {
            fragments.push(self.parse_fragment());
        }
        (Node::Root(fragments), self.errors)
    }

    fn advance(&mut self) -> Token {
        let next = self.scanner.next_token();
        mem::replace(&mut self.current, next)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    /// Whether the current token ends the expression being parsed.
    fn at_boundary(&self) -> bool {
        self.at(TokenKind::LeaveExpr) || self.at(TokenKind::Eof)
    }

    /// Records an error. A second error at the same token is a cascade of
    /// the first and is dropped.
    fn error(&mut self, token: Token, message: String) {
        if self
            .errors
            .last()
            .is_some_and(|last| last.token.offset == token.offset)
        {
            return;
        }
        self.errors.push(SyntaxError { token, message });
    }

    /// Consumes a token of `kind`. On mismatch the error is recorded and the
    /// offending token skipped, unless it closes the expression.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        let found = self.current.clone();
        self.error(
            found.clone(),
            format!("expected {:?}, found {:?}", kind.describe(), found.to_string()),
        );
        if !self.at_boundary() {
            self.advance();
        }
        false
    }

    fn skip_to_boundary(&mut self) {
        while !self.at_boundary() {
            self.advance();
        }
    }

    fn parse_fragment(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Text => Node::text(self.advance().lexeme),
            TokenKind::EnterExpr => {
                self.advance();
                let expr = self.parse_expr(Power::None);
                if !self.at(TokenKind::LeaveExpr) {
                    let found = self.current.clone();
                    self.error(
                        found.clone(),
                        format!("expected \"}}\", found {:?}", found.to_string()),
                    );
                    self.skip_to_boundary();
                }
                if self.at(TokenKind::LeaveExpr) {
                    self.advance();
                }
                expr
            }
            _ => {
                let token = self.advance();
                self.error(token.clone(), format!("unexpected {:?}", token.to_string()));
                Node::Invalid {
                    start: token.clone(),
                    end: token,
                }
            }
        }
    }

    /// Parses an expression binding tighter than `rbp`.
    ///
    /// `depth` tracks the depth of the tree being built: one level per
    /// nested expression and one per infix application, since operator
    /// chains grow the tree without recursing.
    fn parse_expr(&mut self, rbp: Power) -> Node {
        if self.depth >= MAX_NESTING {
            return self.too_deep();
        }

        self.depth += 1;
        let entered = self.depth;
        let mut lhs = self.parse_prefix();
        while rbp < infix_power(self.current.kind) {
            if self.depth >= MAX_NESTING {
                lhs = self.too_deep();
                break;
            }
            lhs = self.parse_infix(lhs);
            self.depth += 1;
        }
        self.depth = entered - 1;
        lhs
    }

    fn too_deep(&mut self) -> Node {
        let start = self.current.clone();
        self.error(
            start.clone(),
            format!("expression nested too deeply (limit {MAX_NESTING})"),
        );
        self.skip_to_boundary();
        Node::Invalid {
            start,
            end: self.current.clone(),
        }
    }

    fn parse_prefix(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Int => self.literal(LiteralKind::Int),
            TokenKind::Float => self.literal(LiteralKind::Float),
            TokenKind::String => self.literal(LiteralKind::String),
            TokenKind::Ident => {
                let token = self.advance();
                Builtin::from_name(&token.lexeme).map_or_else(|| Node::Ident(token.lexeme), Node::Func)
            }
            TokenKind::Bang | TokenKind::Plus | TokenKind::Minus => {
                let op = match self.advance().kind {
                    TokenKind::Bang => UnaryOp::Not,
                    TokenKind::Plus => UnaryOp::Plus,
                    _ => UnaryOp::Minus,
                };
                let operand = self.parse_expr(Power::Unary);
                Node::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Colon => {
                self.advance();
                let start = Node::Literal {
                    kind: LiteralKind::Int,
                    lexeme: "0".to_string(),
                };
                self.finish_range(start)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(Power::None);
                self.expect(TokenKind::RParen);
                inner
            }
            _ => self.parse_invalid(),
        }
    }

    fn parse_infix(&mut self, lhs: Node) -> Node {
        let token = self.advance();
        match token.kind {
            TokenKind::Colon => self.finish_range(lhs),
            TokenKind::EqualGreater => self.finish_select(lhs),
            TokenKind::LBrack => self.finish_index(lhs),
            TokenKind::LParen => self.finish_call(lhs),
            kind => {
                let Some(op) = binary_op(kind) else {
                    return lhs;
                };
                let rhs = self.parse_expr(infix_power(kind));
                Node::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            }
        }
    }

    fn literal(&mut self, kind: LiteralKind) -> Node {
        Node::Literal {
            kind,
            lexeme: self.advance().lexeme,
        }
    }

    fn parse_invalid(&mut self) -> Node {
        let start = self.current.clone();
        self.error(start.clone(), format!("unexpected {:?}", start.to_string()));
        self.skip_to_boundary();
        Node::Invalid {
            start,
            end: self.current.clone(),
        }
    }

    /// Parses the end of `start:end`; the colon is already consumed. The end
    /// is optional when the bracket closes right away.
    fn finish_range(&mut self, start: Node) -> Node {
        let end = if self.at(TokenKind::RBrack) {
            None
        } else {
            Some(Box::new(self.parse_expr(Power::Range)))
        };
        Node::Range {
            start: Box::new(start),
            end,
        }
    }

    fn finish_index(&mut self, base: Node) -> Node {
        let index = self.parse_expr(Power::None);
        self.expect(TokenKind::RBrack);
        match index {
            Node::Range { start, end } => Node::Slice {
                base: Box::new(base),
                start: Some(start),
                end,
            },
            index => Node::Index {
                base: Box::new(base),
                index: Box::new(index),
            },
        }
    }

    fn finish_select(&mut self, value: Node) -> Node {
        let mut options = Vec::new();
        self.expect(TokenKind::LParen);
        while !self.at(TokenKind::RParen) && !self.at_boundary() {
            let pattern = self.parse_expr(Power::None);
            self.expect(TokenKind::Equal);
            let result = self.parse_expr(Power::None);
            options.push(SelectOption { pattern, result });
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma);
            }
        }
        self.expect(TokenKind::RParen);
        Node::Select {
            value: Box::new(value),
            options,
        }
    }

    fn finish_call(&mut self, callee: Node) -> Node {
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at_boundary() {
            args.push(self.parse_expr(Power::None));
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma);
            }
        }
        self.expect(TokenKind::RParen);
        Node::Call {
            callee: Box::new(callee),
            args,
        }
    }
}
