//! Two-mode template scanner.
//!
//! Outside of braces the scanner produces [`TokenKind::Text`] runs; `{`
//! switches to expression mode and `}` switches back. The scanner never
//! fails: input it cannot classify becomes a [`TokenKind::Unexpected`] token
//! and is reported by the parser.

use winnow::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::parser::token::{self, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Expr,
}

/// Pull-based scanner over a template source.
///
/// Once the input is exhausted every call to [`Scanner::next_token`] returns
/// an [`TokenKind::Eof`] token with an empty lexeme.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    rest: &'a str,
    mode: Mode,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            mode: Mode::Text,
        }
    }

    /// Produces the next token.
    pub fn next_token(&mut self) -> Token {
        if self.mode == Mode::Expr {
            let _ = whitespace.parse_next(&mut self.rest);
        }
        let offset = self.offset();
        if self.rest.is_empty() {
            return Token::new(TokenKind::Eof, "", offset);
        }
        match self.mode {
            Mode::Text => self.scan_text(offset),
            Mode::Expr => self.scan_expr(offset),
        }
    }

    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn consumed_since(&self, start: &'a str) -> &'a str {
        &start[..start.len() - self.rest.len()]
    }

    fn scan_text(&mut self, offset: usize) -> Token {
        if let Some(rest) = self.rest.strip_prefix('{') {
            self.rest = rest;
            self.mode = Mode::Expr;
            return Token::new(TokenKind::EnterExpr, "{", offset);
        }

        let mut text = String::new();
        loop {
            let end = self.rest.find(['{', '\\']).unwrap_or(self.rest.len());
            text.push_str(&self.rest[..end]);
            self.rest = &self.rest[end..];

            if let Some(rest) = self.rest.strip_prefix("\\{") {
                text.push('{');
                self.rest = rest;
            } else if let Some(rest) = self.rest.strip_prefix("\\\\") {
                text.push('\\');
                self.rest = rest;
            } else if let Some(rest) = self.rest.strip_prefix('\\') {
                text.push('\\');
                self.rest = rest;
            } else {
                break;
            }
        }
        Token::new(TokenKind::Text, text, offset)
    }

    fn scan_expr(&mut self, offset: usize) -> Token {
        let start = self.rest;

        if let Some(rest) = self.rest.strip_prefix('}') {
            self.rest = rest;
            self.mode = Mode::Text;
            return Token::new(TokenKind::LeaveExpr, "}", offset);
        }

        if let Some(quote) = self.rest.chars().next().filter(|&c| matches!(c, '\'' | '"' | '`')) {
            return self.scan_string(quote, offset);
        }

        if let Ok(word) = identifier.parse_next(&mut self.rest) {
            let kind = token::keyword(word).unwrap_or(TokenKind::Ident);
            return Token::new(kind, word, offset);
        }

        if self.rest.starts_with(|c: char| c.is_ascii_digit()) {
            return self.scan_number(start, offset);
        }

        if let Some((spelling, kind)) = token::OPERATORS
            .iter()
            .find(|(spelling, _)| self.rest.starts_with(spelling))
        {
            self.rest = &self.rest[spelling.len()..];
            return Token::new(*kind, *spelling, offset);
        }

        let _ = unexpected_run.parse_next(&mut self.rest);
        Token::new(TokenKind::Unexpected, self.consumed_since(start), offset)
    }

    fn scan_number(&mut self, start: &'a str, offset: usize) -> Token {
        let _ = digits.parse_next(&mut self.rest);
        let Some(after_dot) = self.rest.strip_prefix('.') else {
            return Token::new(TokenKind::Int, self.consumed_since(start), offset);
        };

        self.rest = after_dot;
        if after_dot.starts_with(|c: char| c.is_ascii_digit()) {
            let _ = digits.parse_next(&mut self.rest);
            Token::new(TokenKind::Float, self.consumed_since(start), offset)
        } else {
            let _ = unexpected_run.parse_next(&mut self.rest);
            Token::new(TokenKind::Unexpected, self.consumed_since(start), offset)
        }
    }

    /// Reads a quoted string. Only the closing quote and the backslash can
    /// be escaped; any other backslash is kept as written. An unterminated
    /// string runs to the end of the input.
    fn scan_string(&mut self, quote: char, offset: usize) -> Token {
        let body = &self.rest[quote.len_utf8()..];
        let mut value = String::new();
        let mut end = body.len();
        let mut chars = body.char_indices().peekable();

        while let Some((index, c)) = chars.next() {
            if c == quote {
                end = index + c.len_utf8();
                break;
            } else if c == '\\' {
                match chars.peek() {
                    Some(&(_, next)) if next == quote || next == '\\' => {
                        value.push(next);
                        chars.next();
                    }
                    _ => value.push('\\'),
                }
            } else {
                value.push(c);
            }
        }

        self.rest = &body[end..];
        Token::new(TokenKind::String, value, offset)
    }
}

/// Scans a whole template, including the trailing EOF token.
pub fn scan(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., is_whitespace).parse_next(input)
}

/// A run of input up to whitespace or the closing brace.
fn unexpected_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(0.., |c: char| is_whitespace(c) || c == '}').parse_next(input)
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '_').parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens = scan("{'abc");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, "abc");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn offsets_point_into_source() {
        let tokens = scan("ab{ x }");
        assert_eq!(tokens[1].offset, 2);
        assert_eq!(tokens[2].offset, 4);
        assert_eq!(tokens[3].offset, 6);
    }

    #[test]
    fn unexpected_input_stops_at_closing_brace() {
        let tokens = scan("{@@}x");
        assert_eq!(tokens[1].kind, TokenKind::Unexpected);
        assert_eq!(tokens[1].lexeme, "@@");
        assert_eq!(tokens[2].kind, TokenKind::LeaveExpr);
        assert_eq!(tokens[3].lexeme, "x");
    }
}
