//! Tokens produced by the template scanner.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Eof,
    Unexpected,
    Text,
    EnterExpr,
    LeaveExpr,
    Ident,
    Int,
    Float,
    String,
    Or,
    And,
    Bang,
    Comma,
    Colon,
    Equal,
    EqualEqual,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    EqualGreater,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    LParen,
    RParen,
    LBrack,
    RBrack,
}

impl TokenKind {
    /// Canonical spelling used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Eof => "eof",
            TokenKind::Unexpected => "unexpected input",
            TokenKind::Text => "text",
            TokenKind::EnterExpr => "{",
            TokenKind::LeaveExpr => "}",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Or => "or",
            TokenKind::And => "and",
            TokenKind::Bang => "!",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::EqualGreater => "=>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrack => "[",
            TokenKind::RBrack => "]",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Operator spellings, two-character forms first so they win over their prefixes.
pub(crate) const OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    (">=", TokenKind::GreaterEqual),
    ("<=", TokenKind::LessEqual),
    ("=>", TokenKind::EqualGreater),
    ("!", TokenKind::Bang),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBrack),
    ("]", TokenKind::RBrack),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Asterisk),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Equal),
    (">", TokenKind::Greater),
    ("<", TokenKind::Less),
];

/// Maps word operators to their token kind.
pub(crate) fn keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "or" => Some(TokenKind::Or),
        "and" => Some(TokenKind::And),
        _ => None,
    }
}

/// A single lexical unit of a template.
///
/// `lexeme` holds the decoded text for [`TokenKind::Text`] and
/// [`TokenKind::String`] tokens (escapes resolved, quotes removed) and the
/// raw source slice for everything else. `offset` is the byte position of
/// the token in the template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            f.write_str("eof")
        } else {
            f.write_str(&self.lexeme)
        }
    }
}
