//! AST types for parsed templates.

use std::fmt::{self, Display, Formatter};
use std::slice;

use crate::parser::token::Token;

/// A node of a parsed template.
///
/// The parser always produces a [`Node::Root`] at the top; its children are
/// the text and expression fragments in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Root(Vec<Node>),
    /// A variable reference.
    Ident(String),
    /// A builtin function name, resolved while parsing.
    Func(Builtin),
    Literal {
        kind: LiteralKind,
        lexeme: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `start:end` before it is folded into a [`Node::Slice`]. Only survives
    /// in the tree when written outside of brackets.
    Range {
        start: Box<Node>,
        end: Option<Box<Node>>,
    },
    Index {
        base: Box<Node>,
        index: Box<Node>,
    },
    Slice {
        base: Box<Node>,
        start: Option<Box<Node>>,
        end: Option<Box<Node>>,
    },
    Select {
        value: Box<Node>,
        options: Vec<SelectOption>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    /// Placeholder for a span that failed to parse.
    Invalid {
        start: Token,
        end: Token,
    },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Literal {
            kind: LiteralKind::Text,
            lexeme: text.into(),
        }
    }

    /// Fragments of a root node, or the node itself for anything else.
    pub fn fragments(&self) -> &[Node] {
        match self {
            Node::Root(fragments) => fragments,
            other => slice::from_ref(other),
        }
    }
}

/// One `pattern = result` arm of a select expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub pattern: Node,
    pub result: Node,
}

impl SelectOption {
    /// Whether the pattern is the `_` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(&self.pattern, Node::Ident(name) if name == "_")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Literal template text outside of braces.
    Text,
    String,
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// Functions callable from templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Len,
    Join,
    Split,
    Bold,
    Italic,
    Link,
    PadLeft,
    PadRight,
    TrimLeft,
    TrimRight,
    Integer,
    Fraction,
    Abs,
    Plural,
    T,
}

impl Builtin {
    pub const ALL: [Builtin; 15] = [
        Builtin::Len,
        Builtin::Join,
        Builtin::Split,
        Builtin::Bold,
        Builtin::Italic,
        Builtin::Link,
        Builtin::PadLeft,
        Builtin::PadRight,
        Builtin::TrimLeft,
        Builtin::TrimRight,
        Builtin::Integer,
        Builtin::Fraction,
        Builtin::Abs,
        Builtin::Plural,
        Builtin::T,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Join => "join",
            Builtin::Split => "split",
            Builtin::Bold => "bold",
            Builtin::Italic => "italic",
            Builtin::Link => "link",
            Builtin::PadLeft => "pad_left",
            Builtin::PadRight => "pad_right",
            Builtin::TrimLeft => "trim_left",
            Builtin::TrimRight => "trim_right",
            Builtin::Integer => "integer",
            Builtin::Fraction => "fraction",
            Builtin::Abs => "abs",
            Builtin::Plural => "plural",
            Builtin::T => "t",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
