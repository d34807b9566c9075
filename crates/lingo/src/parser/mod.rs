//! Template scanning and parsing.

pub mod ast;
pub mod error;
pub mod printer;
pub mod scanner;
pub mod template;
pub mod token;

pub use ast::{BinaryOp, Builtin, LiteralKind, Node, SelectOption, UnaryOp};
pub use error::{ParseError, SyntaxError, line_column};
pub use printer::sprint;
pub use scanner::{Scanner, scan};
pub use template::{MAX_NESTING, parse_template, parse_template_lenient};
pub use token::{Token, TokenKind};
