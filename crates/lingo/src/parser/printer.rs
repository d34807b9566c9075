//! S-expression rendering of templates, used by tests and `lingo eval --ast`.

use std::fmt::{self, Display, Formatter};

use crate::parser::ast::{LiteralKind, Node};

/// Renders a node as a parenthesized prefix expression.
///
/// Text and string literals are quoted, numbers and names are written as-is
/// and the fragments of a root are separated by single spaces:
///
/// ```
/// use lingo::parser::{parse_template, sprint};
///
/// let root = parse_template("Total: {1 + 2 * 3}").unwrap();
/// assert_eq!(sprint(&root), r#""Total: " (+ 1 (* 2 3))"#);
/// ```
pub fn sprint(node: &Node) -> String {
    node.to_string()
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Root(fragments) => write_separated(f, fragments),
            Node::Ident(name) => f.write_str(name),
            Node::Func(builtin) => f.write_str(builtin.name()),
            Node::Literal { kind, lexeme } => match kind {
                LiteralKind::Text | LiteralKind::String => write!(f, "{lexeme:?}"),
                LiteralKind::Int | LiteralKind::Float => f.write_str(lexeme),
            },
            Node::Unary { op, operand } => write!(f, "({} {operand})", op.symbol()),
            Node::Binary { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
            Node::Range { start, end } => {
                write!(f, "(: {start}")?;
                if let Some(end) = end {
                    write!(f, " {end}")?;
                }
                f.write_str(")")
            }
            Node::Index { base, index } => write!(f, "(index {base} {index})"),
            Node::Slice { base, start, end } => {
                write!(f, "(slice {base}")?;
                for bound in [start, end].into_iter().flatten() {
                    write!(f, " {bound}")?;
                }
                f.write_str(")")
            }
            Node::Select { value, options } => {
                write!(f, "(select {value}")?;
                for option in options {
                    write!(f, " (opt {} {})", option.pattern, option.result)?;
                }
                f.write_str(")")
            }
            Node::Call { callee, args } => {
                write!(f, "(call {callee}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Node::Invalid { start, .. } => write!(f, "(invalid {:?})", start.to_string()),
        }
    }
}

fn write_separated(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}
