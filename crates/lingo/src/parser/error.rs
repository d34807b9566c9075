//! Error types for template parsing.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::parser::ast::Node;
use crate::parser::token::Token;

/// A single recoverable syntax problem, anchored at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct SyntaxError {
    pub token: Token,
    pub message: String,
}

impl SyntaxError {
    /// 1-indexed line and column of the offending token within `source`.
    pub fn position(&self, source: &str) -> (usize, usize) {
        line_column(source, self.token.offset)
    }
}

/// All syntax errors of a template together with the best-effort tree the
/// parser recovered.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ParseError {
    pub root: Node,
    pub errors: Vec<SyntaxError>,
}

impl ParseError {
    /// Drops the diagnostics and keeps the recovered tree.
    pub fn into_root(self) -> Node {
        self.root
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Converts a byte offset into a 1-indexed (line, column) pair.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before, |newline| &before[newline + 1..])
        .chars()
        .count()
        + 1;
    (line, column)
}
