//! Miette diagnostic wrapper for template syntax errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use lingo::parser::{SyntaxError, TokenKind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for one syntax error of one template.
///
/// The source shown is the template itself rather than the whole resource
/// file, since offsets are relative to the template.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(lingo::syntax))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    /// `name` labels the source, e.g. `de.json#menu.open`.
    pub fn new(name: String, template: &str, error: &SyntaxError) -> Self {
        // Clamp to the template to avoid a miette panic on out-of-bounds spans.
        let offset = error.token.offset.min(template.len());
        let length = error
            .token
            .lexeme
            .len()
            .clamp(1, template.len().saturating_sub(offset).max(1));

        TemplateDiagnostic {
            src: NamedSource::new(name, template.to_string()),
            span: (offset, length).into(),
            message: error.message.clone(),
            help: help_for(error),
        }
    }
}

fn help_for(error: &SyntaxError) -> Option<String> {
    match error.token.kind {
        TokenKind::Eof => Some("the expression is missing a closing `}`".into()),
        TokenKind::Unexpected if error.token.lexeme.ends_with('.') => {
            Some("float literals need digits after the `.`".into())
        }
        _ => None,
    }
}
