//! Error types for loading resources and translating messages.

use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;

use crate::interpreter::EvalError;
use crate::parser::SyntaxError;

/// A template of a resource that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
    /// Flattened key of the translation.
    pub key: String,
    /// The template text as it was parsed, so diagnostics can point into it.
    pub template: String,
    pub errors: Vec<SyntaxError>,
}

impl Display for TemplateIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.key)?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Errors that occur while loading translation resources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a resource file or directory.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file whose name yields no locale.
    #[error("cannot derive a locale from '{path}'")]
    InvalidPath { path: PathBuf },

    /// The resource is not valid JSON.
    #[error("locale {locale}: decode translation JSON: {source}")]
    Json {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an object.
    #[error("locale {locale}: expected a JSON object, found {found}")]
    NotAnObject { locale: String, found: &'static str },

    /// A template with syntax errors, in strict mode.
    #[error("locale {locale}: {issue}")]
    Syntax { locale: String, issue: TemplateIssue },

    /// A leaf that is neither a string nor an array.
    #[error("locale {locale}: {key}: cannot load {found} value")]
    UnsupportedValue {
        locale: String,
        key: String,
        found: &'static str,
    },

    /// `reload` for a locale that was not loaded from a file.
    #[error("cannot reload '{locale}': was not loaded from a file")]
    NoPathForReload { locale: String },
}

/// Errors returned when translating a message.
///
/// Both variants carry the best available rendering, so callers that only
/// log the error can still show something.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// No translation for the key in the locale, or none whose condition
    /// matched. `rendered` is the message's debug string.
    #[error("message not found: '{key}' in locale '{locale}'{}", suggestion_hint(.suggestions))]
    NotFound {
        key: String,
        locale: String,
        rendered: String,
        suggestions: Vec<String>,
    },

    /// The selected template failed to evaluate.
    #[error("failed to evaluate '{key}' in locale '{locale}': {source}")]
    Eval {
        key: String,
        locale: String,
        rendered: String,
        #[source]
        source: EvalError,
    },
}

impl TranslateError {
    /// The fallback rendering carried by the error.
    pub fn rendered(&self) -> &str {
        match self {
            TranslateError::NotFound { rendered, .. } | TranslateError::Eval { rendered, .. } => {
                rendered
            }
        }
    }

    pub fn into_rendered(self) -> String {
        match self {
            TranslateError::NotFound { rendered, .. } | TranslateError::Eval { rendered, .. } => {
                rendered
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TranslateError::NotFound { .. })
    }
}

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute "did you mean" suggestions for a misspelled key.
///
/// Returns up to 3 suggestions sorted by edit distance. Short keys (up to 3
/// characters) only match at distance 1, longer keys up to distance 2.
pub fn compute_suggestions(target: &str, available: &[&str]) -> Vec<String> {
    let max_distance = if target.len() <= 3 { 1 } else { 2 };
    let mut matches: Vec<(usize, &str)> = available
        .iter()
        .map(|candidate| (levenshtein(target, candidate), *candidate))
        .filter(|(distance, _)| *distance > 0 && *distance <= max_distance)
        .collect();
    matches.sort_unstable();
    matches
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
