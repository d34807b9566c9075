//! Error types for template evaluation.

use thiserror::Error;

use crate::types::Type;

/// An error that aborts evaluation of a template.
///
/// Most type mismatches are not errors: values coerce into each other and
/// missing data renders as the empty string. Only operations with no
/// meaningful fallback fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Slicing something that is neither text nor a slice.
    #[error("cannot slice a value of type {kind}")]
    CannotSlice { kind: Type },

    /// A slice bound that is not an integer.
    #[error("invalid slice {bound} bound of type {kind}")]
    InvalidSliceBound { bound: &'static str, kind: Type },

    /// An operator that cannot be evaluated where it appears, such as a
    /// `start:end` range outside of brackets.
    #[error("unexpected operator '{op}'")]
    UnexpectedOperator { op: String },

    /// A placeholder left behind by the parser after a syntax error.
    #[error("cannot evaluate invalid expression at {lexeme:?}")]
    InvalidNode { lexeme: String },

    /// Evaluation nested deeper than the configured limit, usually a
    /// translation that refers to itself through `t`.
    #[error("maximum evaluation depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },
}
