//! Template interpreter.

mod builtins;
mod context;
mod error;
mod evaluator;
mod plural;

pub use context::{DEFAULT_MAX_DEPTH, EvalContext};
pub use error::EvalError;
pub use evaluator::{choose, eval, eval_template};
pub use plural::plural_category;
