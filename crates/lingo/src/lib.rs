pub mod global;
pub mod interpreter;
pub mod parser;
pub mod resource;
pub mod runtime;
pub mod types;

pub use interpreter::{EvalContext, EvalError, eval_template, plural_category};
pub use parser::{Node, ParseError, SyntaxError, parse_template, parse_template_lenient, sprint};
pub use resource::{
    Catalog, LoadError, Resource, TemplateIssue, TranslateError, Translation, compute_suggestions,
};
pub use runtime::{HtmlRuntime, JsRuntime, MarkdownRuntime, Runtime};
pub use types::{Message, Type, Value, Vars};
