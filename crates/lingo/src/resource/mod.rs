//! Per-locale translation resources.
//!
//! Each locale is one JSON document. Nested objects flatten into dotted
//! keys, and every leaf compiles into a [`Translation`]:
//!
//! - a string, or a one-element array, is a single template;
//! - an array of strings is one template, its lines joined with `\n`;
//! - an array starting with `"if:<expr>"` guards the next element with the
//!   condition, the rest being fallbacks tried in order;
//! - any other array is a group of translations, the first match wins.

mod catalog;
mod error;
mod store;
mod translation;

pub use catalog::{Catalog, DEFAULT_FALLBACK_LOCALE, Snapshot};
pub use error::{LoadError, TemplateIssue, TranslateError, compute_suggestions};
pub use store::Resource;
pub use translation::{CONDITION_PREFIX, KEY_SEPARATOR, Translation};
