//! Process-wide catalog.
//!
//! Backs [`Message`]'s `Display` implementation and offers free functions
//! for applications that keep one catalog for their whole lifetime.
//! Configure it once at startup with [`set_catalog`], then load resources.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::resource::{Catalog, LoadError, TemplateIssue, TranslateError};
use crate::runtime::Runtime;
use crate::types::Message;

static GLOBAL_CATALOG: LazyLock<RwLock<Arc<Catalog>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Catalog::new())));

/// The global catalog.
pub fn catalog() -> Arc<Catalog> {
    Arc::clone(&GLOBAL_CATALOG.read())
}

/// Replaces the global catalog. Holders of the previous one keep it.
pub fn set_catalog(catalog: Catalog) {
    *GLOBAL_CATALOG.write() = Arc::new(catalog);
}

/// Loads every `*.json` file of `dir` into the global catalog.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<TemplateIssue>, LoadError> {
    catalog().load_dir(dir)
}

pub fn closest_locale(candidates: &[&str]) -> (String, bool) {
    catalog().closest_locale(candidates)
}

pub fn translate(
    runtime: &dyn Runtime,
    locale: &str,
    message: &Message,
) -> Result<String, TranslateError> {
    catalog().translate(runtime, locale, message)
}

/// Lenient translation through the global catalog; see [`Catalog::t`].
pub fn t(runtime: &dyn Runtime, locale: &str, message: &Message) -> String {
    catalog().t(runtime, locale, message)
}
