//! The multi-locale translation catalog.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bon::Builder;
use parking_lot::RwLock;
use tracing::{debug, trace_span, warn};

use crate::interpreter::{DEFAULT_MAX_DEPTH, EvalContext, choose, eval};
use crate::resource::error::{LoadError, TemplateIssue, TranslateError, compute_suggestions};
use crate::resource::store::Resource;
use crate::runtime::{MARKDOWN, Runtime};
use crate::types::{Message, Value};

/// Locale returned by [`Catalog::closest_locale`] when nothing matches.
pub const DEFAULT_FALLBACK_LOCALE: &str = "en-GB";

/// An immutable view of every loaded locale.
///
/// Loading never mutates a published snapshot; it builds a new one and swaps
/// it in, so a reader holding a snapshot sees each locale either entirely
/// before or entirely after a load.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    resources: HashMap<String, Arc<Resource>>,
    /// Locales in the order they were first loaded.
    order: Vec<String>,
    /// Source files of file-loaded locales, for [`Catalog::reload`].
    paths: HashMap<String, PathBuf>,
}

impl Snapshot {
    pub fn resource(&self, locale: &str) -> Option<&Arc<Resource>> {
        self.resources.get(locale)
    }

    pub fn locales(&self) -> &[String] {
        &self.order
    }

    /// The loaded locale best matching the candidates, if any.
    fn closest_locale(&self, candidates: &[&str]) -> Option<String> {
        let tags = candidates
            .iter()
            .flat_map(|candidate| candidate.split(','))
            .map(str::trim)
            .filter(|tag| !tag.is_empty());
        for tag in tags {
            if self.resources.contains_key(tag) {
                return Some(tag.to_string());
            }
            let language = tag.split_once('-').map_or(tag, |(language, _)| language);
            if self.resources.contains_key(language) {
                return Some(language.to_string());
            }
            let prefix = format!("{language}-");
            if let Some(locale) = self.order.iter().find(|locale| locale.starts_with(&prefix)) {
                return Some(locale.clone());
            }
        }
        None
    }
}

/// Translations for every locale of an application.
///
/// A catalog is shared freely between threads. Loads publish a new
/// [`Snapshot`]; translations run against the snapshot current when they
/// start and never hold the lock while evaluating.
///
/// # Example
///
/// ```
/// use lingo::{Catalog, Message, runtime::MARKDOWN};
///
/// let catalog = Catalog::builder().fallback_locale("en").build();
/// catalog
///     .load_json_str("en", r#"{"greeting": "Hello, {bold(name)}!"}"#)
///     .unwrap();
///
/// let message = Message::new("greeting").with("name", "Ada");
/// let text = catalog.translate(&MARKDOWN, "en", &message).unwrap();
/// assert_eq!(text, "Hello, **Ada**!");
/// ```
#[derive(Builder)]
#[builder(on(String, into))]
pub struct Catalog {
    /// Locale chosen when no candidate matches a loaded locale.
    #[builder(default = DEFAULT_FALLBACK_LOCALE.to_string())]
    fallback_locale: String,

    /// Locale used to render messages shown as errors. Defaults to the
    /// fallback locale.
    error_locale: Option<String>,

    /// Whether a syntax error in any template fails the whole load.
    #[builder(default = true)]
    strict: bool,

    /// Evaluation depth ceiling, shared by nested translations.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[builder(skip)]
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builder().build()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    pub fn error_locale(&self) -> &str {
        self.error_locale.as_deref().unwrap_or(&self.fallback_locale)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads a locale from a JSON document, replacing any previous
    /// translations of that locale.
    ///
    /// Returns the templates that had syntax errors, which is only ever
    /// non-empty for a lenient catalog.
    pub fn load_json_str(&self, locale: &str, source: &str) -> Result<Vec<TemplateIssue>, LoadError> {
        let (resource, issues) = Resource::from_json_str(locale, source, self.strict)?;
        self.publish(locale, resource, None, &issues);
        Ok(issues)
    }

    /// Loads a locale from a reader of a JSON document.
    pub fn load_json_reader(
        &self,
        locale: &str,
        mut reader: impl Read,
    ) -> Result<Vec<TemplateIssue>, LoadError> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|source| LoadError::Io {
                path: PathBuf::from(format!("<{locale}>")),
                source,
            })?;
        self.load_json_str(locale, &source)
    }

    /// Loads a `<locale>.json` file. The file stem names the locale.
    pub fn load_json_file(&self, path: impl AsRef<Path>) -> Result<Vec<TemplateIssue>, LoadError> {
        let path = path.as_ref();
        let locale = locale_of(path)?;
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (resource, issues) = Resource::from_json_str(&locale, &source, self.strict)?;
        self.publish(&locale, resource, Some(path.to_path_buf()), &issues);
        Ok(issues)
    }

    /// Loads every `*.json` file directly inside `dir`, in file name order.
    ///
    /// Stops at the first file that fails; locales loaded before it stay
    /// loaded.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<TemplateIssue>, LoadError> {
        let mut issues = Vec::new();
        for path in json_files(dir.as_ref())? {
            issues.extend(self.load_json_file(&path)?);
        }
        Ok(issues)
    }

    /// Reloads a locale from the file it was loaded from.
    pub fn reload(&self, locale: &str) -> Result<Vec<TemplateIssue>, LoadError> {
        let path = self
            .snapshot()
            .paths
            .get(locale)
            .cloned()
            .ok_or_else(|| LoadError::NoPathForReload {
                locale: locale.to_string(),
            })?;
        self.load_json_file(path)
    }

    /// Builds the next snapshot with `resource` in place of `locale`, then
    /// swaps it in.
    fn publish(
        &self,
        locale: &str,
        resource: Resource,
        path: Option<PathBuf>,
        issues: &[TemplateIssue],
    ) {
        for issue in issues {
            warn!(locale, key = %issue.key, "template has syntax errors: {issue}");
        }
        debug!(locale, keys = resource.len(), "loaded translations");

        let mut guard = self.snapshot.write();
        let mut next = Snapshot::clone(&guard);
        if !next.resources.contains_key(locale) {
            next.order.push(locale.to_string());
        }
        next.resources.insert(locale.to_string(), Arc::new(resource));
        match path {
            Some(path) => next.paths.insert(locale.to_string(), path),
            None => next.paths.remove(locale),
        };
        *guard = Arc::new(next);
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Locales in load order.
    pub fn locales(&self) -> Vec<String> {
        self.snapshot().order.clone()
    }

    /// Sorted keys of a locale; empty for a locale that is not loaded.
    pub fn keys(&self, locale: &str) -> Vec<String> {
        self.snapshot()
            .resource(locale)
            .map(|resource| resource.keys().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_key(&self, locale: &str, key: &str) -> bool {
        self.snapshot()
            .resource(locale)
            .is_some_and(|resource| resource.contains_key(key))
    }

    /// Picks the loaded locale for an ordered list of candidate tags, highest
    /// priority first. A candidate may itself be a comma-separated list.
    ///
    /// For each tag, in order: an exact match, then its language subtag,
    /// then the first loaded locale with that language. Returns the fallback
    /// locale and `false` when nothing matches.
    pub fn closest_locale(&self, candidates: &[&str]) -> (String, bool) {
        match self.snapshot().closest_locale(candidates) {
            Some(locale) => (locale, true),
            None => (self.fallback_locale.clone(), false),
        }
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Renders a message in `locale`.
    ///
    /// An empty key renders as the empty string. A key without a matching
    /// translation is [`TranslateError::NotFound`], carrying the message's
    /// debug string as the rendering.
    pub fn translate(
        &self,
        runtime: &dyn Runtime,
        locale: &str,
        message: &Message,
    ) -> Result<String, TranslateError> {
        if message.key.is_empty() {
            return Ok(String::new());
        }
        let _span = trace_span!("translate", locale, key = %message.key).entered();
        let snapshot = self.snapshot();
        let Some(resource) = snapshot.resource(locale) else {
            return Err(self.not_found(locale, message, &[]));
        };
        let Some(translation) = resource.get(&message.key) else {
            return Err(self.not_found(locale, message, &resource.keys()));
        };

        let mut ctx = EvalContext::new(runtime, locale, &message.vars)
            .with_resource(resource)
            .with_max_depth(self.max_depth);
        let rendered = choose(translation, &mut ctx)
            .and_then(|node| node.map(|node| eval(node, &mut ctx)).transpose());
        match rendered {
            Ok(Some(value)) => Ok(runtime.post_process(&value)),
            Ok(None) => Err(self.not_found(locale, message, &[])),
            Err(source) => Err(TranslateError::Eval {
                key: message.key.clone(),
                locale: locale.to_string(),
                rendered: message.debug_string(),
                source,
            }),
        }
    }

    /// [`Catalog::translate`] as a [`Value`], for callers composing results.
    pub fn translate_value(
        &self,
        runtime: &dyn Runtime,
        locale: &str,
        message: &Message,
    ) -> Result<Value, TranslateError> {
        self.translate(runtime, locale, message).map(Value::raw)
    }

    /// Renders a message, logging any failure and falling back to the
    /// message's debug string.
    pub fn t(&self, runtime: &dyn Runtime, locale: &str, message: &Message) -> String {
        self.translate(runtime, locale, message)
            .unwrap_or_else(|error| {
                warn!(locale, "{error}");
                error.into_rendered()
            })
    }

    /// Renders a message used as an error: Markdown runtime, error locale.
    pub fn render_error(&self, message: &Message) -> String {
        self.translate(&MARKDOWN, self.error_locale(), message)
            .unwrap_or_else(TranslateError::into_rendered)
    }

    fn not_found(&self, locale: &str, message: &Message, keys: &[&str]) -> TranslateError {
        TranslateError::NotFound {
            key: message.key.clone(),
            locale: locale.to_string(),
            rendered: message.debug_string(),
            suggestions: compute_suggestions(&message.key, keys),
        }
    }
}

fn locale_of(path: &Path) -> Result<String, LoadError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| LoadError::InvalidPath {
            path: path.to_path_buf(),
        })
}

/// `*.json` files directly inside `dir`, sorted by path.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
