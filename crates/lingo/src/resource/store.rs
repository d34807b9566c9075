//! The compiled translation table of one locale.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::resource::error::{LoadError, TemplateIssue};
use crate::resource::translation::{Compiler, Translation, json_kind};

/// Every translation of one locale, keyed by flattened key.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    translations: HashMap<String, Translation>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a locale's JSON document.
    ///
    /// Returns the resource and, in lenient mode, the templates that had
    /// syntax errors but were kept with their recovered trees. In strict mode
    /// the first such template is a [`LoadError::Syntax`].
    pub fn from_json_str(
        locale: &str,
        source: &str,
        strict: bool,
    ) -> Result<(Self, Vec<TemplateIssue>), LoadError> {
        let document: JsonValue =
            serde_json::from_str(source).map_err(|source| LoadError::Json {
                locale: locale.to_string(),
                source,
            })?;
        Self::from_json_value(locale, &document, strict)
    }

    /// Compiles an already decoded JSON document.
    pub fn from_json_value(
        locale: &str,
        document: &JsonValue,
        strict: bool,
    ) -> Result<(Self, Vec<TemplateIssue>), LoadError> {
        let JsonValue::Object(object) = document else {
            return Err(LoadError::NotAnObject {
                locale: locale.to_string(),
                found: json_kind(document),
            });
        };
        let mut compiler = Compiler::new(locale, strict);
        let mut entries = Vec::new();
        compiler.flatten("", object, &mut entries)?;
        let resource = Self {
            translations: entries.into_iter().collect(),
        };
        Ok((resource, compiler.into_issues()))
    }

    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.translations.get(key)
    }

    /// Adds or replaces one translation.
    pub fn insert(&mut self, key: impl Into<String>, translation: Translation) {
        self.translations.insert(key.into(), translation);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.translations.contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.translations.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_objects_flatten_with_dots() {
        let (resource, issues) = Resource::from_json_str(
            "en",
            r#"{"menu": {"file": {"open": "Open"}, "quit": "Quit"}}"#,
            true,
        )
        .unwrap();
        assert!(issues.is_empty());
        assert_eq!(resource.keys(), vec!["menu.file.open", "menu.quit"]);
    }

    #[test]
    fn top_level_must_be_an_object() {
        let error = Resource::from_json_str("en", "[]", true).unwrap_err();
        assert!(matches!(error, LoadError::NotAnObject { found: "array", .. }));
    }

    #[test]
    fn invalid_json_names_the_locale() {
        let error = Resource::from_json_str("de", "{", true).unwrap_err();
        assert!(error.to_string().starts_with("locale de: decode translation JSON"));
    }
}
