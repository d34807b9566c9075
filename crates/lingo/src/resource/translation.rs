//! Compiling JSON leaves into translations.

use serde_json::{Map, Value as JsonValue};

use crate::parser::{Node, parse_template_lenient};
use crate::resource::error::{LoadError, TemplateIssue};

/// Prefix marking the first element of a conditional array.
pub const CONDITION_PREFIX: &str = "if:";

/// Separator between the segments of a flattened key.
pub const KEY_SEPARATOR: char = '.';

/// One compiled message.
///
/// A translation either renders `value` or, when it has no value, the first
/// member of `group` that matches. `condition`, when present, gates both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translation {
    pub condition: Option<Node>,
    pub value: Option<Node>,
    pub group: Vec<Translation>,
}

impl Translation {
    /// An unconditional translation rendering `node`.
    pub fn template(node: Node) -> Self {
        Self {
            condition: None,
            value: Some(node),
            group: Vec::new(),
        }
    }

    /// A first-match-wins group.
    pub fn group(group: Vec<Translation>) -> Self {
        Self {
            condition: None,
            value: None,
            group,
        }
    }

    /// This translation guarded by `condition`. An existing condition is kept
    /// by nesting, so both must hold.
    #[must_use]
    pub fn when(self, condition: Node) -> Self {
        if self.condition.is_some() {
            Self {
                condition: Some(condition),
                value: None,
                group: vec![self],
            }
        } else {
            Self {
                condition: Some(condition),
                ..self
            }
        }
    }

    /// True for a translation that can never render anything.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.group.iter().all(Translation::is_empty)
    }

    /// Every template node of this translation, conditions included.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);
        nodes
    }

    fn collect_nodes<'a>(&'a self, nodes: &mut Vec<&'a Node>) {
        nodes.extend(self.condition.iter());
        nodes.extend(self.value.iter());
        for member in &self.group {
            member.collect_nodes(nodes);
        }
    }
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Compiles the leaves of one locale's JSON document.
///
/// In strict mode the first template with syntax errors fails the load.
/// Otherwise the recovered tree is kept and the problem is collected in
/// `issues`.
pub(crate) struct Compiler<'a> {
    locale: &'a str,
    strict: bool,
    issues: Vec<TemplateIssue>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(locale: &'a str, strict: bool) -> Self {
        Self {
            locale,
            strict,
            issues: Vec::new(),
        }
    }

    pub(crate) fn into_issues(self) -> Vec<TemplateIssue> {
        self.issues
    }

    /// Flattens `object` into `(key, translation)` pairs, joining nested
    /// object keys with `.`.
    pub(crate) fn flatten(
        &mut self,
        prefix: &str,
        object: &Map<String, JsonValue>,
        out: &mut Vec<(String, Translation)>,
    ) -> Result<(), LoadError> {
        for (name, value) in object {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}{KEY_SEPARATOR}{name}")
            };
            match value {
                JsonValue::Object(nested) => self.flatten(&key, nested, out)?,
                leaf => {
                    let translation = self.compile(&key, leaf)?;
                    out.push((key, translation));
                }
            }
        }
        Ok(())
    }

    /// Compiles one leaf: a string, or an array of strings and arrays.
    pub(crate) fn compile(&mut self, key: &str, value: &JsonValue) -> Result<Translation, LoadError> {
        match value {
            JsonValue::String(source) => Ok(Translation::template(self.template(key, source)?)),
            JsonValue::Array(items) => self.compile_array(key, items),
            other => Err(LoadError::UnsupportedValue {
                locale: self.locale.to_string(),
                key: key.to_string(),
                found: json_kind(other),
            }),
        }
    }

    fn compile_array(&mut self, key: &str, items: &[JsonValue]) -> Result<Translation, LoadError> {
        match items {
            [] => Ok(Translation::default()),
            [JsonValue::String(first), rest @ ..] if first.starts_with(CONDITION_PREFIX) => {
                let condition = self.condition(key, &first[CONDITION_PREFIX.len()..])?;
                let Some((gated, others)) = rest.split_first() else {
                    return Ok(Translation::default());
                };
                let gated = self.compile(key, gated)?.when(condition);
                if others.is_empty() {
                    return Ok(gated);
                }
                let mut group = vec![gated];
                for item in others {
                    group.push(self.compile(key, item)?);
                }
                Ok(Translation::group(group))
            }
            [single] => self.compile(key, single),
            items if items.iter().all(JsonValue::is_string) => {
                let lines: Vec<&str> = items.iter().filter_map(JsonValue::as_str).collect();
                Ok(Translation::template(self.template(key, &lines.join("\n"))?))
            }
            items => items
                .iter()
                .map(|item| self.compile(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Translation::group),
        }
    }

    /// A condition is one expression; the braces are optional.
    fn condition(&mut self, key: &str, source: &str) -> Result<Node, LoadError> {
        let source = source.trim();
        let mut template = String::with_capacity(source.len() + 2);
        if !source.starts_with('{') {
            template.push('{');
        }
        template.push_str(source);
        if !source.ends_with('}') {
            template.push('}');
        }
        Ok(match self.template(key, &template)? {
            Node::Root(mut fragments) if !fragments.is_empty() => fragments.swap_remove(0),
            other => other,
        })
    }

    fn template(&mut self, key: &str, source: &str) -> Result<Node, LoadError> {
        let (root, errors) = parse_template_lenient(source);
        if errors.is_empty() {
            return Ok(root);
        }
        let issue = TemplateIssue {
            key: key.to_string(),
            template: source.to_string(),
            errors,
        };
        if self.strict {
            return Err(LoadError::Syntax {
                locale: self.locale.to_string(),
                issue,
            });
        }
        self.issues.push(issue);
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn compile(value: JsonValue) -> Translation {
        Compiler::new("en", true)
            .compile("key", &value)
            .expect("translation compiles")
    }

    #[test]
    fn conditional_pair_gates_its_value() {
        let translation = compile(json!(["if:{n == 1}", "one"]));
        assert!(translation.condition.is_some());
        assert!(translation.value.is_some());
        assert!(translation.group.is_empty());
    }

    #[test]
    fn conditional_with_fallback_is_a_group() {
        let translation = compile(json!(["if:n == 1", "one", "many"]));
        assert!(translation.condition.is_none());
        assert_eq!(translation.group.len(), 2);
        assert!(translation.group[0].condition.is_some());
        assert!(translation.group[1].condition.is_none());
    }

    #[test]
    fn string_lines_are_joined() {
        let translation = compile(json!(["a", "b"]));
        assert_eq!(
            translation.value,
            Some(Node::Root(vec![Node::text("a\nb")]))
        );
    }

    #[test]
    fn empty_arrays_never_match() {
        assert!(compile(json!([])).is_empty());
        assert!(compile(json!(["if:true"])).is_empty());
    }

    #[test]
    fn numbers_are_rejected() {
        let error = Compiler::new("en", true)
            .compile("count", &json!(3))
            .unwrap_err();
        assert!(matches!(
            error,
            LoadError::UnsupportedValue { found: "number", .. }
        ));
    }

    #[test]
    fn lenient_mode_collects_issues() {
        let mut compiler = Compiler::new("en", false);
        let translation = compiler.compile("broken", &json!("a {1 +")).unwrap();
        assert!(translation.value.is_some());
        let issues = compiler.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "broken");
    }
}
