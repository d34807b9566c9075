//! HTML output.

use crate::runtime::Runtime;
use crate::runtime::escape::escape_html;
use crate::types::Value;

/// Emits `<b>`, `<i>` and `<a>` markup and HTML-escapes every fragment that
/// is not already markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRuntime;

impl Runtime for HtmlRuntime {
    fn kind(&self) -> &'static str {
        "html"
    }

    fn bold(&self, value: &Value) -> Value {
        element("b", value, escape_html)
    }

    fn italic(&self, value: &Value) -> Value {
        element("i", value, escape_html)
    }

    fn link(&self, label: &Value, href: &Value, target: &Value) -> Value {
        anchor(label, href, target, escape_html)
    }

    fn post_process(&self, value: &Value) -> String {
        escape_fragments(value, escape_html)
    }
}

pub(super) fn element(tag: &str, value: &Value, escape: fn(&str) -> String) -> Value {
    let text = value.text();
    if text.is_empty() {
        return Value::raw("");
    }
    Value::raw(format!("<{tag}>{}</{tag}>", escape(&text)))
}

pub(super) fn anchor(
    label: &Value,
    href: &Value,
    target: &Value,
    escape: fn(&str) -> String,
) -> Value {
    let target = target.text();
    let target = if target.is_empty() {
        String::new()
    } else {
        format!(" target=\"{}\"", escape(&target))
    };
    Value::raw(format!(
        "<a href=\"{}\"{target}>{}</a>",
        escape(&href.text()),
        escape(&label.text())
    ))
}

/// Escapes a value fragment by fragment, leaving raw strings untouched.
pub(super) fn escape_fragments(value: &Value, escape: fn(&str) -> String) -> String {
    match value {
        Value::RawString(markup) => markup.clone(),
        Value::Slice(items) => items
            .iter()
            .map(|item| escape_fragments(item, escape))
            .collect(),
        other => escape(&other.text()),
    }
}
