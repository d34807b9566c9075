//! Output embedded in JavaScript string literals.

use crate::runtime::Runtime;
use crate::runtime::escape::escape_js;
use crate::runtime::html::{anchor, element, escape_fragments};
use crate::types::Value;

/// Same markup as [`HtmlRuntime`](crate::runtime::HtmlRuntime), escaped for
/// a JavaScript string instead of HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsRuntime;

impl Runtime for JsRuntime {
    fn kind(&self) -> &'static str {
        "js"
    }

    fn bold(&self, value: &Value) -> Value {
        element("b", value, escape_js)
    }

    fn italic(&self, value: &Value) -> Value {
        element("i", value, escape_js)
    }

    fn link(&self, label: &Value, href: &Value, target: &Value) -> Value {
        anchor(label, href, target, escape_js)
    }

    fn post_process(&self, value: &Value) -> String {
        escape_fragments(value, escape_js)
    }
}
