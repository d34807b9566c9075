//! Output runtimes.
//!
//! A runtime implements the builtin functions for one output format. The
//! default method bodies produce Markdown; [`HtmlRuntime`] and
//! [`JsRuntime`] override the markup functions and escape everything that
//! did not come out of a markup function.

mod escape;
mod html;
mod js;

use chrono::{Datelike, Timelike};

pub use escape::{escape_html, escape_js};
pub use html::HtmlRuntime;
pub use js::JsRuntime;

use crate::types::{MAX_TEXT_LEN, Message, Value, Vars, duration_nanos, len_to_int};

/// Builtin function implementations for one output format.
///
/// Missing arguments arrive as the empty string.
pub trait Runtime: Send + Sync {
    /// Short name of the output format, e.g. `"markdown"`.
    fn kind(&self) -> &'static str;

    /// Number of elements in the sequence form of `value`.
    fn length(&self, value: &Value) -> Value {
        Value::Int(len_to_int(value.as_slice().len()))
    }

    fn join(&self, items: &Value, separator: &Value) -> Value {
        let parts: Vec<String> = items.as_slice().iter().map(Value::to_string).collect();
        Value::String(parts.join(&separator.text()))
    }

    /// Splits text on a separator; an empty separator splits into characters.
    fn split(&self, text: &Value, separator: &Value) -> Value {
        let text = text.text();
        let separator = separator.text();
        let parts: Vec<Value> = if separator.is_empty() {
            text.chars().map(|c| Value::String(c.to_string())).collect()
        } else {
            text.split(&*separator).map(Value::from).collect()
        };
        Value::Slice(parts)
    }

    fn bold(&self, value: &Value) -> Value {
        wrap_markup(value, "**", "**")
    }

    fn italic(&self, value: &Value) -> Value {
        wrap_markup(value, "*", "*")
    }

    fn link(&self, label: &Value, href: &Value, _target: &Value) -> Value {
        Value::raw(format!(
            "[{}]({})",
            escape_html(&label.text()),
            escape_html(&href.text())
        ))
    }

    fn pad_left(&self, value: &Value, length: &Value, padding: &Value) -> Value {
        let text = value.text();
        let pad = padding_for(&text, length, padding);
        Value::String(format!("{pad}{text}"))
    }

    fn pad_right(&self, value: &Value, length: &Value, padding: &Value) -> Value {
        let text = value.text();
        let pad = padding_for(&text, length, padding);
        Value::String(format!("{text}{pad}"))
    }

    /// Removes one leading occurrence of `trim`.
    fn trim_left(&self, value: &Value, trim: &Value) -> Value {
        let text = value.text();
        let trim = trim.text();
        Value::from(text.strip_prefix(&*trim).unwrap_or(&text))
    }

    /// Removes one trailing occurrence of `trim`.
    fn trim_right(&self, value: &Value, trim: &Value) -> Value {
        let text = value.text();
        let trim = trim.text();
        Value::from(text.strip_suffix(&*trim).unwrap_or(&text))
    }

    /// Integer part, truncated toward zero.
    fn integer(&self, value: &Value) -> Value {
        Value::Int(value.as_float().trunc() as i64)
    }

    /// Fractional part, rounded to a multiple of `unit` when `unit` is
    /// positive.
    fn fraction(&self, value: &Value, unit: &Value) -> Value {
        let fraction = value.as_float().fract();
        let unit = unit.as_float();
        if unit > 0.0 {
            Value::Float((fraction / unit).round() * unit)
        } else {
            Value::Float(fraction)
        }
    }

    fn abs(&self, value: &Value) -> Value {
        match value {
            Value::Float(x) => Value::Float(x.abs()),
            Value::Duration(d) => Value::Duration(d.abs()),
            other => Value::Int(other.as_int().wrapping_abs()),
        }
    }

    /// Builds the message for a nested translation. `value` and `opt` are
    /// passed through as variables; times and durations are also broken
    /// down into calendar fields.
    fn t(&self, key: &Value, value: &Value, opt: &Value) -> Message {
        let mut vars = Vars::new().with("value", value.clone()).with("opt", opt.clone());
        add_calendar_vars(&mut vars, value);
        Message {
            key: key.to_string(),
            vars,
        }
    }

    /// Final rendering of an evaluated template.
    fn post_process(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// The default runtime, producing Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRuntime;

impl Runtime for MarkdownRuntime {
    fn kind(&self) -> &'static str {
        "markdown"
    }
}

pub static MARKDOWN: MarkdownRuntime = MarkdownRuntime;
pub static HTML: HtmlRuntime = HtmlRuntime;
pub static JS: JsRuntime = JsRuntime;

/// Looks up a built-in runtime by its kind name.
pub fn by_kind(kind: &str) -> Option<&'static dyn Runtime> {
    match kind {
        "markdown" | "md" => Some(&MARKDOWN),
        "html" => Some(&HTML),
        "js" | "javascript" => Some(&JS),
        _ => None,
    }
}

fn wrap_markup(value: &Value, open: &str, close: &str) -> Value {
    let text = value.text();
    if text.is_empty() {
        return Value::raw("");
    }
    Value::raw(format!("{open}{text}{close}"))
}

/// Padding that brings `text` up to `length` characters, cycling through
/// the characters of `padding` (a space when empty).
///
/// Lengths over [`MAX_TEXT_LEN`] add no padding.
fn padding_for(text: &str, length: &Value, padding: &Value) -> String {
    let length = usize::try_from(length.as_int())
        .ok()
        .filter(|length| *length <= MAX_TEXT_LEN)
        .unwrap_or(0);
    let missing = length.saturating_sub(text.chars().count());
    let padding = padding.text();
    let fill = if padding.is_empty() { " " } else { &*padding };
    fill.chars().cycle().take(missing).collect()
}

/// Calendar fields for times, and a years-to-nanoseconds breakdown for
/// durations and integers (read as nanoseconds).
fn add_calendar_vars(vars: &mut Vars, value: &Value) {
    match value {
        Value::Time(t) => {
            vars.insert("year", t.year());
            vars.insert("month", t.month());
            vars.insert("day", t.day());
            vars.insert("weekday", t.format("%A").to_string().to_lowercase());
            vars.insert("hour", t.hour());
            vars.insert("minute", t.minute());
            vars.insert("second", t.second());
            vars.insert("zone_name", t.timezone().name());
            vars.insert("zone_name_short", t.format("%Z").to_string());
            vars.insert("zone_offset", t.format("%:z").to_string());
        }
        Value::Int(_) | Value::Duration(_) => {
            let nanos = match value {
                Value::Duration(d) => duration_nanos(*d),
                other => other.as_int(),
            };
            let hours = nanos as f64 / 3_600_000_000_000.0;
            vars.insert("years", (hours / 24.0 / 365.0) as i64);
            vars.insert("days", ((hours / 24.0) % 365.0) as i64);
            vars.insert("hours", (hours % 24.0) as i64);
            vars.insert("minutes", ((nanos as f64 / 60_000_000_000.0) % 60.0) as i64);
            vars.insert("seconds", ((nanos as f64 / 1_000_000_000.0) % 60.0) as i64);
            vars.insert("millis", nanos.wrapping_div(1_000_000) % 1000);
            vars.insert("micros", nanos.wrapping_div(1_000) % 1000);
            vars.insert("nanos", nanos % 1000);
        }
        Value::Bool(_)
        | Value::Float(_)
        | Value::String(_)
        | Value::RawString(_)
        | Value::Slice(_) => {}
    }
}
