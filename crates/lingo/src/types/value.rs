//! Dynamic values produced and consumed by template evaluation.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::time::Duration as StdDuration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value as JsonValue;

/// The runtime type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int,
    Float,
    String,
    RawString,
    Time,
    Duration,
    Slice,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::RawString => "raw string",
            Type::Time => "time",
            Type::Duration => "duration",
            Type::Slice => "slice",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed template value.
///
/// Every value converts to every other representation. The text rendering
/// is the [`Display`] implementation. `RawString` is text that a markup
/// runtime has already escaped and must pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    RawString(String),
    /// Text form is RFC 3339, numeric form is Unix seconds.
    Time(DateTime<Tz>),
    /// Text form is like `1h2m3.5s`, numeric form is nanoseconds.
    Duration(TimeDelta),
    Slice(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl Value {
    /// The empty string, used for anything missing.
    pub fn empty() -> Self {
        Value::String(String::new())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Value::RawString(text.into())
    }

    pub fn value_type(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::String(_) => Type::String,
            Value::RawString(_) => Type::RawString,
            Value::Time(_) => Type::Time,
            Value::Duration(_) => Type::Duration,
            Value::Slice(_) => Type::Slice,
        }
    }

    /// Whether this is a `String` or `RawString`.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::String(_) | Value::RawString(_))
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) | Value::RawString(s) => !s.is_empty(),
            Value::Time(_) => true,
            Value::Duration(d) => !d.is_zero(),
            Value::Slice(items) => !items.is_empty(),
        }
    }

    /// Integer form. Floats truncate toward zero, text parses as a whole
    /// base-10 integer or yields 0, slices yield their length.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Bool(b) => i64::from(*b),
            Value::Int(i) => *i,
            Value::Float(f) => *f as i64,
            Value::String(s) | Value::RawString(s) => s.parse().unwrap_or(0),
            Value::Time(t) => t.timestamp(),
            Value::Duration(d) => duration_nanos(*d),
            Value::Slice(items) => len_to_int(items.len()),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            Value::Float(f) => *f,
            Value::String(s) | Value::RawString(s) => s.parse().unwrap_or(0.0),
            other => other.as_int() as f64,
        }
    }

    /// Sequence form. Text splits into one string per character, a slice is
    /// itself and anything else is a one-element sequence.
    pub fn as_slice(&self) -> Cow<'_, [Value]> {
        match self {
            Value::Slice(items) => Cow::Borrowed(items),
            Value::String(s) | Value::RawString(s) => {
                Cow::Owned(s.chars().map(|c| Value::String(c.to_string())).collect())
            }
            other => Cow::Owned(vec![other.clone()]),
        }
    }

    /// Borrows the text of a `String` or `RawString` without allocating.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::RawString(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering; borrows when the value already is text.
    pub fn text(&self) -> Cow<'_, str> {
        match self.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(self.to_string()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) | Value::RawString(s) => f.write_str(s),
            Value::Time(t) => f.write_str(&t.to_rfc3339()),
            Value::Duration(d) => f.write_str(&format_duration(*d)),
            Value::Slice(items) => items.iter().try_for_each(|item| write!(f, "{item}")),
        }
    }
}

pub(crate) fn len_to_int(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Nanoseconds in a duration, saturating at the `i64` range.
pub(crate) fn duration_nanos(duration: TimeDelta) -> i64 {
    duration.num_nanoseconds().unwrap_or(if duration < TimeDelta::zero() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Shortest decimal that reads back as `x`. Exponents below -4 or from 21
/// up use scientific notation with a signed, two-digit exponent, e.g.
/// `1e+21` and `1.5e-07`.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let scientific = format!("{x:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return x.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if x != 0.0 && !(-4..21).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        x.to_string()
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Formats a duration as hours, minutes and seconds, e.g. `1h2m3.5s`.
/// Durations under a second use the largest fitting unit of `ms`, `µs`
/// or `ns`.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = i128::from(duration.num_seconds()) * 1_000_000_000
        + i128::from(duration.subsec_nanos());
    if total == 0 {
        return "0s".to_string();
    }
    let sign = if total < 0 { "-" } else { "" };
    let nanos = total.unsigned_abs();

    if nanos < NANOS_PER_SECOND {
        let (unit, scale) = if nanos < 1_000 {
            ("ns", 1)
        } else if nanos < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };
        return format!("{sign}{}{unit}", decimal(nanos, scale));
    }

    let hours = nanos.div_euclid(NANOS_PER_HOUR);
    let minutes = (nanos % NANOS_PER_HOUR).div_euclid(NANOS_PER_MINUTE);
    let seconds = decimal(nanos % NANOS_PER_MINUTE, NANOS_PER_SECOND);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Renders `value / scale` without trailing fractional zeros.
fn decimal(value: u128, scale: u128) -> String {
    let whole = value.div_euclid(scale);
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(len_to_int(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(t: DateTime<Tz>) -> Self {
        Value::Time(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t.with_timezone(&Tz::UTC))
    }
}

impl From<TimeDelta> for Value {
    fn from(d: TimeDelta) -> Self {
        Value::Duration(d)
    }
}

/// Durations beyond the `TimeDelta` range saturate.
impl From<StdDuration> for Value {
    fn from(d: StdDuration) -> Self {
        Value::Duration(TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Slice(items.into_iter().map(Into::into).collect())
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::empty(),
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Slice(items.into_iter().map(Value::from).collect())
            }
            object @ JsonValue::Object(_) => Value::String(object.to_string()),
        }
    }
}

/// Builds a time value from Unix seconds in the given zone.
pub fn time_from_unix(seconds: i64, zone: Tz) -> Option<Value> {
    zone.timestamp_opt(seconds, 0).single().map(Value::Time)
}
