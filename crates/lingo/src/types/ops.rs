//! Arithmetic and comparison between values.
//!
//! Operations are total: every pair of values produces a result. The left
//! operand's type decides how the right one is coerced, so some operations
//! are deliberately asymmetric (`(1 == 1) == 'true'` is false while
//! `'true' == (1 == 1)` is true).

use chrono::TimeDelta;

use crate::types::value::{Value, len_to_int};

/// Numeric view of a pair of operands.
enum Numbers {
    Int(i64, i64),
    Float(f64, f64),
}

impl Numbers {
    /// Floats win if either side is a float; everything else goes through
    /// the integer form.
    fn of(lhs: &Value, rhs: &Value) -> Self {
        if matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_)) {
            Numbers::Float(lhs.as_float(), rhs.as_float())
        } else {
            Numbers::Int(lhs.as_int(), rhs.as_int())
        }
    }
}

/// Longest text, in bytes, that repetition and padding will build. Longer
/// results render as the empty string.
pub const MAX_TEXT_LEN: usize = 1 << 20;

fn repeat(text: &str, count: i64) -> Value {
    let count = usize::try_from(count).unwrap_or(0);
    match text.len().checked_mul(count) {
        Some(len) if len <= MAX_TEXT_LEN => Value::String(text.repeat(count)),
        _ => Value::empty(),
    }
}

impl Value {
    /// `+`: concatenation if either side is text, numeric addition otherwise.
    pub fn plus(&self, rhs: &Value) -> Value {
        if self.is_text() || rhs.is_text() {
            let mut text = self.text().into_owned();
            text.push_str(&rhs.text());
            return Value::String(text);
        }
        match Numbers::of(self, rhs) {
            Numbers::Int(a, b) => Value::Int(a.wrapping_add(b)),
            Numbers::Float(a, b) => Value::Float(a + b),
        }
    }

    pub fn minus(&self, rhs: &Value) -> Value {
        match Numbers::of(self, rhs) {
            Numbers::Int(a, b) => Value::Int(a.wrapping_sub(b)),
            Numbers::Float(a, b) => Value::Float(a - b),
        }
    }

    /// `*`: text repeated by the other side's integer form, numeric
    /// multiplication otherwise. With text on both sides, a left operand
    /// that parses as an integer is the count.
    pub fn times(&self, rhs: &Value) -> Value {
        match (self.is_text(), rhs.is_text()) {
            (true, false) => repeat(&self.text(), rhs.as_int()),
            (false, true) => repeat(&rhs.text(), self.as_int()),
            (true, true) => match self.text().parse::<i64>() {
                Ok(count) => repeat(&rhs.text(), count),
                Err(_) => repeat(&self.text(), rhs.as_int()),
            },
            (false, false) => match Numbers::of(self, rhs) {
                Numbers::Int(a, b) => Value::Int(a.wrapping_mul(b)),
                Numbers::Float(a, b) => Value::Float(a * b),
            },
        }
    }

    /// `/`: division by zero yields zero.
    pub fn divided_by(&self, rhs: &Value) -> Value {
        match Numbers::of(self, rhs) {
            Numbers::Int(_, 0) => Value::Int(0),
            Numbers::Int(a, b) => Value::Int(a.wrapping_div(b)),
            Numbers::Float(_, b) if b == 0.0 => Value::Float(0.0),
            Numbers::Float(a, b) => Value::Float(a / b),
        }
    }

    /// `%`: always integral, a zero divisor yields zero.
    pub fn modulo(&self, rhs: &Value) -> Value {
        match rhs.as_int() {
            0 => Value::Int(0),
            divisor => Value::Int(self.as_int().wrapping_rem(divisor)),
        }
    }

    pub fn equal(&self, rhs: &Value) -> bool {
        match (self, rhs) {
            (Value::Slice(a), Value::Slice(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equal(y))
            }
            (Value::Slice(_), _) | (_, Value::Slice(_)) => false,
            (Value::String(s) | Value::RawString(s), _) => *s == rhs.text(),
            (Value::Float(a), _) => *a == rhs.as_float(),
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (_, Value::Float(b)) => self.as_float() == *b,
            _ => self.as_int() == rhs.as_int(),
        }
    }

    pub fn less(&self, rhs: &Value) -> bool {
        match self {
            Value::Bool(_) => match rhs {
                Value::Bool(_) | Value::Int(_) | Value::Time(_) | Value::Duration(_) => {
                    self.as_int() < rhs.as_int()
                }
                Value::Float(b) => self.as_float() < *b,
                Value::String(_) | Value::RawString(_) | Value::Slice(_) => false,
            },
            Value::Int(_) | Value::Time(_) | Value::Duration(_) => match rhs {
                Value::Bool(_) | Value::Int(_) | Value::Time(_) | Value::Duration(_) => {
                    self.as_int() < rhs.as_int()
                }
                Value::Float(b) => self.as_float() < *b,
                Value::String(_) | Value::RawString(_) => self.text() < rhs.text(),
                Value::Slice(_) => false,
            },
            Value::Float(a) => match rhs {
                Value::String(_) | Value::RawString(_) => self.text() < rhs.text(),
                Value::Slice(_) => false,
                Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::Time(_)
                | Value::Duration(_) => *a < rhs.as_float(),
            },
            Value::String(_) | Value::RawString(_) => match rhs {
                Value::Bool(_) | Value::Slice(_) => false,
                Value::Int(_)
                | Value::Float(_)
                | Value::String(_)
                | Value::RawString(_)
                | Value::Time(_)
                | Value::Duration(_) => self.text() < rhs.text(),
            },
            Value::Slice(items) => match rhs {
                Value::Int(_) | Value::Time(_) | Value::Duration(_) => {
                    len_to_int(items.len()) < rhs.as_int()
                }
                Value::Float(b) => (items.len() as f64) < *b,
                Value::Slice(other) => items.len() < other.len(),
                Value::Bool(_) | Value::String(_) | Value::RawString(_) => false,
            },
        }
    }

    pub fn greater(&self, rhs: &Value) -> bool {
        !self.less(rhs) && !self.equal(rhs)
    }

    pub fn greater_equal(&self, rhs: &Value) -> bool {
        !self.less(rhs) || self.equal(rhs)
    }

    pub fn less_equal(&self, rhs: &Value) -> bool {
        self.less(rhs) || self.equal(rhs)
    }

    /// Unary `-`. Floats and durations keep their type, everything else
    /// negates its integer form.
    pub fn negate(&self) -> Value {
        match self {
            Value::Float(x) => Value::Float(-x),
            Value::Duration(d) => Value::Duration(TimeDelta::zero() - *d),
            other => Value::Int(other.as_int().wrapping_neg()),
        }
    }

    /// Unary `+`. Converts booleans, text and slices to their integer form.
    pub fn unary_plus(&self) -> Value {
        match self {
            Value::Bool(_) | Value::String(_) | Value::RawString(_) | Value::Slice(_) => {
                Value::Int(self.as_int())
            }
            other => other.clone(),
        }
    }

    pub fn logical_not(&self) -> Value {
        Value::Bool(!self.as_bool())
    }
}
