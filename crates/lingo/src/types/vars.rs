//! Named variables passed to a template.

use std::collections::HashMap;
use std::collections::hash_map::Iter;
use std::fmt::{self, Display, Formatter};

use crate::types::value::Value;

/// Variables visible to a template, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vars(HashMap<String, Value>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds variables from `(name, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        pairs.into_iter().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Adds a variable, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Entries ordered by name.
    pub fn sorted(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Vars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Vars(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Vars {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
    }
}

impl<'a> IntoIterator for &'a Vars {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for Vars {
    fn from(map: HashMap<String, Value>) -> Self {
        Vars(map)
    }
}

/// Renders as `{a: 1, b: x}` with names in sorted order.
impl Display for Vars {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Creates [`Vars`] from `name => value` pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// times and nested vectors can be passed directly.
///
/// # Example
///
/// ```
/// use lingo::{Value, vars};
///
/// let v = vars! { "count" => 3, "name" => "Alice" };
/// assert_eq!(v.len(), 2);
/// assert_eq!(v.get("count"), Some(&Value::Int(3)));
/// ```
#[macro_export]
macro_rules! vars {
    {} => {
        $crate::Vars::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut vars = $crate::Vars::new();
            $(
                vars.insert($key, $value);
            )+
            vars
        }
    };
}
