//! Translatable messages.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::global;
use crate::types::value::Value;
use crate::types::vars::Vars;

/// A translation key plus the variables its template needs.
///
/// Messages double as error values: [`Display`] renders the message through
/// the global catalog in its error locale, falling back to
/// [`Message::debug_string`] when no translation exists. Two messages are
/// equal when their keys are.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub key: String,
    pub vars: Vars,
}

impl Message {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            vars: Vars::new(),
        }
    }

    /// Parses a `context:key` identifier. The context, when present, is
    /// passed to the template as the `context` variable.
    pub fn from_id(id: &str) -> Self {
        match id.split_once(':') {
            Some((context, key)) => Message::new(key).with("context", context),
            None => Message::new(id),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_vars(mut self, vars: Vars) -> Self {
        self.vars.extend(vars.iter().map(|(name, value)| (name.clone(), value.clone())));
        self
    }

    /// `key` alone, or `key: {name: value, ...}` when variables are set.
    pub fn debug_string(&self) -> String {
        if self.vars.is_empty() {
            self.key.clone()
        } else {
            format!("{}: {}", self.key, self.vars)
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Message {}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&global::catalog().render_error(self))
    }
}

impl Error for Message {}
