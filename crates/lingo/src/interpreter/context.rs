//! Evaluation context for tracking state during recursive evaluation.

use crate::interpreter::EvalError;
use crate::resource::Resource;
use crate::runtime::Runtime;
use crate::types::{Value, Vars};

/// Default ceiling for nested evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Evaluation context carrying state through recursive evaluation.
///
/// The context tracks:
/// - The runtime that implements the builtins
/// - The locale, used by `plural`
/// - Variables available to identifiers
/// - The locale's resource, used by nested `t` calls
/// - Recursion depth, shared with nested translations
pub struct EvalContext<'a> {
    runtime: &'a dyn Runtime,
    locale: &'a str,
    vars: &'a Vars,
    resource: Option<&'a Resource>,
    depth: usize,
    max_depth: usize,
}

impl<'a> EvalContext<'a> {
    /// Create a context without resources; `t` then renders as empty.
    pub fn new(runtime: &'a dyn Runtime, locale: &'a str, vars: &'a Vars) -> Self {
        Self {
            runtime,
            locale,
            vars,
            resource: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Make `resource` available to nested `t` calls.
    #[must_use]
    pub fn with_resource(mut self, resource: &'a Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// A context for a nested translation: same runtime, locale and
    /// resource, its own variables, and the current depth carried over.
    pub fn nested<'b>(&'b self, vars: &'b Vars) -> EvalContext<'b> {
        EvalContext {
            runtime: self.runtime,
            locale: self.locale,
            vars,
            resource: self.resource,
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }

    pub fn runtime(&self) -> &'a dyn Runtime {
        self.runtime
    }

    pub fn locale(&self) -> &'a str {
        self.locale
    }

    pub fn resource(&self) -> Option<&'a Resource> {
        self.resource
    }

    /// Get a variable value.
    pub fn var(&self, name: &str) -> Option<&'a Value> {
        self.vars.get(name)
    }

    /// Enter one level of nesting.
    pub fn descend(&mut self) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::MaxDepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of nesting.
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Get current recursion depth.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
