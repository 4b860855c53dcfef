//! Variable bindings for one evaluation.

use cel_value::{AttributePattern, Value};
use rustc_hash::FxHashMap;

/// Values bound to top-level variable names, plus the attribute patterns
/// the host treats as unknown.
#[derive(Debug, Default)]
pub struct Activation<'a> {
    bindings: FxHashMap<String, Value<'a>>,
    unknown_patterns: Vec<AttributePattern>,
}

impl<'a> Activation<'a> {
    pub fn new() -> Self {
        Activation::default()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn insert_value(&mut self, name: impl Into<String>, value: Value<'a>) {
        self.bindings.insert(name.into(), value);
    }

    pub fn find_variable(&self, name: &str) -> Option<&Value<'a>> {
        self.bindings.get(name)
    }

    pub fn add_unknown_pattern(&mut self, pattern: AttributePattern) {
        self.unknown_patterns.push(pattern);
    }

    pub fn unknown_patterns(&self) -> &[AttributePattern] {
        &self.unknown_patterns
    }
}
