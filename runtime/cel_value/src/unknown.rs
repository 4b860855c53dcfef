//! Payload of `Value::Unknown`.

use std::fmt;
use std::sync::Arc;

use crate::attribute::{Attribute, AttributeSet, FunctionResult, FunctionResultSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
struct UnknownSet {
    attributes: AttributeSet,
    function_results: FunctionResultSet,
}

/// A not-yet-computable value: the attributes and function results it
/// depends on. Shared and immutable; merging builds a new set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UnknownValue(Arc<UnknownSet>);

impl UnknownValue {
    pub fn new(attributes: AttributeSet, function_results: FunctionResultSet) -> Self {
        UnknownValue(Arc::new(UnknownSet {
            attributes,
            function_results,
        }))
    }

    pub fn from_attribute(attribute: Attribute) -> Self {
        UnknownValue::new(
            std::iter::once(attribute).collect(),
            FunctionResultSet::new(),
        )
    }

    pub fn from_function_result(result: FunctionResult) -> Self {
        UnknownValue::new(AttributeSet::new(), std::iter::once(result).collect())
    }

    pub fn attribute_set(&self) -> &AttributeSet {
        &self.0.attributes
    }

    pub fn function_result_set(&self) -> &FunctionResultSet {
        &self.0.function_results
    }

    /// Union of both sets of `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: &UnknownValue) -> UnknownValue {
        if Arc::ptr_eq(&self.0, &other.0) {
            return self.clone();
        }
        let mut merged = UnknownSet::clone(&self.0);
        merged.attributes.extend(&other.0.attributes);
        merged.function_results.extend(&other.0.function_results);
        UnknownValue(Arc::new(merged))
    }
}

impl fmt::Debug for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnknownValue")
            .field("attributes", &self.0.attributes)
            .field("function_results", &self.0.function_results)
            .finish()
    }
}
