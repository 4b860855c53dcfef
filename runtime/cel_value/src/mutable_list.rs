//! Mutable list used as the accumulator of list-building comprehensions.
//!
//! Appending to an immutable list inside a loop copies the list on every
//! iteration. When list-append is enabled the accumulator starts as a
//! [`MutableListValue`] instead; the loop appends in place, and the
//! comprehension's finish step seals it into an ordinary list.

use parking_lot::Mutex;

use crate::errors::ErrorValue;
use crate::factory::ValueFactory;
use crate::opaque::OpaqueValue;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct MutableListValue<'a> {
    elements: Mutex<Vec<Value<'a>>>,
}

impl<'a> MutableListValue<'a> {
    pub fn new() -> Self {
        MutableListValue::default()
    }

    pub fn append(&self, value: Value<'a>) {
        self.elements.lock().push(value);
    }

    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }

    /// Move the accumulated elements into an immutable list.
    ///
    /// The builder is left empty.
    pub fn build(&self, factory: &ValueFactory<'a>) -> Result<Value<'a>, ErrorValue> {
        let elements = std::mem::take(&mut *self.elements.lock());
        factory.list(elements)
    }
}

impl<'a> OpaqueValue<'a> for MutableListValue<'a> {
    fn type_name(&self) -> &str {
        "list"
    }

    fn debug_string(&self) -> String {
        let elements = self.elements.lock();
        let rendered: Vec<String> = elements.iter().map(Value::debug_string).collect();
        format!("[{}]", rendered.join(", "))
    }

    fn as_list_builder(&self) -> Option<&MutableListValue<'a>> {
        Some(self)
    }
}
