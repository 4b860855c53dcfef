//! Struct capability and the built-in struct storage.

use std::fmt;

use crate::value::{StringValue, Value};

/// A message-like value with named fields.
pub trait StructValue<'a>: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    /// Value of a set field.
    fn get_field(&self, name: &str) -> Option<Value<'a>>;

    /// Set fields, in declaration order.
    fn fields(&self) -> Vec<(StringValue<'a>, Value<'a>)>;

    fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }
}

/// Struct storage as a field list; `Vec` when counted, arena slice when pooled.
#[derive(Debug)]
pub struct StructFields<'a, C> {
    type_name: StringValue<'a>,
    fields: C,
}

impl<'a, C> StructFields<'a, C> {
    pub(crate) fn new(type_name: StringValue<'a>, fields: C) -> Self {
        StructFields { type_name, fields }
    }
}

impl<'a, C> StructValue<'a> for StructFields<'a, C>
where
    C: AsRef<[(StringValue<'a>, Value<'a>)]> + fmt::Debug + Send + Sync,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_field(&self, name: &str) -> Option<Value<'a>> {
        self.fields
            .as_ref()
            .iter()
            .find(|(field, _)| &**field == name)
            .map(|(_, value)| value.clone())
    }

    fn fields(&self) -> Vec<(StringValue<'a>, Value<'a>)> {
        self.fields.as_ref().to_vec()
    }
}
