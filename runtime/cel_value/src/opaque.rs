//! Opaque values: host-defined payloads the runtime only passes around.

use std::fmt;

use crate::mutable_list::MutableListValue;

pub trait OpaqueValue<'a>: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    fn debug_string(&self) -> String;

    /// The list builder behind this value, if it is one.
    fn as_list_builder(&self) -> Option<&MutableListValue<'a>> {
        None
    }
}
