//! CEL Value - the value model of the CEL runtime.
//!
//! Every runtime value is observed through one handle type, [`Value`], a
//! closed enum over the CEL kinds. Each variant stores its payload in one of
//! three localities:
//!
//! - **inline-trivial**: scalars that are plain `Copy` data (`Int`, `Double`, ...)
//! - **inline-nontrivial**: payloads that live in the handle but own or share
//!   a buffer (`String`, `Bytes`, `Error`, `Unknown`, ...)
//! - **heap**: containers behind a [`Heap`], which is either reference
//!   counted (`Arc`) or owned by an arena (`&'a T`)
//!
//! Values are built through a [`ValueFactory`], which picks the heap locality
//! from its [`MemoryManager`].
//!
//! # Errors
//!
//! Error constructors live in [`errors`]; only the error types themselves
//! are re-exported at the crate root.

mod attribute;
mod canonical;
pub mod errors;
mod factory;
mod heap;
mod kind;
mod list;
mod map;
mod memory;
mod mutable_list;
mod opaque;
mod recursion;
mod structs;
mod unknown;
mod value;

pub use attribute::{
    Attribute, AttributePattern, AttributeQualifier, AttributeSet, FunctionResult,
    FunctionResultSet, MatchType, QualifierPattern,
};
pub use canonical::CanonicalValues;
pub use errors::{ErrorValue, Status, StatusCode};
pub use factory::ValueFactory;
pub use heap::Heap;
pub use kind::{Locality, ValueKind};
pub use list::{ListElements, ListValue};
pub use map::{MapEntries, MapKey, MapValue};
pub use memory::{MemoryManagement, MemoryManager};
pub use mutable_list::MutableListValue;
pub use opaque::OpaqueValue;
pub use structs::{StructFields, StructValue};
pub use unknown::UnknownValue;
pub use value::{
    format_double, format_duration, format_timestamp, Buffer, BytesValue, Duration, EnumValue,
    StringValue, Timestamp, TypeValue, Value,
};
