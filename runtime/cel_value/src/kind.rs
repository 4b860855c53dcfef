//! Value kinds and storage localities.

use std::fmt;

/// The closed set of CEL value kinds.
///
/// A value's kind never changes over its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    Duration,
    Timestamp,
    Enum,
    List,
    Map,
    Struct,
    Type,
    Error,
    Unknown,
    Opaque,
}

impl ValueKind {
    pub const ALL: [ValueKind; 17] = [
        ValueKind::Null,
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Uint,
        ValueKind::Double,
        ValueKind::String,
        ValueKind::Bytes,
        ValueKind::Duration,
        ValueKind::Timestamp,
        ValueKind::Enum,
        ValueKind::List,
        ValueKind::Map,
        ValueKind::Struct,
        ValueKind::Type,
        ValueKind::Error,
        ValueKind::Unknown,
        ValueKind::Opaque,
    ];

    /// Canonical kind name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null_type",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Duration => "google.protobuf.Duration",
            ValueKind::Timestamp => "google.protobuf.Timestamp",
            ValueKind::Enum => "enum",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Struct => "struct",
            ValueKind::Type => "type",
            ValueKind::Error => "*error*",
            ValueKind::Unknown => "*unknown*",
            ValueKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a value's payload lives.
///
/// Clone and drop dispatch on locality: trivial payloads are bit copies,
/// nontrivial inline payloads clone their own buffer handle, counted heap
/// payloads bump a refcount, and arena payloads copy a reference whose
/// drop is a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Locality {
    InlineTrivial,
    InlineNonTrivial,
    ReferenceCounted,
    ArenaAllocated,
}

impl Locality {
    /// Whether the payload lives behind a heap handle.
    pub fn is_heap(self) -> bool {
        matches!(self, Locality::ReferenceCounted | Locality::ArenaAllocated)
    }
}
