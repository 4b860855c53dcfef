//! The value handle.
//!
//! # Localities
//!
//! | Variant                                      | Locality            |
//! |----------------------------------------------|---------------------|
//! | `Null` `Bool` `Int` `Uint` `Double` `Duration` `Timestamp` | inline-trivial |
//! | `String` `Bytes` `Enum` `Type` `Error` `Unknown` | inline-nontrivial |
//! | `List` `Map` `Struct` `Opaque`               | heap (counted or arena) |
//!
//! `Clone` dispatches on the variant: trivial payloads are copied, string and
//! bytes buffers bump their `Arc` or copy their view, and heap handles follow
//! [`Heap`]'s rules. Drop is the compiler-generated per-variant drop, so the
//! last counted handle deletes its payload and arena handles drop nothing.
//!
//! # Equality
//!
//! Scalars compare by value (doubles with IEEE semantics). Lists, maps, and
//! structs compare by content with a shared-payload fast path. Opaque values
//! compare by identity. Errors compare by status, unknowns by their sets.
//! Mismatched kinds are never equal.

mod format;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

pub use format::{format_double, format_duration, format_timestamp};

use crate::errors::ErrorValue;
use crate::heap::Heap;
use crate::kind::{Locality, ValueKind};
use crate::list::ListValue;
use crate::map::MapValue;
use crate::opaque::OpaqueValue;
use crate::recursion::ensure_sufficient_stack;
use crate::structs::StructValue;
use crate::unknown::UnknownValue;

/// CEL `google.protobuf.Duration`; may be negative.
pub type Duration = chrono::TimeDelta;

/// CEL `google.protobuf.Timestamp`, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Buffer payload of inline-nontrivial values: either shared through an
/// `Arc` or viewed from memory that outlives `'a` (usually an arena).
pub enum Buffer<'a, T: ?Sized> {
    Shared(Arc<T>),
    View(&'a T),
}

pub type StringValue<'a> = Buffer<'a, str>;
pub type BytesValue<'a> = Buffer<'a, [u8]>;

impl<T: ?Sized> Buffer<'_, T> {
    pub fn is_view(&self) -> bool {
        matches!(self, Buffer::View(_))
    }
}

impl<T: ?Sized> Clone for Buffer<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Buffer::Shared(arc) => Buffer::Shared(Arc::clone(arc)),
            Buffer::View(view) => Buffer::View(view),
        }
    }
}

impl<T: ?Sized> Deref for Buffer<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self {
            Buffer::Shared(arc) => arc,
            Buffer::View(view) => view,
        }
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Buffer<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: ?Sized + Eq> Eq for Buffer<'_, T> {}

impl<T: ?Sized + PartialOrd> PartialOrd for Buffer<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: ?Sized + Ord> Ord for Buffer<'_, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: ?Sized + Hash> Hash for Buffer<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Buffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<'a> From<&'a str> for StringValue<'a> {
    fn from(view: &'a str) -> Self {
        Buffer::View(view)
    }
}

impl From<Arc<str>> for StringValue<'_> {
    fn from(shared: Arc<str>) -> Self {
        Buffer::Shared(shared)
    }
}

/// Enum constant: its enum type plus numeric value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue<'a> {
    type_name: StringValue<'a>,
    number: i64,
}

impl<'a> EnumValue<'a> {
    pub fn new(type_name: StringValue<'a>, number: i64) -> Self {
        EnumValue { type_name, number }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn type_name_buffer(&self) -> &StringValue<'a> {
        &self.type_name
    }

    pub fn number(&self) -> i64 {
        self.number
    }
}

/// A type as a first-class value, identified by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeValue<'a>(StringValue<'a>);

impl<'a> TypeValue<'a> {
    pub fn new(name: StringValue<'a>) -> Self {
        TypeValue(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub(crate) fn name_buffer(&self) -> &StringValue<'a> {
        &self.0
    }
}

/// Runtime value of the CEL runtime.
///
/// Heap variants are built through `ValueFactory`, which chooses between a
/// counted and an arena handle.
#[derive(Clone)]
pub enum Value<'a> {
    // Inline, trivially copyable
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    Duration(Duration),
    Timestamp(Timestamp),

    // Inline, owning or sharing a buffer
    String(StringValue<'a>),
    Bytes(BytesValue<'a>),
    Enum(EnumValue<'a>),
    Type(TypeValue<'a>),
    Error(ErrorValue),
    Unknown(UnknownValue),

    // Heap
    List(Heap<'a, dyn ListValue<'a> + 'a>),
    Map(Heap<'a, dyn MapValue<'a> + 'a>),
    Struct(Heap<'a, dyn StructValue<'a> + 'a>),
    Opaque(Heap<'a, dyn OpaqueValue<'a> + 'a>),
}

impl<'a> Value<'a> {
    /// A string value viewing `s`.
    pub fn string_view(s: &'a str) -> Self {
        Value::String(Buffer::View(s))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Double(_) => ValueKind::Double,
            Value::Duration(_) => ValueKind::Duration,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Enum(_) => ValueKind::Enum,
            Value::Type(_) => ValueKind::Type,
            Value::Error(_) => ValueKind::Error,
            Value::Unknown(_) => ValueKind::Unknown,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Struct(_) => ValueKind::Struct,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn locality(&self) -> Locality {
        match self {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Uint(_)
            | Value::Double(_)
            | Value::Duration(_)
            | Value::Timestamp(_) => Locality::InlineTrivial,
            Value::String(_)
            | Value::Bytes(_)
            | Value::Enum(_)
            | Value::Type(_)
            | Value::Error(_)
            | Value::Unknown(_) => Locality::InlineNonTrivial,
            Value::List(heap) => heap.locality(),
            Value::Map(heap) => heap.locality(),
            Value::Struct(heap) => heap.locality(),
            Value::Opaque(heap) => heap.locality(),
        }
    }

    // Type tests

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    pub fn is_uint(&self) -> bool {
        matches!(self, Value::Uint(_))
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    #[inline]
    pub fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(_))
    }

    #[inline]
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self, Value::Enum(_))
    }

    #[inline]
    pub fn is_type(&self) -> bool {
        matches!(self, Value::Type(_))
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    pub fn is_struct(&self) -> bool {
        matches!(self, Value::Struct(_))
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque(_))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    /// Errors and unknowns propagate through most operations unchanged.
    #[inline]
    pub fn is_error_or_unknown(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Unknown(_))
    }

    // Accessors

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&(dyn ListValue<'a> + 'a)> {
        match self {
            Value::List(list) => Some(&**list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&(dyn MapValue<'a> + 'a)> {
        match self {
            Value::Map(map) => Some(&**map),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&(dyn StructValue<'a> + 'a)> {
        match self {
            Value::Struct(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&(dyn OpaqueValue<'a> + 'a)> {
        match self {
            Value::Opaque(o) => Some(&**o),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_unknown(&self) -> Option<&UnknownValue> {
        match self {
            Value::Unknown(u) => Some(u),
            _ => None,
        }
    }

    // Checked casts
    //
    // Callers test the kind first; a mismatch is a bug in the caller.

    #[track_caller]
    pub fn cast_bool(&self) -> bool {
        self.as_bool()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Bool))
    }

    #[track_caller]
    pub fn cast_int(&self) -> i64 {
        self.as_int()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Int))
    }

    #[track_caller]
    pub fn cast_uint(&self) -> u64 {
        self.as_uint()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Uint))
    }

    #[track_caller]
    pub fn cast_double(&self) -> f64 {
        self.as_double()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Double))
    }

    #[track_caller]
    pub fn cast_str(&self) -> &str {
        self.as_str()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::String))
    }

    #[track_caller]
    pub fn cast_bytes(&self) -> &[u8] {
        self.as_bytes()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Bytes))
    }

    #[track_caller]
    pub fn cast_list(&self) -> &(dyn ListValue<'a> + 'a) {
        self.as_list()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::List))
    }

    #[track_caller]
    pub fn cast_map(&self) -> &(dyn MapValue<'a> + 'a) {
        self.as_map()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Map))
    }

    #[track_caller]
    pub fn cast_struct(&self) -> &(dyn StructValue<'a> + 'a) {
        self.as_struct()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Struct))
    }

    #[track_caller]
    pub fn cast_opaque(&self) -> &(dyn OpaqueValue<'a> + 'a) {
        self.as_opaque()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Opaque))
    }

    #[track_caller]
    pub fn cast_error(&self) -> &ErrorValue {
        self.as_error()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Error))
    }

    #[track_caller]
    pub fn cast_unknown(&self) -> &UnknownValue {
        self.as_unknown()
            .unwrap_or_else(|| self.kind_mismatch(ValueKind::Unknown))
    }

    #[cold]
    #[track_caller]
    fn kind_mismatch(&self, want: ValueKind) -> ! {
        panic!("value kind mismatch: want {want}, got {}", self.kind())
    }

    /// Canonical textual rendering.
    pub fn debug_string(&self) -> String {
        self.to_string()
    }

    /// Per-kind equality; `false` across mismatched kinds.
    pub fn equals(&self, other: &Value<'a>) -> bool {
        ensure_sufficient_stack(|| self.equals_inner(other))
    }

    fn equals_inner(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "CEL double equality is IEEE equality")]
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Unknown(a), Value::Unknown(b)) => a == b,
            (Value::List(a), Value::List(b)) => Heap::ptr_eq(a, b) || lists_equal(&**a, &**b),
            (Value::Map(a), Value::Map(b)) => Heap::ptr_eq(a, b) || maps_equal(&**a, &**b),
            (Value::Struct(a), Value::Struct(b)) => {
                Heap::ptr_eq(a, b) || structs_equal(&**a, &**b)
            }
            (Value::Opaque(a), Value::Opaque(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn lists_equal<'a>(a: &(dyn ListValue<'a> + 'a), b: &(dyn ListValue<'a> + 'a)) -> bool {
    a.size() == b.size() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(&y))
}

fn maps_equal<'a>(a: &(dyn MapValue<'a> + 'a), b: &(dyn MapValue<'a> + 'a)) -> bool {
    a.size() == b.size()
        && a.entries().iter().all(|(key, value)| match b.get(key) {
            Ok(Some(other)) => value.equals(&other),
            _ => false,
        })
}

fn structs_equal<'a>(a: &(dyn StructValue<'a> + 'a), b: &(dyn StructValue<'a> + 'a)) -> bool {
    if a.type_name() != b.type_name() {
        return false;
    }
    let fields = a.fields();
    fields.len() == b.fields().len()
        && fields
            .iter()
            .all(|(name, value)| b.get_field(name).is_some_and(|other| value.equals(&other)))
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
