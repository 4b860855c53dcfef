//! Value construction.
//!
//! [`ValueFactory`] is the single entry point for building values. Scalars
//! are built inline; strings, bytes, and containers are placed according to
//! the factory's [`MemoryManager`].
//!
//! # Arena adoption
//!
//! Bumpalo never runs destructors, so anything stored inside arena memory
//! must not own a refcount. Before a value is placed inside an arena
//! container it is *adopted*: shared strings and bytes are copied into the
//! arena as views, counted containers are copied recursively, and values
//! that cannot be copied (errors, unknowns, counted opaques) are rejected
//! with an error value.

use std::collections::BTreeMap;
use std::sync::Arc;

use bumpalo::Bump;
use chrono::Datelike;
use tracing::trace;

use crate::canonical::CanonicalValues;
use crate::errors::{self, ErrorValue};
use crate::heap::Heap;
use crate::kind::ValueKind;
use crate::list::ListElements;
use crate::map::{MapEntries, MapKey};
use crate::memory::MemoryManager;
use crate::mutable_list::MutableListValue;
use crate::opaque::OpaqueValue;
use crate::recursion::ensure_sufficient_stack;
use crate::structs::StructFields;
use crate::unknown::UnknownValue;
use crate::value::{
    Buffer, BytesValue, Duration, EnumValue, StringValue, Timestamp, TypeValue, Value,
};

/// Largest duration magnitude CEL represents: 10000 years of seconds.
const MAX_DURATION_SECONDS: i64 = 315_576_000_000;

#[derive(Clone, Debug)]
pub struct ValueFactory<'a> {
    memory: MemoryManager<'a>,
    canonical: Arc<CanonicalValues>,
}

impl<'a> ValueFactory<'a> {
    pub fn new(memory: MemoryManager<'a>, canonical: Arc<CanonicalValues>) -> Self {
        ValueFactory { memory, canonical }
    }

    /// A reference-counting factory with its own canonical values.
    pub fn reference_counting() -> ValueFactory<'static> {
        ValueFactory::new(
            MemoryManager::ReferenceCounting,
            Arc::new(CanonicalValues::new()),
        )
    }

    /// A pooling factory allocating into `arena`.
    pub fn pooling(arena: &'a Bump) -> Self {
        ValueFactory::new(
            MemoryManager::Pooling(arena),
            Arc::new(CanonicalValues::new()),
        )
    }

    pub fn memory_manager(&self) -> MemoryManager<'a> {
        self.memory
    }

    pub fn canonical_values(&self) -> &Arc<CanonicalValues> {
        &self.canonical
    }

    // Inline-trivial kinds

    pub fn null(&self) -> Value<'a> {
        Value::Null
    }

    pub fn bool(&self, value: bool) -> Value<'a> {
        Value::Bool(value)
    }

    pub fn int(&self, value: i64) -> Value<'a> {
        Value::Int(value)
    }

    pub fn uint(&self, value: u64) -> Value<'a> {
        Value::Uint(value)
    }

    pub fn double(&self, value: f64) -> Value<'a> {
        Value::Double(value)
    }

    /// Fails outside ±10000 years.
    pub fn duration(&self, value: Duration) -> Result<Value<'a>, ErrorValue> {
        if value.num_seconds().abs() > MAX_DURATION_SECONDS {
            return Err(errors::out_of_range("duration"));
        }
        Ok(Value::Duration(value))
    }

    /// Fails outside years 0001 through 9999.
    pub fn timestamp(&self, value: Timestamp) -> Result<Value<'a>, ErrorValue> {
        if !(1..=9999).contains(&value.year()) {
            return Err(errors::out_of_range("timestamp"));
        }
        Ok(Value::Timestamp(value))
    }

    // Inline-nontrivial kinds

    pub fn string(&self, value: &str) -> Value<'a> {
        Value::String(self.string_buffer(value))
    }

    /// A string sharing an existing buffer; no copy in either memory mode.
    pub fn string_shared(&self, value: Arc<str>) -> Value<'a> {
        Value::String(Buffer::Shared(value))
    }

    pub fn bytes(&self, value: &[u8]) -> Value<'a> {
        let buffer = match self.memory {
            _ if value.is_empty() => Buffer::Shared(Arc::clone(self.canonical.empty_bytes())),
            MemoryManager::ReferenceCounting => Buffer::Shared(Arc::from(value)),
            MemoryManager::Pooling(arena) => Buffer::View(&*arena.alloc_slice_copy(value)),
        };
        Value::Bytes(buffer)
    }

    pub fn enum_value(&self, type_name: &str, number: i64) -> Value<'a> {
        Value::Enum(EnumValue::new(self.string_buffer(type_name), number))
    }

    pub fn type_value(&self, name: &str) -> Value<'a> {
        Value::Type(TypeValue::new(self.string_buffer(name)))
    }

    /// The type value naming `kind`.
    pub fn kind_type(&self, kind: ValueKind) -> Value<'a> {
        Value::Type(TypeValue::new(Buffer::Shared(
            self.canonical.kind_type_name(kind),
        )))
    }

    pub fn error(&self, error: ErrorValue) -> Value<'a> {
        Value::Error(error)
    }

    pub fn unknown(&self, unknown: UnknownValue) -> Value<'a> {
        Value::Unknown(unknown)
    }

    // Heap kinds

    pub fn list(&self, elements: Vec<Value<'a>>) -> Result<Value<'a>, ErrorValue> {
        match self.memory {
            MemoryManager::ReferenceCounting => Ok(Value::List(Heap::Counted(Arc::new(
                ListElements::new(elements),
            )))),
            MemoryManager::Pooling(arena) => self.arena_list(arena, elements),
        }
    }

    /// Fails on a key of invalid kind or a repeated key.
    pub fn map(&self, entries: Vec<(Value<'a>, Value<'a>)>) -> Result<Value<'a>, ErrorValue> {
        let mut sorted = BTreeMap::new();
        for (key, value) in entries {
            let key = MapKey::from_value(&key)?;
            if sorted.contains_key(&key) {
                return Err(errors::duplicate_map_key(&key.to_string()));
            }
            sorted.insert(key, value);
        }
        match self.memory {
            MemoryManager::ReferenceCounting => {
                let entries: Vec<_> = sorted.into_iter().collect();
                Ok(Value::Map(Heap::Counted(Arc::new(MapEntries::from_sorted(
                    entries,
                )))))
            }
            MemoryManager::Pooling(arena) => self.arena_map(arena, sorted),
        }
    }

    pub fn struct_value(
        &self,
        type_name: &str,
        fields: Vec<(&str, Value<'a>)>,
    ) -> Result<Value<'a>, ErrorValue> {
        let type_name = self.string_buffer(type_name);
        let fields = fields
            .into_iter()
            .map(|(name, value)| (self.string_buffer(name), value))
            .collect();
        self.struct_from_parts(type_name, fields)
    }

    pub fn opaque(&self, value: Arc<dyn OpaqueValue<'a> + 'a>) -> Value<'a> {
        Value::Opaque(Heap::Counted(value))
    }

    /// An empty mutable list for list-append accumulation.
    ///
    /// Always reference counted: the builder owns a lock and its elements
    /// change after construction, so it can never live in an arena.
    pub fn list_builder(&self) -> Value<'a> {
        Value::Opaque(Heap::Counted(Arc::new(MutableListValue::new())))
    }

    /// Make `value` storable inside containers of this factory.
    ///
    /// A no-op under reference counting.
    pub fn adopt(&self, value: Value<'a>) -> Result<Value<'a>, ErrorValue> {
        match self.memory {
            MemoryManager::ReferenceCounting => Ok(value),
            MemoryManager::Pooling(arena) => self.adopt_into(arena, value),
        }
    }

    fn string_buffer(&self, value: &str) -> StringValue<'a> {
        match self.memory {
            _ if value.is_empty() => Buffer::Shared(Arc::clone(self.canonical.empty_string())),
            MemoryManager::ReferenceCounting => Buffer::Shared(Arc::from(value)),
            MemoryManager::Pooling(arena) => Buffer::View(&*arena.alloc_str(value)),
        }
    }

    fn struct_from_parts(
        &self,
        type_name: StringValue<'a>,
        fields: Vec<(StringValue<'a>, Value<'a>)>,
    ) -> Result<Value<'a>, ErrorValue> {
        match self.memory {
            MemoryManager::ReferenceCounting => Ok(Value::Struct(Heap::Counted(Arc::new(
                StructFields::new(type_name, fields),
            )))),
            MemoryManager::Pooling(arena) => {
                let type_name = adopt_str(arena, type_name);
                let fields = fields
                    .into_iter()
                    .map(|(name, value)| Ok((adopt_str(arena, name), self.adopt_into(arena, value)?)))
                    .collect::<Result<Vec<_>, ErrorValue>>()?;
                let fields: &'a [(StringValue<'a>, Value<'a>)] = arena.alloc_slice_fill_iter(fields);
                let stored: &'a StructFields<'a, &'a [(StringValue<'a>, Value<'a>)]> =
                    arena.alloc(StructFields::new(type_name, fields));
                Ok(Value::Struct(Heap::Arena(stored)))
            }
        }
    }

    fn arena_list(&self, arena: &'a Bump, elements: Vec<Value<'a>>) -> Result<Value<'a>, ErrorValue> {
        let elements = elements
            .into_iter()
            .map(|element| self.adopt_into(arena, element))
            .collect::<Result<Vec<_>, ErrorValue>>()?;
        let elements: &'a [Value<'a>] = arena.alloc_slice_fill_iter(elements);
        let stored: &'a ListElements<&'a [Value<'a>]> = arena.alloc(ListElements::new(elements));
        Ok(Value::List(Heap::Arena(stored)))
    }

    fn arena_map(
        &self,
        arena: &'a Bump,
        sorted: BTreeMap<MapKey<'a>, Value<'a>>,
    ) -> Result<Value<'a>, ErrorValue> {
        let entries = sorted
            .into_iter()
            .map(|(key, value)| Ok((adopt_key(arena, key), self.adopt_into(arena, value)?)))
            .collect::<Result<Vec<_>, ErrorValue>>()?;
        let entries: &'a [(MapKey<'a>, Value<'a>)] = arena.alloc_slice_fill_iter(entries);
        let stored: &'a MapEntries<&'a [(MapKey<'a>, Value<'a>)]> =
            arena.alloc(MapEntries::from_sorted(entries));
        Ok(Value::Map(Heap::Arena(stored)))
    }

    fn adopt_into(&self, arena: &'a Bump, value: Value<'a>) -> Result<Value<'a>, ErrorValue> {
        ensure_sufficient_stack(|| {
            let kind = value.kind();
            let adopted = match value {
                Value::String(s) => Value::String(adopt_str(arena, s)),
                Value::Bytes(b) => Value::Bytes(adopt_bytes(arena, b)),
                Value::Enum(e) => Value::Enum(EnumValue::new(
                    adopt_str(arena, e.type_name_buffer().clone()),
                    e.number(),
                )),
                Value::Type(t) => Value::Type(TypeValue::new(adopt_str(
                    arena,
                    t.name_buffer().clone(),
                ))),
                Value::Error(_) | Value::Unknown(_) | Value::Opaque(Heap::Counted(_)) => {
                    trace!(%kind, "rejecting arena adoption");
                    return Err(errors::arena_rejected(kind));
                }
                Value::List(Heap::Counted(list)) => {
                    self.arena_list(arena, list.iter().collect())?
                }
                Value::Map(Heap::Counted(map)) => {
                    let mut sorted = BTreeMap::new();
                    for (key, value) in map.entries() {
                        sorted.insert(MapKey::from_value(&key)?, value);
                    }
                    self.arena_map(arena, sorted)?
                }
                Value::Struct(Heap::Counted(s)) => {
                    self.struct_from_parts(Buffer::Shared(Arc::from(s.type_name())), s.fields())?
                }
                other => other,
            };
            Ok(adopted)
        })
    }
}

fn adopt_str<'a>(arena: &'a Bump, s: StringValue<'a>) -> StringValue<'a> {
    match s {
        Buffer::Shared(shared) => Buffer::View(&*arena.alloc_str(&shared)),
        view @ Buffer::View(_) => view,
    }
}

fn adopt_bytes<'a>(arena: &'a Bump, b: BytesValue<'a>) -> BytesValue<'a> {
    match b {
        Buffer::Shared(shared) => Buffer::View(&*arena.alloc_slice_copy(&shared)),
        view @ Buffer::View(_) => view,
    }
}

fn adopt_key<'a>(arena: &'a Bump, key: MapKey<'a>) -> MapKey<'a> {
    match key {
        MapKey::String(s) => MapKey::String(adopt_str(arena, s)),
        other => other,
    }
}

#[cfg(test)]
mod tests;
