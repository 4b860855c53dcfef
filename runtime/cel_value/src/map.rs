//! Map capability, map keys, and the built-in map storage.

use std::fmt;

use crate::errors::{self, ErrorValue};
use crate::factory::ValueFactory;
use crate::value::{StringValue, Value};

/// A map key. CEL restricts keys to bool, int, uint, and string.
///
/// Keys order by kind first (`bool < int < uint < string`), then by value,
/// which fixes the iteration order of built-in maps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(StringValue<'a>),
}

impl<'a> MapKey<'a> {
    pub fn from_value(value: &Value<'a>) -> Result<Self, ErrorValue> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Int(i) => Ok(MapKey::Int(*i)),
            Value::Uint(u) => Ok(MapKey::Uint(*u)),
            Value::String(s) => Ok(MapKey::String(s.clone())),
            other => Err(errors::invalid_map_key_type(other.kind())),
        }
    }

    pub fn to_value(&self) -> Value<'a> {
        match self {
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(i) => Value::Int(*i),
            MapKey::Uint(u) => Value::Uint(*u),
            MapKey::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for MapKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

/// Read-only map capability consumed by the evaluator.
pub trait MapValue<'a>: fmt::Debug + Send + Sync {
    fn size(&self) -> usize;

    /// Value stored under `key`.
    ///
    /// Fails only when `key` is not a valid map key kind.
    fn get(&self, key: &Value<'a>) -> Result<Option<Value<'a>>, ErrorValue>;

    /// All entries, in the map's iteration order.
    fn entries(&self) -> Vec<(Value<'a>, Value<'a>)>;

    fn has(&self, key: &Value<'a>) -> Result<bool, ErrorValue> {
        Ok(self.get(key)?.is_some())
    }

    /// The map's keys as a list value.
    fn list_keys(&self, factory: &ValueFactory<'a>) -> Result<Value<'a>, ErrorValue> {
        factory.list(self.entries().into_iter().map(|(key, _)| key).collect())
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Map storage as entries sorted by key, looked up by binary search.
///
/// Construction goes through `ValueFactory::map`, which sorts the entries
/// and rejects duplicate keys.
#[derive(Debug)]
pub struct MapEntries<C>(C);

impl<C> MapEntries<C> {
    pub(crate) fn from_sorted(entries: C) -> Self {
        MapEntries(entries)
    }
}

impl<'a, C> MapValue<'a> for MapEntries<C>
where
    C: AsRef<[(MapKey<'a>, Value<'a>)]> + fmt::Debug + Send + Sync,
{
    fn size(&self) -> usize {
        self.0.as_ref().len()
    }

    fn get(&self, key: &Value<'a>) -> Result<Option<Value<'a>>, ErrorValue> {
        let key = MapKey::from_value(key)?;
        let entries = self.0.as_ref();
        Ok(entries
            .binary_search_by(|(probe, _)| probe.cmp(&key))
            .ok()
            .map(|index| entries[index].1.clone()))
    }

    fn entries(&self) -> Vec<(Value<'a>, Value<'a>)> {
        self.0
            .as_ref()
            .iter()
            .map(|(key, value)| (key.to_value(), value.clone()))
            .collect()
    }
}
