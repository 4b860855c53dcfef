//! Canonical instances shared by every factory.
//!
//! Built once by the embedding host and handed to factories by `Arc`, so
//! the empty buffers and kind type names are allocated a single time per
//! process rather than per value.

use std::sync::Arc;

use crate::kind::ValueKind;

#[derive(Debug)]
pub struct CanonicalValues {
    empty_string: Arc<str>,
    empty_bytes: Arc<[u8]>,
    kind_types: Vec<(ValueKind, Arc<str>)>,
}

impl CanonicalValues {
    pub fn new() -> Self {
        CanonicalValues {
            empty_string: Arc::from(""),
            empty_bytes: Arc::from(&[][..]),
            kind_types: ValueKind::ALL
                .iter()
                .map(|&kind| (kind, Arc::from(kind.name())))
                .collect(),
        }
    }

    pub fn empty_string(&self) -> &Arc<str> {
        &self.empty_string
    }

    pub fn empty_bytes(&self) -> &Arc<[u8]> {
        &self.empty_bytes
    }

    /// Shared type name of `kind`.
    pub fn kind_type_name(&self, kind: ValueKind) -> Arc<str> {
        self.kind_types
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map_or_else(|| Arc::from(kind.name()), |(_, name)| Arc::clone(name))
    }
}

impl Default for CanonicalValues {
    fn default() -> Self {
        CanonicalValues::new()
    }
}
