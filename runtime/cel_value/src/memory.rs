//! Memory managers: who owns heap payloads.

use bumpalo::Bump;

/// Ownership strategy for heap values created by a `ValueFactory`.
#[derive(Copy, Clone, Debug)]
pub enum MemoryManager<'a> {
    /// Payloads are `Arc`-shared and freed with their last handle.
    ReferenceCounting,
    /// Payloads live in the arena until it is dropped or reset.
    Pooling(&'a Bump),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryManagement {
    ReferenceCounting,
    Pooling,
}

impl<'a> MemoryManager<'a> {
    pub fn memory_management(&self) -> MemoryManagement {
        match self {
            MemoryManager::ReferenceCounting => MemoryManagement::ReferenceCounting,
            MemoryManager::Pooling(_) => MemoryManagement::Pooling,
        }
    }

    pub fn arena(&self) -> Option<&'a Bump> {
        match self {
            MemoryManager::ReferenceCounting => None,
            MemoryManager::Pooling(arena) => Some(*arena),
        }
    }
}
