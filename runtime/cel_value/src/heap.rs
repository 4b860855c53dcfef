//! Heap handle with two ownership strategies.
//!
//! A [`Heap`] either shares its payload through an `Arc` or borrows it from an
//! arena that outlives `'a`. The two strategies are concrete variants rather
//! than one smart pointer, so the no-op drop of arena payloads is visible in
//! the type: dropping `Heap::Arena` drops a reference and nothing else.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::kind::Locality;

/// Ownership-tagged pointer to a heap payload.
pub enum Heap<'a, T: ?Sized> {
    /// Shared ownership; the payload is deleted when the last handle drops.
    Counted(Arc<T>),
    /// Owned by an arena; the arena performs bulk deallocation.
    Arena(&'a T),
}

impl<'a, T: ?Sized> Heap<'a, T> {
    #[inline]
    pub fn locality(&self) -> Locality {
        match self {
            Heap::Counted(_) => Locality::ReferenceCounted,
            Heap::Arena(_) => Locality::ArenaAllocated,
        }
    }

    /// Whether both handles point at the same payload.
    ///
    /// Compares addresses only, so two trait-object handles with different
    /// vtables for the same allocation still compare equal.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::addr_eq(&**a as *const T, &**b as *const T)
    }

    /// Number of counted handles sharing the payload, `None` for arena payloads.
    pub fn strong_count(this: &Self) -> Option<usize> {
        match this {
            Heap::Counted(arc) => Some(Arc::strong_count(arc)),
            Heap::Arena(_) => None,
        }
    }
}

impl<T: ?Sized> Clone for Heap<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Heap::Counted(arc) => Heap::Counted(Arc::clone(arc)),
            Heap::Arena(reference) => Heap::Arena(reference),
        }
    }
}

impl<T: ?Sized> Deref for Heap<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self {
            Heap::Counted(arc) => arc,
            Heap::Arena(reference) => reference,
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

#[cfg(test)]
mod tests;
