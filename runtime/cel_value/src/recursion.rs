//! Native stack guard for walks over nested values.
//!
//! Rendering, equality, and arena adoption recurse once per nesting level of a
//! list, map, or struct. Values arrive from outside the runtime, so nesting
//! depth is unbounded; each recursive frame goes through
//! [`ensure_sufficient_stack`], which grows the stack on demand.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const GROWTH: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    let _ = (RED_ZONE, GROWTH);
    f()
}
