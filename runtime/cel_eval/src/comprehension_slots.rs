//! Storage for comprehension variables.
//!
//! Each nesting depth of a comprehension owns two adjacent slots, the
//! iteration variable at `base + ITER_OFFSET` and the accumulator at
//! `base + ACCU_OFFSET`. Slot indices are assigned when the program is
//! built, so an index past the end is a malformed program and panics.

use cel_value::Value;
use tracing::error;

use crate::attribute_trail::AttributeTrail;

pub const ITER_OFFSET: usize = 0;
pub const ACCU_OFFSET: usize = 1;

#[derive(Clone, Debug)]
pub struct ComprehensionSlot<'a> {
    pub value: Value<'a>,
    pub attribute: AttributeTrail,
}

#[derive(Debug)]
pub struct ComprehensionSlots<'a> {
    slots: Vec<Option<ComprehensionSlot<'a>>>,
}

impl<'a> ComprehensionSlots<'a> {
    pub fn new(size: usize) -> Self {
        ComprehensionSlots {
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// The slot at `index`, or `None` when it is out of scope.
    #[track_caller]
    pub fn get(&self, index: usize) -> Option<&ComprehensionSlot<'a>> {
        self.slot(index).as_ref()
    }

    #[track_caller]
    pub fn set(&mut self, index: usize, value: Value<'a>, attribute: AttributeTrail) {
        *self.slot_mut(index) = Some(ComprehensionSlot { value, attribute });
    }

    #[track_caller]
    pub fn clear(&mut self, index: usize) {
        *self.slot_mut(index) = None;
    }

    #[track_caller]
    fn slot(&self, index: usize) -> &Option<ComprehensionSlot<'a>> {
        match self.slots.get(index) {
            Some(slot) => slot,
            None => out_of_range(index, self.slots.len()),
        }
    }

    #[track_caller]
    fn slot_mut(&mut self, index: usize) -> &mut Option<ComprehensionSlot<'a>> {
        let size = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => slot,
            None => out_of_range(index, size),
        }
    }
}

#[cold]
#[track_caller]
fn out_of_range(index: usize, size: usize) -> ! {
    error!(index, size, "comprehension slot index out of range");
    panic!("comprehension slot index out of range: index {index}, size {size}");
}

#[cfg(test)]
mod tests;
