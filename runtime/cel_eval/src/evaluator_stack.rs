//! The value stack shared by all steps of one evaluation.
//!
//! Values and their attribute trails are kept in two parallel vectors that
//! always have the same length. The capacity is computed statically from the
//! program, so overflowing it, or popping more than is there, means the
//! program is malformed: those are contract violations and panic. Steps
//! check [`EvaluatorStack::has_enough`] first and report a shortage as an
//! [`EvalError`](crate::EvalError) instead.

use cel_value::Value;
use tracing::error;

use crate::attribute_trail::AttributeTrail;

#[derive(Debug)]
pub struct EvaluatorStack<'a> {
    values: Vec<Value<'a>>,
    attributes: Vec<AttributeTrail>,
    max_size: usize,
}

impl<'a> EvaluatorStack<'a> {
    pub fn new(max_size: usize) -> Self {
        EvaluatorStack {
            values: Vec::with_capacity(max_size),
            attributes: Vec::with_capacity(max_size),
            max_size,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn attribute_size(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether at least `n` values are on the stack.
    #[inline]
    pub fn has_enough(&self, n: usize) -> bool {
        self.values.len() >= n
    }

    /// The top `n` values, bottom first.
    #[track_caller]
    pub fn get_span(&self, n: usize) -> &[Value<'a>] {
        &self.values[self.span_start(n)..]
    }

    /// Trails of the top `n` values, bottom first.
    #[track_caller]
    pub fn get_attribute_span(&self, n: usize) -> &[AttributeTrail] {
        &self.attributes[self.span_start(n)..]
    }

    #[track_caller]
    pub fn peek(&self) -> &Value<'a> {
        match self.values.last() {
            Some(value) => value,
            None => contract_violation("peek on empty evaluator stack"),
        }
    }

    #[track_caller]
    pub fn peek_attribute(&self) -> &AttributeTrail {
        match self.attributes.last() {
            Some(trail) => trail,
            None => contract_violation("peek on empty evaluator stack"),
        }
    }

    /// Drop the top `n` values.
    #[track_caller]
    pub fn pop(&mut self, n: usize) {
        let start = self.span_start(n);
        self.values.truncate(start);
        self.attributes.truncate(start);
    }

    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: Value<'a>) {
        self.push_with_attribute(value, AttributeTrail::default());
    }

    #[track_caller]
    pub fn push_with_attribute(&mut self, value: Value<'a>, trail: AttributeTrail) {
        if self.values.len() >= self.max_size {
            error!(max_size = self.max_size, "evaluator stack overflow");
            panic!("evaluator stack overflow: max size {}", self.max_size);
        }
        self.values.push(value);
        self.attributes.push(trail);
    }

    /// Replace the top value; its trail becomes empty.
    #[inline]
    #[track_caller]
    pub fn pop_and_push(&mut self, value: Value<'a>) {
        self.pop_and_push_with_attribute(value, AttributeTrail::default());
    }

    #[track_caller]
    pub fn pop_and_push_with_attribute(&mut self, value: Value<'a>, trail: AttributeTrail) {
        match (self.values.last_mut(), self.attributes.last_mut()) {
            (Some(top), Some(top_trail)) => {
                *top = value;
                *top_trail = trail;
            }
            _ => contract_violation("pop_and_push on empty evaluator stack"),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.attributes.clear();
    }

    /// Raise the capacity to at least `capacity`. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.max_size {
            return;
        }
        self.max_size = capacity;
        let additional = capacity.saturating_sub(self.values.len());
        self.values.reserve(additional);
        self.attributes.reserve(additional);
    }

    #[track_caller]
    fn span_start(&self, n: usize) -> usize {
        match self.values.len().checked_sub(n) {
            Some(start) => start,
            None => {
                error!(
                    requested = n,
                    size = self.values.len(),
                    "evaluator stack underflow"
                );
                panic!(
                    "evaluator stack underflow: requested {n}, size {}",
                    self.values.len()
                );
            }
        }
    }
}

#[cold]
#[track_caller]
fn contract_violation(message: &str) -> ! {
    error!("{message}");
    panic!("{message}");
}
