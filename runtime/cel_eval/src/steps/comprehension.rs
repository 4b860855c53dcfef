//! Comprehension steps.
//!
//! A comprehension `iter_range.all(x, cond)` is lowered into a loop that
//! keeps all of its state on the value stack. While the loop runs the top
//! five values form a window, bottom to top:
//!
//! ```text
//! [accu, iter_range, current_index, current_value, loop_step]
//! ```
//!
//! Laid out by the planner as:
//!
//! ```text
//!  0  dummy accu            (const)
//!  1  iter_range
//!  2  current_index = -1    (const)
//!  3  dummy current_value   (const)
//!  4  accu_init             becomes the first loop_step
//!  5  ComprehensionNextStep  exit -> 10, error -> 12
//!  6  loop_condition
//!  7  ComprehensionCondStep  exit -> 10, error -> 12
//!  8  loop_step
//!  9  JumpStep               -> 5
//! 10  result
//! 11  ComprehensionFinishStep
//! ```
//!
//! The iteration variable and accumulator are also published in the
//! frame's comprehension slots so the condition, step and result
//! expressions can read them. Every exit path clears the slots it set.

use cel_value::{errors, AttributeQualifier, Value};

use super::{require, ExpressionStep, JumpingStep};
use crate::comprehension_slots::{ACCU_OFFSET, ITER_OFFSET};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

const WINDOW: usize = 5;
const POS_ITER_RANGE: usize = 1;
const POS_CURRENT_INDEX: usize = 2;
const POS_LOOP_STEP: usize = 4;

/// Advance the loop: commit the last loop step to the accumulator, then
/// either bind the next element or leave through the exit jump.
#[derive(Debug)]
pub struct ComprehensionNextStep {
    iter_slot: usize,
    accu_slot: usize,
    jump_offset: i32,
    error_jump_offset: i32,
    expr_id: i64,
}

impl ComprehensionNextStep {
    pub fn new(slot_base: usize, expr_id: i64) -> Self {
        ComprehensionNextStep {
            iter_slot: slot_base.saturating_add(ITER_OFFSET),
            accu_slot: slot_base.saturating_add(ACCU_OFFSET),
            jump_offset: 0,
            error_jump_offset: 0,
            expr_id,
        }
    }
}

impl ExpressionStep for ComprehensionNextStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "ComprehensionNextStep", WINDOW)?;
        let factory = frame.value_factory();
        let enable_unknowns = frame.enable_unknowns();

        let stack = frame.value_stack();
        let window = stack.get_span(WINDOW);
        let iter_range = window[POS_ITER_RANGE].clone();
        let current_index = window[POS_CURRENT_INDEX].clone();
        let loop_step = window[POS_LOOP_STEP].clone();
        let trails = stack.get_attribute_span(WINDOW);
        let range_trail = trails[POS_ITER_RANGE].clone();
        let loop_step_trail = trails[POS_LOOP_STEP].clone();

        let Some(list) = iter_range.as_list() else {
            let result = if iter_range.is_error_or_unknown() {
                iter_range
            } else {
                factory.error(errors::no_matching_overload("<iter_range>"))
            };
            stack.pop(WINDOW);
            stack.push(result);
            return frame.jump_to(self.error_jump_offset);
        };

        let current_index = match current_index {
            Value::Int(index) => index,
            other => {
                return Err(EvalError::internal(format!(
                    "ComprehensionNextStep: want int, got {}",
                    other.kind()
                )))
            }
        };
        frame.increment_iterations()?;
        let next_index = current_index.checked_add(1).ok_or_else(|| {
            EvalError::internal("ComprehensionNextStep: index overflow")
        })?;
        let (range_trail, iter_trail) = if enable_unknowns {
            let iter_trail = range_trail.step(AttributeQualifier::Int(next_index));
            (range_trail, iter_trail)
        } else {
            (Default::default(), Default::default())
        };
        let element = usize::try_from(next_index)
            .ok()
            .and_then(|index| list.get(index));

        let stack = frame.value_stack();
        stack.pop(WINDOW);
        stack.push_with_attribute(loop_step.clone(), loop_step_trail.clone());
        frame
            .comprehension_slots()
            .set(self.accu_slot, loop_step, loop_step_trail);

        let Some(element) = element else {
            frame.comprehension_slots().clear(self.iter_slot);
            return frame.jump_to(self.jump_offset);
        };

        let stack = frame.value_stack();
        stack.push_with_attribute(iter_range.clone(), range_trail);
        stack.push(Value::Int(next_index));
        stack.push_with_attribute(element.clone(), iter_trail.clone());
        frame
            .comprehension_slots()
            .set(self.iter_slot, element, iter_trail);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }

    fn comes_from_ast(&self) -> bool {
        false
    }
}

impl JumpingStep for ComprehensionNextStep {
    fn set_jump_offset(&mut self, offset: i32) {
        self.jump_offset = offset;
    }

    fn set_error_jump_offset(&mut self, offset: i32) {
        self.error_jump_offset = offset;
    }
}

/// Check the loop condition left on top of the window.
///
/// A false condition leaves the loop early when short-circuiting is on.
#[derive(Debug)]
pub struct ComprehensionCondStep {
    iter_slot: usize,
    accu_slot: usize,
    jump_offset: i32,
    error_jump_offset: i32,
    expr_id: i64,
}

impl ComprehensionCondStep {
    pub fn new(slot_base: usize, expr_id: i64) -> Self {
        ComprehensionCondStep {
            iter_slot: slot_base.saturating_add(ITER_OFFSET),
            accu_slot: slot_base.saturating_add(ACCU_OFFSET),
            jump_offset: 0,
            error_jump_offset: 0,
            expr_id,
        }
    }
}

impl ExpressionStep for ComprehensionCondStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "ComprehensionCondStep", WINDOW)?;
        let factory = frame.value_factory();
        let short_circuiting = frame.enable_short_circuiting();

        let stack = frame.value_stack();
        let condition = match stack.peek() {
            Value::Bool(condition) => *condition,
            other => {
                let result = if other.is_error_or_unknown() {
                    other.clone()
                } else {
                    factory.error(errors::no_matching_overload("<loop_condition>"))
                };
                stack.pop(WINDOW);
                stack.push(result);
                // The error path skips the finish step, so clean up here.
                let slots = frame.comprehension_slots();
                slots.clear(self.iter_slot);
                slots.clear(self.accu_slot);
                return frame.jump_to(self.error_jump_offset);
            }
        };

        stack.pop(1);
        if !condition && short_circuiting {
            stack.pop(3);
            return frame.jump_to(self.jump_offset);
        }
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }

    fn comes_from_ast(&self) -> bool {
        false
    }
}

impl JumpingStep for ComprehensionCondStep {
    fn set_jump_offset(&mut self, offset: i32) {
        self.jump_offset = offset;
    }

    fn set_error_jump_offset(&mut self, offset: i32) {
        self.error_jump_offset = offset;
    }
}

/// Replace the accumulator and result with the result, sealing a list
/// builder if list-append is on.
#[derive(Debug)]
pub struct ComprehensionFinishStep {
    accu_slot: usize,
    expr_id: i64,
}

impl ComprehensionFinishStep {
    pub fn new(slot_base: usize, expr_id: i64) -> Self {
        ComprehensionFinishStep {
            accu_slot: slot_base.saturating_add(ACCU_OFFSET),
            expr_id,
        }
    }
}

impl ExpressionStep for ComprehensionFinishStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "ComprehensionFinishStep", 2)?;
        let factory = frame.value_factory();
        let list_append = frame.enable_comprehension_list_append();

        let stack = frame.value_stack();
        let result = stack.peek().clone();
        stack.pop(2);

        let built = if list_append {
            result
                .as_opaque()
                .and_then(|opaque| opaque.as_list_builder())
                .map(|builder| builder.build(factory).unwrap_or_else(Value::Error))
        } else {
            None
        };
        stack.push(built.unwrap_or(result));
        frame.comprehension_slots().clear(self.accu_slot);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}

/// Replace a map on top of the stack with the list of its keys, so a
/// comprehension over a map iterates its keys.
#[derive(Debug)]
pub struct ListKeysStep {
    expr_id: i64,
}

impl ListKeysStep {
    pub fn new(expr_id: i64) -> Self {
        ListKeysStep { expr_id }
    }
}

impl ExpressionStep for ListKeysStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "ListKeysStep", 1)?;
        let factory = frame.value_factory();
        let enable_unknowns = frame.enable_unknowns();
        let utility = frame.attribute_utility();

        let stack = frame.value_stack();
        let top = stack.peek().clone();
        let Some(map) = top.as_map() else {
            return Ok(());
        };

        if enable_unknowns {
            let unknown = utility.identify_and_merge_unknowns(
                stack.get_span(1),
                stack.get_attribute_span(1),
                true,
            );
            if let Some(unknown) = unknown {
                stack.pop_and_push(factory.unknown(unknown));
                return Ok(());
            }
        }

        let keys = map.list_keys(factory).unwrap_or_else(Value::Error);
        stack.pop_and_push(keys);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }

    fn comes_from_ast(&self) -> bool {
        false
    }
}
