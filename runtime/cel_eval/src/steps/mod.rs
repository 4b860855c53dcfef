//! Instruction steps of a flattened program.
//!
//! A program is a flat sequence of steps that communicate only through the
//! frame's value stack. Control flow is relative jumps; there is no native
//! recursion, so comprehensions of any nesting depth run in constant native
//! stack.
//!
//! # Step Kinds
//!
//! - Leaves: [`ConstStep`], [`IdentStep`], [`SlotStep`]
//! - Access and construction: [`SelectStep`], [`CreateListStep`], [`CreateMapStep`]
//! - Calls: [`FunctionStep`] over a [`Function`]
//! - Control: [`JumpStep`] and the comprehension steps

mod comprehension;
mod const_value;
mod create_list;
mod create_map;
mod function;
mod ident;
mod jump;
mod select;
mod slot;

pub use comprehension::{
    ComprehensionCondStep, ComprehensionFinishStep, ComprehensionNextStep, ListKeysStep,
};
pub use const_value::{ConstStep, Constant};
pub use create_list::CreateListStep;
pub use create_map::CreateMapStep;
pub use function::{Function, FunctionStep};
pub use ident::IdentStep;
pub use jump::JumpStep;
pub use select::SelectStep;
pub use slot::SlotStep;

use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// One instruction.
pub trait ExpressionStep: Send + Sync {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError>;

    /// Id of the expression node this step was generated from.
    fn id(&self) -> i64;

    /// Whether this step computes the value of an expression node, as
    /// opposed to bookkeeping a node's evaluation.
    fn comes_from_ast(&self) -> bool {
        true
    }
}

/// A step whose jump targets are patched after the program is laid out.
pub trait JumpingStep: ExpressionStep {
    fn set_jump_offset(&mut self, offset: i32);

    fn set_error_jump_offset(&mut self, offset: i32);
}

/// Fail with `StackUnderflow` unless `n` values are on the stack.
pub(crate) fn require(
    frame: &mut ExecutionFrame<'_, '_>,
    step: &'static str,
    n: usize,
) -> Result<(), EvalError> {
    let stack = frame.value_stack();
    if stack.has_enough(n) {
        return Ok(());
    }
    Err(EvalError::StackUnderflow {
        step,
        needed: n,
        available: stack.size(),
    })
}
