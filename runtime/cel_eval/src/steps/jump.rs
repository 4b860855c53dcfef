use super::{ExpressionStep, JumpingStep};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Unconditional relative jump. Closes a comprehension's loop body.
#[derive(Debug)]
pub struct JumpStep {
    jump_offset: i32,
    expr_id: i64,
}

impl JumpStep {
    pub fn new(jump_offset: i32, expr_id: i64) -> Self {
        JumpStep {
            jump_offset,
            expr_id,
        }
    }
}

impl ExpressionStep for JumpStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        frame.jump_to(self.jump_offset)
    }

    fn id(&self) -> i64 {
        self.expr_id
    }

    fn comes_from_ast(&self) -> bool {
        false
    }
}

impl JumpingStep for JumpStep {
    fn set_jump_offset(&mut self, offset: i32) {
        self.jump_offset = offset;
    }

    /// A plain jump has no error path.
    fn set_error_jump_offset(&mut self, _offset: i32) {}
}
