//! Errors that stop an evaluation.
//!
//! Failures of the expression itself (a missing key, a bad operand) are
//! values: they are pushed onto the stack as `Value::Error` and routed by
//! error jumps. [`EvalError`] is for the rest: a malformed program that
//! could not run, or a resource limit that aborted the run.

use cel_value::{ErrorValue, StatusCode};
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum EvalError {
    /// A step needed more operands than the stack holds.
    #[error("Value stack underflow in {step}: needed {needed}, available {available}")]
    StackUnderflow {
        step: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Jump address out of range: position: {position}, offset: {offset}, range: {len}")]
    JumpOutOfRange {
        position: usize,
        offset: i32,
        len: usize,
    },

    #[error("{0}")]
    Internal(String),

    /// Evaluation aborted with a user-visible error, e.g. resource
    /// exhaustion. The program surfaces it as the result value.
    #[error("{0}")]
    Value(ErrorValue),
}

impl EvalError {
    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        EvalError::Internal(message.into())
    }

    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, EvalError::Value(error) if error.code() == StatusCode::ResourceExhausted)
    }
}

impl From<ErrorValue> for EvalError {
    fn from(error: ErrorValue) -> Self {
        EvalError::Value(error)
    }
}
