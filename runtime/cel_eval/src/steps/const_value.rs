use std::sync::Arc;

use cel_value::{Duration, Timestamp, Value};

use super::ExpressionStep;
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// A literal as stored in a program. Materialized through the factory on
/// each evaluation, so pooled evaluations get arena-local copies.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Duration(Duration),
    Timestamp(Timestamp),
}

#[derive(Debug)]
pub struct ConstStep {
    value: Constant,
    expr_id: i64,
    comes_from_ast: bool,
}

impl ConstStep {
    pub fn new(value: Constant, expr_id: i64) -> Self {
        ConstStep {
            value,
            expr_id,
            comes_from_ast: true,
        }
    }

    /// A constant the planner inserted that no expression node evaluates
    /// to, such as a comprehension's initial index.
    pub fn synthetic(value: Constant, expr_id: i64) -> Self {
        ConstStep {
            value,
            expr_id,
            comes_from_ast: false,
        }
    }
}

impl ExpressionStep for ConstStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        let factory = frame.value_factory();
        let value = match &self.value {
            Constant::Null => factory.null(),
            Constant::Bool(b) => factory.bool(*b),
            Constant::Int(i) => factory.int(*i),
            Constant::Uint(u) => factory.uint(*u),
            Constant::Double(d) => factory.double(*d),
            Constant::String(s) => factory.string(s),
            Constant::Bytes(b) => factory.bytes(b),
            Constant::Duration(d) => factory.duration(*d).unwrap_or_else(Value::Error),
            Constant::Timestamp(t) => factory.timestamp(*t).unwrap_or_else(Value::Error),
        };
        frame.value_stack().push(value);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }

    fn comes_from_ast(&self) -> bool {
        self.comes_from_ast
    }
}
