use cel_value::Value;

use super::{require, ExpressionStep};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Pop `entry_count` key/value pairs, pushed key first, and push a map.
#[derive(Debug)]
pub struct CreateMapStep {
    entry_count: usize,
    expr_id: i64,
}

impl CreateMapStep {
    pub fn new(entry_count: usize, expr_id: i64) -> Self {
        CreateMapStep {
            entry_count,
            expr_id,
        }
    }
}

impl ExpressionStep for CreateMapStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        let operands = self.entry_count.checked_mul(2).ok_or_else(|| {
            EvalError::internal(format!("CreateMapStep: too many entries: {}", self.entry_count))
        })?;
        require(frame, "CreateMapStep", operands)?;

        let factory = frame.value_factory();
        let enable_unknowns = frame.enable_unknowns();
        let utility = frame.attribute_utility();
        let stack = frame.value_stack();
        let span = stack.get_span(operands);

        let unknown = if enable_unknowns {
            utility.identify_and_merge_unknowns(span, stack.get_attribute_span(operands), true)
        } else {
            utility.merge_unknowns(span)
        };
        let result = match unknown {
            Some(unknown) => factory.unknown(unknown),
            None => match span.iter().find(|operand| operand.is_error()) {
                Some(error) => error.clone(),
                None => {
                    let entries = span
                        .chunks_exact(2)
                        .map(|pair| (pair[0].clone(), pair[1].clone()))
                        .collect();
                    factory.map(entries).unwrap_or_else(Value::Error)
                }
            },
        };

        stack.pop(operands);
        stack.push(result);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
