use cel_value::Value;

use super::{require, ExpressionStep};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Pop `element_count` values and push them as a list.
#[derive(Debug)]
pub struct CreateListStep {
    element_count: usize,
    as_builder: bool,
    expr_id: i64,
}

impl CreateListStep {
    pub fn new(element_count: usize, expr_id: i64) -> Self {
        CreateListStep {
            element_count,
            as_builder: false,
            expr_id,
        }
    }

    /// The empty accumulator of a list-building comprehension: pushes a
    /// mutable list builder instead of an immutable list.
    pub fn builder(expr_id: i64) -> Self {
        CreateListStep {
            element_count: 0,
            as_builder: true,
            expr_id,
        }
    }
}

impl ExpressionStep for CreateListStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "CreateListStep", self.element_count)?;
        let factory = frame.value_factory();
        if self.as_builder {
            frame.value_stack().push(factory.list_builder());
            return Ok(());
        }

        let enable_unknowns = frame.enable_unknowns();
        let utility = frame.attribute_utility();
        let stack = frame.value_stack();
        let elements = stack.get_span(self.element_count);

        let unknown = if enable_unknowns {
            utility.identify_and_merge_unknowns(
                elements,
                stack.get_attribute_span(self.element_count),
                true,
            )
        } else {
            utility.merge_unknowns(elements)
        };
        let result = match unknown {
            Some(unknown) => factory.unknown(unknown),
            None => match elements.iter().find(|element| element.is_error()) {
                Some(error) => error.clone(),
                None => factory.list(elements.to_vec()).unwrap_or_else(Value::Error),
            },
        };

        stack.pop(self.element_count);
        stack.push(result);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
