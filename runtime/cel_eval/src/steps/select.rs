use cel_value::{errors, AttributeQualifier, Value};

use super::{require, ExpressionStep};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Select a field of a struct or a string key of a map: `operand.field`.
///
/// In test-only mode this is the `has()` macro and yields a bool.
#[derive(Debug)]
pub struct SelectStep {
    field: String,
    test_only: bool,
    expr_id: i64,
}

impl SelectStep {
    pub fn new(field: impl Into<String>, test_only: bool, expr_id: i64) -> Self {
        SelectStep {
            field: field.into(),
            test_only,
            expr_id,
        }
    }

    fn select<'a>(&self, frame: &ExecutionFrame<'_, 'a>, operand: &Value<'a>) -> Value<'a> {
        let factory = frame.value_factory();
        match operand {
            Value::Map(map) => {
                let key = factory.string(&self.field);
                let found = if self.test_only {
                    map.has(&key).map(Value::Bool)
                } else {
                    map.get(&key).map(|value| {
                        value.unwrap_or_else(|| Value::Error(errors::no_such_key(&self.field)))
                    })
                };
                found.unwrap_or_else(Value::Error)
            }
            Value::Struct(s) if self.test_only => Value::Bool(s.has_field(&self.field)),
            Value::Struct(s) => s
                .get_field(&self.field)
                .unwrap_or_else(|| Value::Error(errors::no_such_field(&self.field))),
            _ => factory.error(errors::no_matching_overload("<select>")),
        }
    }
}

impl ExpressionStep for SelectStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "SelectStep", 1)?;
        let operand = frame.value_stack().peek().clone();
        if operand.is_error_or_unknown() {
            return Ok(());
        }

        let trail = frame
            .value_stack()
            .peek_attribute()
            .step(AttributeQualifier::field(&self.field));
        let utility = frame.attribute_utility();
        if let Some(attribute) = trail.attribute() {
            if frame.enable_unknowns() && utility.check_for_unknown(&trail, false) {
                let unknown = frame
                    .value_factory()
                    .unknown(utility.create_unknown_set(attribute));
                frame.value_stack().pop_and_push_with_attribute(unknown, trail);
                return Ok(());
            }
        }

        let result = self.select(frame, &operand);
        let trail = if self.test_only { Default::default() } else { trail };
        frame.value_stack().pop_and_push_with_attribute(result, trail);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
