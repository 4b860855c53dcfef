use cel_value::errors;

use super::ExpressionStep;
use crate::attribute_trail::AttributeTrail;
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Push the value of a top-level variable from the activation.
#[derive(Debug)]
pub struct IdentStep {
    name: String,
    expr_id: i64,
}

impl IdentStep {
    pub fn new(name: impl Into<String>, expr_id: i64) -> Self {
        IdentStep {
            name: name.into(),
            expr_id,
        }
    }
}

impl ExpressionStep for IdentStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        let factory = frame.value_factory();
        let trail = if frame.enable_unknowns() {
            AttributeTrail::new(&self.name)
        } else {
            AttributeTrail::default()
        };
        let utility = frame.attribute_utility();
        let value = match trail.attribute() {
            Some(attribute) if utility.check_for_unknown(&trail, false) => {
                factory.unknown(utility.create_unknown_set(attribute))
            }
            _ => match frame.activation().find_variable(&self.name) {
                Some(value) => value.clone(),
                None => factory.error(errors::no_such_variable(&self.name)),
            },
        };
        frame.value_stack().push_with_attribute(value, trail);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
