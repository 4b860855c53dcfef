use cel_value::errors;

use super::ExpressionStep;
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// Push a comprehension variable (iteration variable or accumulator).
#[derive(Debug)]
pub struct SlotStep {
    name: String,
    slot_index: usize,
    expr_id: i64,
}

impl SlotStep {
    pub fn new(name: impl Into<String>, slot_index: usize, expr_id: i64) -> Self {
        SlotStep {
            name: name.into(),
            slot_index,
            expr_id,
        }
    }
}

impl ExpressionStep for SlotStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        let factory = frame.value_factory();
        let (value, trail) = match frame.comprehension_slots().get(self.slot_index) {
            Some(slot) => (slot.value.clone(), slot.attribute.clone()),
            None => (
                factory.error(errors::slot_out_of_scope(&self.name)),
                Default::default(),
            ),
        };
        frame.value_stack().push_with_attribute(value, trail);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
