//! Per-evaluation state and the step loop.

use cel_value::{errors, Value, ValueFactory};
use tracing::{trace, warn};

use crate::activation::Activation;
use crate::attribute_utility::AttributeUtility;
use crate::comprehension_slots::ComprehensionSlots;
use crate::errors::EvalError;
use crate::evaluator_stack::EvaluatorStack;
use crate::options::EvaluationOptions;
use crate::steps::ExpressionStep;

/// Receives `(expression id, value)` after each step that evaluated an
/// expression node.
pub type EvaluationListener<'l, 'a> = &'l mut dyn FnMut(i64, &Value<'a>);

/// Everything one evaluation of a program mutates.
///
/// The frame owns the stack and the comprehension slots; the program's
/// steps, the activation and the factory are borrowed for `'p`. Values live
/// for `'a`, the lifetime of the factory's arena.
pub struct ExecutionFrame<'p, 'a> {
    steps: &'p [Box<dyn ExpressionStep>],
    pc: usize,
    value_stack: EvaluatorStack<'a>,
    comprehension_slots: ComprehensionSlots<'a>,
    activation: &'p Activation<'a>,
    value_factory: &'p ValueFactory<'a>,
    options: &'p EvaluationOptions,
    iterations: u64,
}

impl<'p, 'a> ExecutionFrame<'p, 'a> {
    pub fn new(
        steps: &'p [Box<dyn ExpressionStep>],
        activation: &'p Activation<'a>,
        value_factory: &'p ValueFactory<'a>,
        options: &'p EvaluationOptions,
        max_stack_size: usize,
        comprehension_slots: usize,
    ) -> Self {
        ExecutionFrame {
            steps,
            pc: 0,
            value_stack: EvaluatorStack::new(max_stack_size),
            comprehension_slots: ComprehensionSlots::new(comprehension_slots),
            activation,
            value_factory,
            options,
            iterations: 0,
        }
    }

    #[inline]
    pub fn value_stack(&mut self) -> &mut EvaluatorStack<'a> {
        &mut self.value_stack
    }

    #[inline]
    pub fn comprehension_slots(&mut self) -> &mut ComprehensionSlots<'a> {
        &mut self.comprehension_slots
    }

    #[inline]
    pub fn value_factory(&self) -> &'p ValueFactory<'a> {
        self.value_factory
    }

    #[inline]
    pub fn activation(&self) -> &'p Activation<'a> {
        self.activation
    }

    #[inline]
    pub fn attribute_utility(&self) -> AttributeUtility<'p> {
        AttributeUtility::new(self.activation.unknown_patterns())
    }

    #[inline]
    pub fn enable_unknowns(&self) -> bool {
        self.options.enable_unknowns
    }

    #[inline]
    pub fn enable_comprehension_list_append(&self) -> bool {
        self.options.enable_comprehension_list_append
    }

    #[inline]
    pub fn enable_short_circuiting(&self) -> bool {
        self.options.short_circuiting
    }

    /// Loop advances counted so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Count one comprehension loop advance against the budget.
    pub fn increment_iterations(&mut self) -> Result<(), EvalError> {
        let limit = self.options.comprehension_max_iterations;
        if limit == 0 {
            return Ok(());
        }
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > limit {
            warn!(limit, "comprehension iteration budget exceeded");
            return Err(EvalError::Value(errors::iteration_budget_exceeded(limit)));
        }
        Ok(())
    }

    /// Move the program counter by `offset`, relative to the step after
    /// the current one. Landing one past the last step ends the program.
    pub fn jump_to(&mut self, offset: i32) -> Result<(), EvalError> {
        let len = self.steps.len();
        let target = i64::try_from(self.pc)
            .ok()
            .and_then(|pc| pc.checked_add(i64::from(offset)))
            .and_then(|target| usize::try_from(target).ok())
            .filter(|&target| target <= len);
        match target {
            Some(target) => {
                self.pc = target;
                Ok(())
            }
            None => Err(EvalError::JumpOutOfRange {
                position: self.pc,
                offset,
                len,
            }),
        }
    }

    /// Run the steps from the current position to the end and take the
    /// single value they leave behind.
    pub fn evaluate(
        &mut self,
        mut listener: Option<EvaluationListener<'_, 'a>>,
    ) -> Result<Value<'a>, EvalError> {
        let initial = self.value_stack.size();
        let steps = self.steps;
        while let Some(step) = steps.get(self.pc) {
            self.pc = self.pc.saturating_add(1);
            trace!(id = step.id(), pc = self.pc, "step");
            step.evaluate(self)?;

            if let Some(listener) = listener.as_deref_mut() {
                if step.comes_from_ast() && !self.value_stack.is_empty() {
                    listener(step.id(), self.value_stack.peek());
                }
            }
        }

        if initial.checked_add(1) != Some(self.value_stack.size()) {
            return Err(EvalError::internal(format!(
                "Stack error during evaluation: expected {} values, found {}",
                initial.saturating_add(1),
                self.value_stack.size()
            )));
        }
        let result = self.value_stack.peek().clone();
        self.value_stack.pop(1);
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
