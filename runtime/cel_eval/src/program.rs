//! A compiled program: a flat step sequence plus the sizes its frames need.

use cel_value::{Value, ValueFactory};

use crate::activation::Activation;
use crate::errors::EvalError;
use crate::frame::{EvaluationListener, ExecutionFrame};
use crate::options::EvaluationOptions;
use crate::steps::ExpressionStep;

/// Immutable and shareable across threads; every evaluation builds its own
/// frame.
pub struct FlatExpression {
    steps: Vec<Box<dyn ExpressionStep>>,
    max_stack_size: usize,
    comprehension_slots: usize,
    options: EvaluationOptions,
}

impl FlatExpression {
    pub fn new(
        steps: Vec<Box<dyn ExpressionStep>>,
        max_stack_size: usize,
        comprehension_slots: usize,
        options: EvaluationOptions,
    ) -> Self {
        FlatExpression {
            steps,
            max_stack_size,
            comprehension_slots,
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn evaluate<'a>(
        &self,
        activation: &Activation<'a>,
        factory: &ValueFactory<'a>,
    ) -> Result<Value<'a>, EvalError> {
        self.evaluate_with_listener(activation, factory, None)
    }

    /// Evaluate, reporting each expression node's value to `listener`.
    ///
    /// A user-visible abort, such as an exhausted iteration budget, is
    /// returned as an error value; `Err` means the program could not run.
    #[tracing::instrument(level = "debug", skip_all, fields(steps = self.steps.len()))]
    pub fn evaluate_with_listener<'a>(
        &self,
        activation: &Activation<'a>,
        factory: &ValueFactory<'a>,
        listener: Option<EvaluationListener<'_, 'a>>,
    ) -> Result<Value<'a>, EvalError> {
        let mut frame = ExecutionFrame::new(
            &self.steps,
            activation,
            factory,
            &self.options,
            self.max_stack_size,
            self.comprehension_slots,
        );
        match frame.evaluate(listener) {
            Err(EvalError::Value(error)) => {
                tracing::debug!(%error, "evaluation aborted");
                Ok(factory.error(error))
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests;
