use std::fmt;
use std::sync::Arc;

use cel_value::{Value, ValueFactory};
use smallvec::SmallVec;

use super::{require, ExpressionStep};
use crate::errors::EvalError;
use crate::frame::ExecutionFrame;

/// A callable overload.
///
/// Registries resolving names to functions live with the host; a program
/// holds the resolved function directly.
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    /// Strict functions never see error or unknown arguments: the first
    /// error, or the merged unknowns, become the result without a call.
    fn is_strict(&self) -> bool {
        true
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError>;
}

/// Pop `arg_count` arguments, call the function, push the result.
pub struct FunctionStep {
    function: Arc<dyn Function>,
    arg_count: usize,
    expr_id: i64,
}

impl FunctionStep {
    pub fn new(function: Arc<dyn Function>, arg_count: usize, expr_id: i64) -> Self {
        FunctionStep {
            function,
            arg_count,
            expr_id,
        }
    }
}

impl fmt::Debug for FunctionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionStep")
            .field("function", &self.function.name())
            .field("arg_count", &self.arg_count)
            .field("expr_id", &self.expr_id)
            .finish()
    }
}

impl ExpressionStep for FunctionStep {
    fn evaluate<'a>(&self, frame: &mut ExecutionFrame<'_, 'a>) -> Result<(), EvalError> {
        require(frame, "FunctionStep", self.arg_count)?;
        let factory = frame.value_factory();
        let enable_unknowns = frame.enable_unknowns();
        let utility = frame.attribute_utility();
        let stack = frame.value_stack();
        let args: SmallVec<[Value<'a>; 4]> =
            stack.get_span(self.arg_count).iter().cloned().collect();

        let short_circuited = if self.function.is_strict() {
            let unknown = if enable_unknowns {
                utility.identify_and_merge_unknowns(
                    &args,
                    stack.get_attribute_span(self.arg_count),
                    false,
                )
            } else {
                utility.merge_unknowns(&args)
            };
            match unknown {
                Some(unknown) => Some(factory.unknown(unknown)),
                None => args.iter().find(|arg| arg.is_error()).cloned(),
            }
        } else {
            None
        };

        let result = match short_circuited {
            Some(result) => result,
            None => self.function.invoke(factory, &args)?,
        };
        stack.pop(self.arg_count);
        stack.push(result);
        Ok(())
    }

    fn id(&self) -> i64 {
        self.expr_id
    }
}
