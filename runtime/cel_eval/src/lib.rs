#![deny(clippy::arithmetic_side_effects)]
//! CEL Eval - the stack-based evaluator of the CEL runtime.
//!
//! A program is a [`FlatExpression`]: a flat list of [`ExpressionStep`]s
//! that communicate through the value stack of an [`ExecutionFrame`].
//! Control flow, including comprehension loops, is expressed as relative
//! jumps, so evaluation never recurses natively.
//!
//! # Architecture
//!
//! - `EvaluatorStack`: values and their attribute trails, in lockstep
//! - `ComprehensionSlots`: iteration variable and accumulator per loop depth
//! - `AttributeUtility`: unknown detection against the activation's patterns
//! - `steps`: the instruction set, including the comprehension state machine
//! - `functions`: built-in overloads called through `FunctionStep`
//!
//! Values come from `cel_value`; this crate only moves them around.

mod activation;
mod attribute_trail;
mod attribute_utility;
mod comprehension_slots;
pub mod errors;
mod evaluator_stack;
mod frame;
pub mod functions;
mod options;
mod program;
pub mod steps;

use std::sync::Once;

pub use activation::Activation;
pub use attribute_trail::AttributeTrail;
pub use attribute_utility::AttributeUtility;
pub use comprehension_slots::{ComprehensionSlot, ComprehensionSlots, ACCU_OFFSET, ITER_OFFSET};
pub use errors::EvalError;
pub use evaluator_stack::EvaluatorStack;
pub use frame::{EvaluationListener, ExecutionFrame};
pub use options::EvaluationOptions;
pub use program::FlatExpression;
pub use steps::{ExpressionStep, Function, JumpingStep};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=cel_eval=debug`, or
/// `trace` to log every step.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
