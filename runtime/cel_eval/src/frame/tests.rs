use super::*;
use cel_value::StatusCode;
use pretty_assertions::assert_eq;

use crate::steps::{ConstStep, Constant};

fn steps(n: usize) -> Vec<Box<dyn ExpressionStep>> {
    (0..n)
        .map(|_| Box::new(ConstStep::new(Constant::Null, 1)) as Box<dyn ExpressionStep>)
        .collect()
}

#[test]
fn test_jump_within_bounds() {
    let steps = steps(3);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default();
    let mut frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 4, 0);

    frame.jump_to(3).unwrap();
    frame.jump_to(-3).unwrap();
    frame.jump_to(0).unwrap();
}

#[test]
fn test_jump_out_of_range() {
    let steps = steps(2);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default();
    let mut frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 4, 0);

    let error = frame.jump_to(3).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Jump address out of range: position: 0, offset: 3, range: 2"
    );
    assert!(matches!(
        frame.jump_to(-1),
        Err(EvalError::JumpOutOfRange { offset: -1, .. })
    ));
}

#[test]
fn test_unlimited_iterations() {
    let steps = steps(0);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default();
    let mut frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 1, 0);
    for _ in 0..1_000 {
        frame.increment_iterations().unwrap();
    }
    assert_eq!(frame.iterations(), 0);
}

#[test]
fn test_iteration_budget() {
    let steps = steps(0);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default().with_max_iterations(2);
    let mut frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 1, 0);

    frame.increment_iterations().unwrap();
    frame.increment_iterations().unwrap();
    let error = frame.increment_iterations().unwrap_err();
    assert!(error.is_resource_exhausted());
    let EvalError::Value(value) = error else {
        panic!("expected an error value");
    };
    assert_eq!(value.code(), StatusCode::ResourceExhausted);
}

#[test]
fn test_option_accessors() {
    let steps = steps(0);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default()
        .with_unknowns(true)
        .with_comprehension_list_append(true)
        .with_short_circuiting(false);
    let frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 1, 0);
    assert!(frame.enable_unknowns());
    assert!(frame.enable_comprehension_list_append());
    assert!(!frame.enable_short_circuiting());
}

#[test]
fn test_evaluate_takes_single_result() {
    let steps = steps(1);
    let activation = Activation::new();
    let factory = ValueFactory::reference_counting();
    let options = EvaluationOptions::default();
    let mut frame = ExecutionFrame::new(&steps, &activation, &factory, &options, 1, 0);
    assert_eq!(frame.evaluate(None).unwrap(), Value::Null);
    assert!(frame.value_stack().is_empty());
}
