use super::*;
use std::sync::Arc;

use bumpalo::Bump;
use cel_value::{AttributePattern, Locality, StatusCode};
use pretty_assertions::assert_eq;

use crate::functions::{Equals, Size};
use crate::steps::{
    ConstStep, Constant, CreateListStep, CreateMapStep, FunctionStep, IdentStep, JumpStep,
    SelectStep,
};

fn boxed(step: impl ExpressionStep + 'static) -> Box<dyn ExpressionStep> {
    Box::new(step)
}

fn string(s: &str) -> Box<dyn ExpressionStep> {
    boxed(ConstStep::new(Constant::String(Arc::from(s)), 1))
}

fn program(steps: Vec<Box<dyn ExpressionStep>>) -> FlatExpression {
    FlatExpression::new(steps, 8, 0, EvaluationOptions::default())
}

#[test]
fn test_constant_program() {
    let program = program(vec![boxed(ConstStep::new(Constant::Int(42), 1))]);
    assert_eq!(program.len(), 1);
    let factory = ValueFactory::reference_counting();
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(result, Value::Int(42));
}

#[test]
fn test_stack_imbalance_is_internal() {
    let program = program(vec![
        boxed(ConstStep::new(Constant::Int(1), 1)),
        boxed(ConstStep::new(Constant::Int(2), 2)),
    ]);
    let factory = ValueFactory::reference_counting();
    let error = program.evaluate(&Activation::new(), &factory).unwrap_err();
    let EvalError::Internal(message) = error else {
        panic!("expected an internal error");
    };
    assert!(message.starts_with("Stack error during evaluation"));
}

#[test]
fn test_empty_program_is_imbalanced() {
    let program = program(vec![]);
    assert!(program.is_empty());
    let factory = ValueFactory::reference_counting();
    assert!(program.evaluate(&Activation::new(), &factory).is_err());
}

#[test]
fn test_jump_out_of_range() {
    let program = program(vec![boxed(JumpStep::new(5, 1))]);
    let factory = ValueFactory::reference_counting();
    let error = program.evaluate(&Activation::new(), &factory).unwrap_err();
    assert!(matches!(
        error,
        EvalError::JumpOutOfRange {
            position: 1,
            offset: 5,
            len: 1
        }
    ));
}

#[test]
fn test_jump_skips_steps() {
    let program = program(vec![
        boxed(JumpStep::new(1, 1)),
        boxed(ConstStep::new(Constant::Int(1), 2)),
        boxed(ConstStep::new(Constant::Int(2), 3)),
    ]);
    let factory = ValueFactory::reference_counting();
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_underflow_is_reported() {
    let program = program(vec![boxed(FunctionStep::new(Arc::new(Equals), 2, 1))]);
    let factory = ValueFactory::reference_counting();
    let error = program.evaluate(&Activation::new(), &factory).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Value stack underflow in FunctionStep: needed 2, available 0"
    );
}

#[test]
fn test_listener_sees_ast_steps() {
    let program = program(vec![
        boxed(ConstStep::synthetic(Constant::Int(1), 1)),
        boxed(ConstStep::new(Constant::Int(2), 2)),
        boxed(FunctionStep::new(Arc::new(Equals), 2, 3)),
    ]);
    let factory = ValueFactory::reference_counting();
    let mut seen = Vec::new();
    let mut listener = |id: i64, value: &Value<'_>| seen.push((id, value.debug_string()));
    let result = program
        .evaluate_with_listener(&Activation::new(), &factory, Some(&mut listener))
        .unwrap();
    assert_eq!(result, Value::Bool(false));
    assert_eq!(
        seen,
        vec![(2, "2".to_owned()), (3, "false".to_owned())]
    );
}

#[test]
fn test_ident_and_missing_variable() {
    let factory = ValueFactory::reference_counting();
    let mut activation = Activation::new();
    activation.insert_value("x", factory.string("hello"));

    let found = program(vec![boxed(IdentStep::new("x", 1))]);
    assert_eq!(
        found.evaluate(&activation, &factory).unwrap().debug_string(),
        "\"hello\""
    );

    let missing = program(vec![boxed(IdentStep::new("y", 1))]);
    let result = missing.evaluate(&activation, &factory).unwrap();
    assert_eq!(
        result.as_error().unwrap().message(),
        "No value with name \"y\" found in Activation"
    );
}

#[test]
fn test_ident_unknown_pattern() {
    let options = EvaluationOptions::default().with_unknowns(true);
    let program = FlatExpression::new(vec![boxed(IdentStep::new("x", 1))], 1, 0, options);
    let factory = ValueFactory::reference_counting();
    let mut activation = Activation::new();
    activation.insert_value("x", Value::Int(1));
    activation.add_unknown_pattern(AttributePattern::new("x"));

    let result = program.evaluate(&activation, &factory).unwrap();
    assert!(result.is_unknown());
}

#[test]
fn test_select_from_map_and_struct() {
    let factory = ValueFactory::reference_counting();
    let mut activation = Activation::new();
    activation.insert_value(
        "m",
        factory.map(vec![(factory.string("a"), Value::Int(1))]).unwrap(),
    );
    activation.insert_value(
        "p",
        factory
            .struct_value("test.Point", vec![("x", Value::Int(3))])
            .unwrap(),
    );

    let cases = [
        ("m", "a", false, "1"),
        ("m", "a", true, "true"),
        ("m", "b", true, "false"),
        ("m", "b", false, "NOT_FOUND: Key not found in map : b"),
        ("p", "x", false, "3"),
        ("p", "y", true, "false"),
        ("p", "y", false, "NOT_FOUND: no_such_field : y"),
    ];
    for (var, field, test_only, expected) in cases {
        let program = program(vec![
            boxed(IdentStep::new(var, 1)),
            boxed(SelectStep::new(field, test_only, 2)),
        ]);
        let result = program.evaluate(&activation, &factory).unwrap();
        assert_eq!(result.debug_string(), expected, "{var}.{field}");
    }
}

#[test]
fn test_select_on_scalar_and_error() {
    let factory = ValueFactory::reference_counting();
    let scalar = program(vec![
        boxed(ConstStep::new(Constant::Int(1), 1)),
        boxed(SelectStep::new("a", false, 2)),
    ]);
    let result = scalar.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(
        result.as_error().unwrap().message(),
        "No matching overloads found : <select>"
    );

    let missing = program(vec![
        boxed(IdentStep::new("nope", 1)),
        boxed(SelectStep::new("a", false, 2)),
    ]);
    let result = missing.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(
        result.as_error().unwrap().message(),
        "No value with name \"nope\" found in Activation"
    );
}

#[test]
fn test_select_unknown_field() {
    let options = EvaluationOptions::default().with_unknowns(true);
    let program = FlatExpression::new(
        vec![
            boxed(IdentStep::new("req", 1)),
            boxed(SelectStep::new("auth", false, 2)),
        ],
        2,
        0,
        options,
    );
    let factory = ValueFactory::reference_counting();
    let mut activation = Activation::new();
    activation.insert_value(
        "req",
        factory.map(vec![(factory.string("auth"), Value::Null)]).unwrap(),
    );
    activation.add_unknown_pattern(AttributePattern::new("req").field("auth"));

    let result = program.evaluate(&activation, &factory).unwrap();
    let unknown = result.as_unknown().unwrap();
    let rendered: Vec<String> = unknown
        .attribute_set()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["req.auth".to_owned()]);
}

#[test]
fn test_create_map_and_size() {
    let program = program(vec![
        string("a"),
        boxed(ConstStep::new(Constant::Int(1), 2)),
        string("b"),
        boxed(ConstStep::new(Constant::Int(2), 3)),
        boxed(CreateMapStep::new(2, 4)),
        boxed(FunctionStep::new(Arc::new(Size), 1, 5)),
    ]);
    let factory = ValueFactory::reference_counting();
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_create_map_rejects_repeated_keys() {
    let program = program(vec![
        string("a"),
        boxed(ConstStep::new(Constant::Int(1), 2)),
        string("a"),
        boxed(ConstStep::new(Constant::Int(2), 3)),
        boxed(CreateMapStep::new(2, 4)),
    ]);
    let factory = ValueFactory::reference_counting();
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(
        result.as_error().unwrap().code(),
        StatusCode::InvalidArgument
    );
}

#[test]
fn test_create_list_propagates_first_error() {
    let program = program(vec![
        boxed(ConstStep::new(Constant::Int(1), 1)),
        boxed(IdentStep::new("missing", 2)),
        boxed(CreateListStep::new(2, 3)),
    ]);
    let factory = ValueFactory::reference_counting();
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert!(result.is_error());
}

#[test]
fn test_pooled_constants_live_in_arena() {
    let program = program(vec![
        string("x"),
        boxed(ConstStep::new(Constant::Bytes(Arc::from(&b"y"[..])), 2)),
        boxed(CreateListStep::new(2, 3)),
    ]);
    let arena = Bump::new();
    let factory = ValueFactory::pooling(&arena);
    let result = program.evaluate(&Activation::new(), &factory).unwrap();
    assert_eq!(result.locality(), Locality::ArenaAllocated);
    assert_eq!(result.debug_string(), "[\"x\", b\"y\"]");
}

#[test]
fn test_resource_exhaustion_is_a_value() {
    let error = EvalError::Value(cel_value::errors::iteration_budget_exceeded(1));
    assert!(error.is_resource_exhausted());
    assert!(!EvalError::internal("boom").is_resource_exhausted());
}
