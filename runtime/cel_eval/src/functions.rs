//! Built-in functions.
//!
//! Equality, the logical operators, list concatenation and `size`. The
//! logical operators are non-strict: `true || error` is `true`, so they
//! must see their error and unknown operands instead of being skipped.

use std::sync::Arc;

use cel_value::{errors, UnknownValue, Value, ValueFactory};

use crate::errors::EvalError;
use crate::steps::Function;

/// All built-ins, for hosts assembling a registry.
pub fn builtins() -> Vec<Arc<dyn Function>> {
    vec![
        Arc::new(Equals),
        Arc::new(NotEquals),
        Arc::new(LogicalOr),
        Arc::new(LogicalAnd),
        Arc::new(LogicalNot),
        Arc::new(ListConcat),
        Arc::new(Size),
    ]
}

fn binary<'v, 'a>(
    name: &str,
    args: &'v [Value<'a>],
) -> Result<(&'v Value<'a>, &'v Value<'a>), EvalError> {
    match args {
        [lhs, rhs] => Ok((lhs, rhs)),
        _ => Err(arity(name, 2, args.len())),
    }
}

fn unary<'v, 'a>(name: &str, args: &'v [Value<'a>]) -> Result<&'v Value<'a>, EvalError> {
    match args {
        [operand] => Ok(operand),
        _ => Err(arity(name, 1, args.len())),
    }
}

#[cold]
fn arity(name: &str, expected: usize, found: usize) -> EvalError {
    EvalError::internal(format!(
        "{name}: expected {expected} arguments, got {found}"
    ))
}

/// `_==_`: heterogeneous operands are unequal, not an error.
#[derive(Debug)]
pub struct Equals;

impl Function for Equals {
    fn name(&self) -> &str {
        "_==_"
    }

    fn invoke<'a>(
        &self,
        _factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let (lhs, rhs) = binary(self.name(), args)?;
        Ok(Value::Bool(lhs.equals(rhs)))
    }
}

#[derive(Debug)]
pub struct NotEquals;

impl Function for NotEquals {
    fn name(&self) -> &str {
        "_!=_"
    }

    fn invoke<'a>(
        &self,
        _factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let (lhs, rhs) = binary(self.name(), args)?;
        Ok(Value::Bool(!lhs.equals(rhs)))
    }
}

/// Shared body of `_||_` and `_&&_`.
///
/// `absorbing` decides the result whichever side it appears on. Otherwise
/// unknowns win over errors, and errors win over type mismatches.
fn logical<'a>(
    name: &str,
    absorbing: bool,
    factory: &ValueFactory<'a>,
    args: &[Value<'a>],
) -> Result<Value<'a>, EvalError> {
    let (lhs, rhs) = binary(name, args)?;
    match (lhs, rhs) {
        (Value::Bool(l), _) if *l == absorbing => return Ok(Value::Bool(absorbing)),
        (_, Value::Bool(r)) if *r == absorbing => return Ok(Value::Bool(absorbing)),
        (Value::Bool(_), Value::Bool(_)) => return Ok(Value::Bool(!absorbing)),
        _ => {}
    }
    let unknown = [lhs, rhs]
        .into_iter()
        .filter_map(Value::as_unknown)
        .cloned()
        .reduce(|merged, next| UnknownValue::merge(&merged, &next));
    if let Some(unknown) = unknown {
        return Ok(factory.unknown(unknown));
    }
    if let Some(error) = [lhs, rhs].into_iter().find(|arg| arg.is_error()) {
        return Ok(error.clone());
    }
    Ok(factory.error(errors::no_matching_overload(name)))
}

#[derive(Debug)]
pub struct LogicalOr;

impl Function for LogicalOr {
    fn name(&self) -> &str {
        "_||_"
    }

    fn is_strict(&self) -> bool {
        false
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        logical(self.name(), true, factory, args)
    }
}

#[derive(Debug)]
pub struct LogicalAnd;

impl Function for LogicalAnd {
    fn name(&self) -> &str {
        "_&&_"
    }

    fn is_strict(&self) -> bool {
        false
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        logical(self.name(), false, factory, args)
    }
}

#[derive(Debug)]
pub struct LogicalNot;

impl Function for LogicalNot {
    fn name(&self) -> &str {
        "!_"
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        match unary(self.name(), args)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Ok(factory.error(errors::no_matching_overload(self.name()))),
        }
    }
}

/// `_+_` over lists.
///
/// When the left operand is a list builder (the accumulator of a
/// list-append comprehension) the right operand's elements are appended in
/// place and the builder itself is the result.
#[derive(Debug)]
pub struct ListConcat;

impl Function for ListConcat {
    fn name(&self) -> &str {
        "_+_"
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let (lhs, rhs) = binary(self.name(), args)?;
        let Some(tail) = rhs.as_list() else {
            return Ok(factory.error(errors::no_matching_overload(self.name())));
        };
        if let Some(builder) = lhs.as_opaque().and_then(|opaque| opaque.as_list_builder()) {
            for element in tail.iter() {
                builder.append(element);
            }
            return Ok(lhs.clone());
        }
        let Some(head) = lhs.as_list() else {
            return Ok(factory.error(errors::no_matching_overload(self.name())));
        };
        let elements = head.iter().chain(tail.iter()).collect();
        Ok(factory.list(elements).unwrap_or_else(Value::Error))
    }
}

/// `size` of a string (in code points), bytes, list or map.
#[derive(Debug)]
pub struct Size;

impl Function for Size {
    fn name(&self) -> &str {
        "size"
    }

    fn invoke<'a>(
        &self,
        factory: &ValueFactory<'a>,
        args: &[Value<'a>],
    ) -> Result<Value<'a>, EvalError> {
        let size = match unary(self.name(), args)? {
            Value::String(s) => s.chars().count(),
            Value::Bytes(b) => b.len(),
            Value::List(list) => list.size(),
            Value::Map(map) => map.size(),
            _ => return Ok(factory.error(errors::no_matching_overload(self.name()))),
        };
        Ok(i64::try_from(size)
            .map_or_else(|_| factory.error(errors::out_of_range("size")), Value::Int))
    }
}
