//! User-domain error values.
//!
//! Errors raised by CEL expressions are ordinary values: they flow through
//! the evaluator stack and are routed by error jumps, never unwound natively.
//! An [`ErrorValue`] wraps a shared [`Status`].
//!
//! Factory functions (e.g. [`no_matching_overload`]) are the public API for
//! building errors, so message wording stays consistent across the runtime.

use std::fmt;
use std::sync::Arc;

use crate::kind::ValueKind;

/// Status category of an error value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatusCode {
    InvalidArgument,
    NotFound,
    OutOfRange,
    ResourceExhausted,
    Internal,
    Unknown,
    Unimplemented,
}

impl StatusCode {
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::OutOfRange => "OUT_OF_RANGE",
            StatusCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unknown => "UNKNOWN",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
        }
    }
}

/// Code plus message carried by an error value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Status {
    pub code: StatusCode,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.message)
    }
}

/// Payload of `Value::Error`.
///
/// The status is shared, so copying an error value is a refcount bump.
/// Two error values are equal when their statuses are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ErrorValue(Arc<Status>);

impl ErrorValue {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        ErrorValue(Arc::new(Status {
            code,
            message: message.into(),
        }))
    }

    #[inline]
    pub fn status(&self) -> &Status {
        &self.0
    }

    #[inline]
    pub fn code(&self) -> StatusCode {
        self.0.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0.message
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorValue({})", self.0)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorValue {}

// Overload resolution

/// No overload accepts the operand kinds; `name` identifies the operation.
#[cold]
pub fn no_matching_overload(name: &str) -> ErrorValue {
    ErrorValue::new(
        StatusCode::Unknown,
        format!("No matching overloads found : {name}"),
    )
}

// Lookup errors

#[cold]
pub fn no_such_key(key: &str) -> ErrorValue {
    ErrorValue::new(StatusCode::NotFound, format!("Key not found in map : {key}"))
}

#[cold]
pub fn no_such_field(field: &str) -> ErrorValue {
    ErrorValue::new(StatusCode::NotFound, format!("no_such_field : {field}"))
}

#[cold]
pub fn no_such_variable(name: &str) -> ErrorValue {
    ErrorValue::new(
        StatusCode::Unknown,
        format!("No value with name \"{name}\" found in Activation"),
    )
}

/// A comprehension variable was read outside the loop that binds it.
#[cold]
pub fn slot_out_of_scope(name: &str) -> ErrorValue {
    ErrorValue::new(
        StatusCode::Internal,
        format!("comprehension variable accessed out of scope: {name}"),
    )
}

// Construction errors

#[cold]
pub fn invalid_map_key_type(kind: ValueKind) -> ErrorValue {
    ErrorValue::new(
        StatusCode::InvalidArgument,
        format!("Invalid map key type: '{kind}'"),
    )
}

#[cold]
pub fn duplicate_map_key(key: &str) -> ErrorValue {
    ErrorValue::new(
        StatusCode::InvalidArgument,
        format!("Failed with repeated key : {key}"),
    )
}

/// A value could not be adopted into an arena-owned container.
#[cold]
pub fn arena_rejected(kind: ValueKind) -> ErrorValue {
    ErrorValue::new(
        StatusCode::InvalidArgument,
        format!("value of kind '{kind}' cannot be stored in an arena-owned container"),
    )
}

/// A duration or timestamp outside the representable CEL range.
#[cold]
pub fn out_of_range(what: &str) -> ErrorValue {
    ErrorValue::new(StatusCode::OutOfRange, format!("{what} out of range"))
}

// Resource limits

#[cold]
pub fn iteration_budget_exceeded(limit: u64) -> ErrorValue {
    ErrorValue::new(
        StatusCode::ResourceExhausted,
        format!("Iteration budget exceeded: {limit}"),
    )
}
