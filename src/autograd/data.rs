//! Numeric payloads and scalar-to-array coercion

use ndarray::{arr0, Array, ArrayD, Dimension};

/// A numeric value as produced by a forward rule or handed to a constructor.
///
/// Variables only ever store arrays. A bare scalar has to go through
/// [`as_array`] before it can become a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Array(ArrayD<f64>),
}

impl Value {
    /// Human readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "f64 scalar",
            Value::Array(_) => "ndarray::ArrayD<f64>",
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl<D: Dimension> From<Array<f64, D>> for Value {
    fn from(a: Array<f64, D>) -> Self {
        Value::Array(a.into_dyn())
    }
}

/// Wrap a bare scalar into a zero-dimensional array; arrays pass through.
pub fn as_array(x: Value) -> ArrayD<f64> {
    match x {
        Value::Scalar(s) => arr0(s).into_dyn(),
        Value::Array(a) => a,
    }
}

/// Whether `x` is already a valid payload container
pub fn is_array(x: &Value) -> bool {
    matches!(x, Value::Array(_))
}
