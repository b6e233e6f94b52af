//! Autograd operations with backward passes

use super::data::Value;
use super::function::{call, Function};
use super::variable::Variable;
use crate::error::{Error, Result};
use ndarray::ArrayD;
use std::rc::Rc;

fn ensure_same_shape(x: &ArrayD<f64>, gy: &ArrayD<f64>) -> Result<()> {
    if x.shape() != gy.shape() {
        return Err(Error::ShapeMismatch {
            expected: x.shape().to_vec(),
            got: gy.shape().to_vec(),
        });
    }
    Ok(())
}

/// Element-wise square
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Function for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn forward(&self, x: &ArrayD<f64>) -> Result<Value> {
        Ok(Value::Array(x.mapv(|v| v * v)))
    }

    fn backward(&self, x: &ArrayD<f64>, gy: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        ensure_same_shape(x, gy)?;
        // ∂L/∂x = ∂L/∂y * 2x
        Ok(x * gy * 2.0)
    }
}

/// Square a variable
pub fn square(x: &Variable) -> Result<Variable> {
    call(Rc::new(Square), x)
}

/// Element-wise natural exponential
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl Function for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn forward(&self, x: &ArrayD<f64>) -> Result<Value> {
        Ok(Value::Array(x.mapv(f64::exp)))
    }

    fn backward(&self, x: &ArrayD<f64>, gy: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        ensure_same_shape(x, gy)?;
        // ∂L/∂x = ∂L/∂y * exp(x)
        Ok(x.mapv(f64::exp) * gy)
    }
}

/// Exponentiate a variable
pub fn exp(x: &Variable) -> Result<Variable> {
    call(Rc::new(Exp), x)
}

/// Sum of all elements.
///
/// The forward rule yields a bare scalar; it becomes a 0-d array on the way
/// into the output variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Function for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn forward(&self, x: &ArrayD<f64>) -> Result<Value> {
        Ok(Value::Scalar(x.sum()))
    }

    fn backward(&self, x: &ArrayD<f64>, gy: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        if gy.len() != 1 {
            return Err(Error::ShapeMismatch {
                expected: Vec::new(),
                got: gy.shape().to_vec(),
            });
        }
        let g = gy
            .iter()
            .next()
            .copied()
            .ok_or_else(|| Error::Computation("sum: empty output gradient".to_string()))?;
        // Sum gradient broadcasts to all inputs
        Ok(ArrayD::from_elem(x.raw_dim(), g))
    }
}

/// Sum every element of a variable into a 0-d variable
pub fn sum(x: &Variable) -> Result<Variable> {
    call(Rc::new(Sum), x)
}
