//! Finite difference utilities for gradient verification.

use super::context::no_grad;
use super::variable::Variable;
use crate::error::{Error, Result};
use ndarray::{ArrayD, Dimension};

fn scalar_output(y: &Variable) -> Result<f64> {
    let data = y.require_data()?;
    if data.len() != 1 {
        return Err(Error::ShapeMismatch {
            expected: Vec::new(),
            got: data.shape().to_vec(),
        });
    }
    data.iter()
        .next()
        .copied()
        .ok_or_else(|| Error::Computation("empty output".to_string()))
}

/// Numerical gradient of a scalar-valued `f` at `x` by central differences:
/// f'(x) ≈ (f(x + h) - f(x - h)) / (2h)
///
/// `f` is evaluated with recording disabled and must return a variable
/// holding exactly one element.
///
/// # Example
/// ```
/// use ndarray::arr1;
/// use revgrad::autograd::{numerical_diff, square, sum};
///
/// let x = arr1(&[3.0, -1.0]).into_dyn();
/// let grad = numerical_diff(|v| sum(&square(v)?), &x, 1e-6).unwrap();
///
/// assert!((grad[0] - 6.0).abs() < 1e-4);
/// assert!((grad[1] + 2.0).abs() < 1e-4);
/// ```
pub fn numerical_diff<F>(f: F, x: &ArrayD<f64>, eps: f64) -> Result<ArrayD<f64>>
where
    F: Fn(&Variable) -> Result<Variable>,
{
    if !(eps > 0.0 && eps.is_finite()) {
        return Err(Error::Computation(format!(
            "finite difference step must be positive, got {eps}"
        )));
    }

    let _guard = no_grad();
    let eval = |p: &ArrayD<f64>| -> Result<f64> {
        let y = f(&Variable::from_array(p.clone()))?;
        scalar_output(&y)
    };

    let mut grad = ArrayD::zeros(x.raw_dim());
    let mut perturbed = x.clone();

    for (idx, g) in grad.indexed_iter_mut() {
        let index = idx.slice();
        let original = x[index];

        perturbed[index] = original + eps;
        let f_plus = eval(&perturbed)?;

        perturbed[index] = original - eps;
        let f_minus = eval(&perturbed)?;

        perturbed[index] = original;

        *g = (f_plus - f_minus) / (2.0 * eps);
    }

    Ok(grad)
}

/// Maximum absolute element-wise difference between two gradients
pub fn max_abs_diff(a: &ArrayD<f64>, b: &ArrayD<f64>) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            expected: a.shape().to_vec(),
            got: b.shape().to_vec(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max))
}
