//! Define-by-run autograd engine
//!
//! Applying a [`Function`] to a [`Variable`] computes the result and records
//! a [`Creator`] edge on it. [`Variable::backward`] walks those edges from an
//! output back to its leaves, applying the chain rule at every step.
//!
//! ```
//! use ndarray::{arr0, ArrayD};
//! use revgrad::autograd::{as_array, square, Variable};
//!
//! let x = Variable::new(Some(arr0(3.0).into())).unwrap();
//! let y = square(&x).unwrap();
//!
//! y.set_grad(ArrayD::ones(y.data().unwrap().raw_dim())).unwrap();
//! y.backward().unwrap();
//!
//! assert_eq!(y.data().unwrap(), &as_array(9.0.into()));
//! assert_eq!(x.grad().unwrap(), as_array(6.0.into()));
//! ```

mod backward;
mod check;
mod context;
mod data;
mod function;
mod ops;
mod variable;


pub use backward::backward;
pub use check::{max_abs_diff, numerical_diff};
pub use context::{is_grad_enabled, no_grad, set_grad_enabled, NoGradGuard};
pub use data::{as_array, is_array, Value};
pub use function::{call, Creator, Function};
pub use ops::*;
pub use variable::{Variable, VariableId};
