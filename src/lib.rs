//! # revgrad: reverse-mode automatic differentiation
//!
//! revgrad records a computation graph while functions are applied to
//! [`Variable`]s holding `ndarray` payloads, then walks the graph backward
//! from an output to compute the gradient of every ancestor.
//!
//! ## Architecture
//!
//! - **autograd**: variables, the `Function` contract, primitive operations
//!   and the backward pass
//! - **config**: backward pass options, loadable from YAML
//! - **error**: error taxonomy shared by both

pub mod autograd;
pub mod config;

pub mod error;

// Re-export commonly used types
pub use autograd::{as_array, exp, no_grad, square, sum, Function, Value, Variable};
pub use config::{BackwardOptions, SeedPolicy};
pub use error::{Error, Result};
