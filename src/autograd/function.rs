//! Differentiable functions and the edges they leave in the graph

use super::context::is_grad_enabled;
use super::data::{as_array, Value};
use super::variable::{Node, Variable};
use crate::error::Result;
use ndarray::ArrayD;
use std::fmt;
use std::rc::{Rc, Weak};

/// A single-input, single-output differentiable primitive.
///
/// Implementations are stateless: everything a call needs to differentiate
/// later is kept in the [`Creator`] edge recorded by [`call`], so the same
/// function value may be applied at any number of call sites.
pub trait Function: fmt::Debug {
    /// Name used in logs and debug output
    fn name(&self) -> &'static str;

    /// Compute the output payload. May return a bare scalar.
    fn forward(&self, x: &ArrayD<f64>) -> Result<Value>;

    /// Local derivative at `x` chained with the output gradient `gy`.
    ///
    /// Must return an array with the shape of `x`.
    fn backward(&self, x: &ArrayD<f64>, gy: &ArrayD<f64>) -> Result<ArrayD<f64>>;
}

/// The record of one function application: which function, on which input,
/// producing which output.
///
/// The output owns its creator, so the link back to the output is weak.
pub struct Creator {
    function: Rc<dyn Function>,
    input: Variable,
    output: Weak<Node>,
}

impl Creator {
    pub fn function(&self) -> &dyn Function {
        self.function.as_ref()
    }

    pub fn input(&self) -> &Variable {
        &self.input
    }

    /// The variable this edge produced, if it is still alive
    pub fn output(&self) -> Option<Variable> {
        Variable::upgrade(&self.output)
    }

    pub(crate) fn into_input(self) -> Variable {
        self.input
    }
}

impl fmt::Debug for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creator")
            .field("function", &self.function.name())
            .field("input", &self.input.id())
            .field("output", &self.output().map(|o| o.id()))
            .finish()
    }
}

/// Apply `function` to `input`, recording the edge for backpropagation.
///
/// A forward failure returns before any variable is created, so the graph
/// is left as it was. While recording is disabled (see
/// [`no_grad`](super::no_grad)) the output is a leaf.
pub fn call(function: Rc<dyn Function>, input: &Variable) -> Result<Variable> {
    let x = input.require_data()?;
    let y = as_array(function.forward(x)?);
    let output = Variable::from_array(y);

    if is_grad_enabled() {
        let creator = Rc::new(Creator {
            function,
            input: input.clone(),
            output: output.downgrade(),
        });
        output.set_creator(creator)?;
    }

    Ok(output)
}
