//! Variable type with gradient tracking

use super::data::Value;
use super::function::Creator;
use crate::config::BackwardOptions;
use crate::error::{Error, Result};
use ndarray::{Array, ArrayD, Dimension};
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static VARIABLE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_variable_id() -> VariableId {
    VariableId(VARIABLE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Unique identifier for a variable in the computation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u64);

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

pub(crate) struct Node {
    id: VariableId,
    name: RefCell<Option<String>>,
    data: Option<ArrayD<f64>>,
    grad: RefCell<Option<ArrayD<f64>>>,
    creator: OnceCell<Rc<Creator>>,
}

impl Drop for Node {
    // Unlink the chain behind this node one edge at a time so that dropping
    // a long graph does not recurse once per edge.
    fn drop(&mut self) {
        let mut next = self.creator.take();
        while let Some(creator) = next {
            let Ok(creator) = Rc::try_unwrap(creator) else {
                break;
            };
            let Ok(mut input) = Rc::try_unwrap(creator.into_input().0) else {
                break;
            };
            next = input.creator.take();
        }
    }
}

/// A graph node: an array payload, a gradient slot and the creator edge
/// that produced it.
///
/// `Variable` is a reference-counted handle, so cloning it is O(1) and the
/// clone refers to the same node. The payload never changes after
/// construction; only the gradient slot is mutable.
#[derive(Clone)]
pub struct Variable(Rc<Node>);

impl Variable {
    /// Create a leaf variable.
    ///
    /// `None` produces a variable without data. A bare scalar is rejected
    /// with [`Error::TypeMismatch`]; wrap it with
    /// [`as_array`](super::as_array) first.
    pub fn new(data: Option<Value>) -> Result<Self> {
        let data = match data {
            None => None,
            Some(Value::Array(a)) => Some(a),
            Some(other) => {
                return Err(Error::TypeMismatch {
                    got: other.type_name().to_string(),
                })
            }
        };
        Ok(Self::from_node(data))
    }

    /// Create a leaf variable from an array of any dimensionality
    pub fn from_array<D: Dimension>(data: Array<f64, D>) -> Self {
        Self::from_node(Some(data.into_dyn()))
    }

    /// Create a leaf variable from a vector (1-d)
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self::from_array(Array::from(data))
    }

    fn from_node(data: Option<ArrayD<f64>>) -> Self {
        Self(Rc::new(Node {
            id: next_variable_id(),
            name: RefCell::new(None),
            data,
            grad: RefCell::new(None),
            creator: OnceCell::new(),
        }))
    }

    /// Attach a label, shown in logs and error messages.
    ///
    /// The name belongs to the node, not the handle: every clone of this
    /// variable sees it, and naming a clone renames them all. Name a
    /// variable right after constructing it.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        *self.0.name.borrow_mut() = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<String> {
        self.0.name.borrow().clone()
    }

    pub fn id(&self) -> VariableId {
        self.0.id
    }

    /// Name if set, otherwise the id
    pub fn label(&self) -> String {
        match self.0.name.borrow().as_deref() {
            Some(name) => format!("{name} ({})", self.0.id),
            None => self.0.id.to_string(),
        }
    }

    /// Get reference to data
    pub fn data(&self) -> Option<&ArrayD<f64>> {
        self.0.data.as_ref()
    }

    pub(crate) fn require_data(&self) -> Result<&ArrayD<f64>> {
        self.data().ok_or_else(|| Error::EmptyPayload(self.label()))
    }

    pub fn shape(&self) -> Option<&[usize]> {
        self.data().map(|d| d.shape())
    }

    pub fn ndim(&self) -> usize {
        self.data().map_or(0, |d| d.ndim())
    }

    /// Number of elements, zero when there is no data
    pub fn len(&self) -> usize {
        self.data().map_or(0, |d| d.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get gradient (if computed or seeded)
    pub fn grad(&self) -> Option<ArrayD<f64>> {
        self.0.grad.borrow().clone()
    }

    /// Seed the gradient slot.
    ///
    /// The gradient must have the same shape as the data.
    pub fn set_grad<D: Dimension>(&self, grad: Array<f64, D>) -> Result<()> {
        let grad = grad.into_dyn();
        let data = self.require_data()?;
        if grad.shape() != data.shape() {
            return Err(Error::ShapeMismatch {
                expected: data.shape().to_vec(),
                got: grad.shape().to_vec(),
            });
        }
        self.store_grad(grad);
        Ok(())
    }

    pub(crate) fn store_grad(&self, grad: ArrayD<f64>) {
        *self.0.grad.borrow_mut() = Some(grad);
    }

    /// Reset the gradient slot to absent
    pub fn cleargrad(&self) {
        *self.0.grad.borrow_mut() = None;
    }

    /// The edge that produced this variable, `None` for leaves
    pub fn creator(&self) -> Option<Rc<Creator>> {
        self.0.creator.get().cloned()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.creator.get().is_none()
    }

    pub(crate) fn set_creator(&self, creator: Rc<Creator>) -> Result<()> {
        self.0
            .creator
            .set(creator)
            .map_err(|_| Error::CreatorAlreadySet(self.label()))
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<Node> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(node: &Weak<Node>) -> Option<Self> {
        node.upgrade().map(Self)
    }

    /// Propagate the seeded gradient back to every ancestor.
    ///
    /// Equivalent to [`backward_with`](Self::backward_with) using
    /// [`BackwardOptions::default`], which requires the gradient of `self`
    /// to be seeded first.
    pub fn backward(&self) -> Result<()> {
        self.backward_with(&BackwardOptions::default())
    }

    pub fn backward_with(&self, options: &BackwardOptions) -> Result<()> {
        super::backward::backward(self, options)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("id", &self.0.id)
            .field("name", &self.0.name.borrow())
            .field("data", &self.0.data)
            .field("grad", &self.0.grad.borrow())
            .field("creator", &self.0.creator.get().map(|c| c.function().name()))
            .finish()
    }
}
