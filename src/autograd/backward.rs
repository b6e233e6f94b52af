//! Reverse-mode backward pass
//!
//! The pass:
//! 1. Orders every variable reachable through creator edges so that each
//!    variable comes after its input (DFS postorder)
//! 2. Walks that order in reverse, summing each edge's input gradient into a
//!    pass-local table
//! 3. Writes the table into the gradient slots once every edge succeeded
//!
//! Because nothing is written until the end, a failing edge leaves every
//! gradient slot as it was.

use super::variable::{Variable, VariableId};
use crate::config::{validate_options, BackwardOptions, SeedPolicy};
use crate::error::{Error, Result};
use log::{debug, trace};
use ndarray::ArrayD;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Propagate the gradient of `output` to all of its ancestors.
///
/// A leaf output has nothing to propagate into and returns `Ok(())` without
/// touching any gradient slot.
pub fn backward(output: &Variable, options: &BackwardOptions) -> Result<()> {
    if output.is_leaf() {
        debug!("backward on leaf {}: nothing to propagate", output.label());
        return Ok(());
    }

    validate_options(options).map_err(|e| Error::ConfigError(e.to_string()))?;

    let (seed, seeded_here) = match output.grad() {
        Some(grad) => (grad, false),
        None => match options.seed {
            SeedPolicy::Require => return Err(Error::UnseededGradient(output.label())),
            SeedPolicy::Ones => (ArrayD::ones(output.require_data()?.raw_dim()), true),
        },
    };

    let (order, depth) = topological_order(output, options.max_depth)?;
    debug!(
        "backward from {}: {} variables, {} edges",
        output.label(),
        order.len(),
        depth
    );

    let mut pending: HashMap<VariableId, ArrayD<f64>> = HashMap::new();
    pending.insert(output.id(), seed.clone());

    for var in order.iter().rev() {
        let Some(creator) = var.creator() else {
            continue;
        };
        let gy = pending.get(&var.id()).cloned().ok_or_else(|| {
            Error::InvalidGradient(format!("no gradient reached {}", var.label()))
        })?;

        let input = creator.input();
        let x = input.require_data()?;
        let gx = creator.function().backward(x, &gy)?;

        if gx.shape() != x.shape() {
            return Err(Error::ShapeMismatch {
                expected: x.shape().to_vec(),
                got: gx.shape().to_vec(),
            });
        }
        if options.check_finite && gx.iter().any(|g| !g.is_finite()) {
            return Err(Error::InvalidGradient(format!(
                "{} produced a non-finite gradient for {}",
                creator.function().name(),
                input.label()
            )));
        }

        trace!(
            "{}: {} -> {}",
            creator.function().name(),
            var.label(),
            input.label()
        );

        match pending.entry(input.id()) {
            Entry::Occupied(mut slot) => *slot.get_mut() += &gx,
            Entry::Vacant(slot) => {
                slot.insert(gx);
            }
        }
    }

    if seeded_here {
        output.store_grad(seed);
    }
    for var in &order {
        if var.id() == output.id() {
            continue;
        }
        if let Some(grad) = pending.remove(&var.id()) {
            var.store_grad(grad);
        }
    }

    debug!("backward from {} done", output.label());
    Ok(())
}

/// Order all variables reachable from `root` so that every variable appears
/// after the input of its creator. Also returns the number of edges walked.
///
/// The walk stops as soon as it has seen more than `max_depth` edges.
fn topological_order(
    root: &Variable,
    max_depth: Option<usize>,
) -> Result<(Vec<Variable>, usize)> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut edges = 0usize;
    let mut stack = vec![(root.clone(), false)];

    while let Some((var, expanded)) = stack.pop() {
        if expanded {
            order.push(var);
            continue;
        }
        if !visited.insert(var.id()) {
            continue;
        }
        let input = var.creator().map(|c| c.input().clone());
        if input.is_some() {
            edges += 1;
            if let Some(limit) = max_depth {
                if edges > limit {
                    return Err(Error::Computation(format!(
                        "graph behind {} has more than {} edges",
                        root.label(),
                        limit
                    )));
                }
            }
        }
        stack.push((var, true));
        if let Some(input) = input {
            if !visited.contains(&input.id()) {
                stack.push((input, false));
            }
        }
    }

    Ok((order, edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{exp, square, sum};

    #[test]
    fn test_topological_order_chain() {
        let x = Variable::from_vec(vec![1.0, 2.0]);
        let a = square(&x).unwrap();
        let b = exp(&a).unwrap();
        let y = sum(&b).unwrap();

        let (order, _) = topological_order(&y, None).unwrap();

        let ids: Vec<_> = order.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![x.id(), a.id(), b.id(), y.id()]);
    }

    #[test]
    fn test_topological_order_leaf() {
        let x = Variable::from_vec(vec![1.0]);
        let (order, edges) = topological_order(&x, None).unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(edges, 0);
        assert!(order[0].ptr_eq(&x));
    }

    #[test]
    fn test_topological_order_ignores_sibling_branch() {
        // x feeds two functions; only the branch behind y is reachable
        let x = Variable::from_vec(vec![1.0]);
        let y = square(&x).unwrap();
        let z = exp(&x).unwrap();

        let (order, _) = topological_order(&y, None).unwrap();
        assert_eq!(order.len(), 2);
        assert!(order.iter().all(|v| !v.ptr_eq(&z)));
    }

    #[test]
    fn test_topological_order_counts_edges() {
        let x = Variable::from_vec(vec![1.0]);
        let y = sum(&exp(&square(&x).unwrap()).unwrap()).unwrap();

        let (order, edges) = topological_order(&y, Some(3)).unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(edges, 3);
    }

    #[test]
    fn test_topological_order_stops_at_limit() {
        let x = Variable::from_vec(vec![1.0]);
        let mut y = x.clone();
        for _ in 0..1_000 {
            y = square(&y).unwrap();
        }

        let result = topological_order(&y, Some(10));
        assert!(matches!(result, Err(Error::Computation(_))));
    }

    #[test]
    fn test_leaf_ignores_invalid_options() {
        let x = Variable::from_vec(vec![1.0]);
        let options = BackwardOptions {
            max_depth: Some(0),
            ..BackwardOptions::default()
        };

        assert!(backward(&x, &options).is_ok());
        assert!(x.grad().is_none());
    }
}
