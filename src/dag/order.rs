// src/dag/order.rs

//! Depth-first topological ordering of a target and its static dependencies.

use std::collections::HashMap;

use tracing::trace;

use crate::dag::graph::TargetGraph;
use crate::dag::target::{Target, TargetName};
use crate::errors::{Result, TargetdagError};

/// Traversal mark for a single `topological_order` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current visiting stack.
    Visiting,
    /// Fully resolved and already emitted.
    Visited,
}

/// Resolve `root` into an execution order.
///
/// Every target appears after all of its static dependencies, each reachable
/// target appears exactly once, and `root` is last. Dependencies are visited
/// in declaration order.
///
/// Fails with [`TargetdagError::UnknownTarget`] if `root` or any reachable
/// dependency is missing, and with [`TargetdagError::CircularDependency`] if
/// a target on the visiting stack is reached again. No partial order is
/// returned in either case.
pub fn topological_order(root: &str, graph: &TargetGraph) -> Result<Vec<TargetName>> {
    let Some(root_target) = graph.get(root) else {
        return Err(TargetdagError::UnknownTarget {
            name: root.to_string(),
            required_by: None,
        });
    };

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    // (target, index of its next dependency to visit); doubles as the
    // visiting stack for cycle chains.
    let mut stack: Vec<(&Target, usize)> = vec![(root_target.as_ref(), 0)];
    let mut order: Vec<TargetName> = Vec::new();
    marks.insert(root_target.name.as_str(), Mark::Visiting);

    while let Some(frame) = stack.last_mut() {
        let (target, next) = *frame;

        let Some(dep) = target.depends.get(next) else {
            stack.pop();
            marks.insert(target.name.as_str(), Mark::Visited);
            order.push(target.name.clone());
            continue;
        };
        frame.1 += 1;

        match marks.get(dep.as_str()) {
            Some(Mark::Visited) => continue,
            Some(Mark::Visiting) => return Err(cycle_error(dep, &stack)),
            None => {}
        }

        let Some(dep_target) = graph.get(dep) else {
            return Err(TargetdagError::UnknownTarget {
                name: dep.clone(),
                required_by: Some(target.name.clone()),
            });
        };

        marks.insert(dep_target.name.as_str(), Mark::Visiting);
        stack.push((dep_target.as_ref(), 0));
    }

    trace!(root, ?order, "resolved topological order");
    Ok(order)
}

/// Build the cycle chain: the visiting stack from the first occurrence of
/// `name`, followed by `name` again.
fn cycle_error(name: &str, stack: &[(&Target, usize)]) -> TargetdagError {
    let start = stack
        .iter()
        .position(|(t, _)| t.name == name)
        .unwrap_or(0);
    let mut chain: Vec<String> = stack[start..].iter().map(|(t, _)| t.name.clone()).collect();
    chain.push(name.to_string());
    TargetdagError::CircularDependency { chain }
}
