//! Graph validation
//!
//! Runs over the full node set before any selection happens. Every check
//! stops at the first violation.

use std::collections::HashSet;

use graphform_core::{BuildError, ExecutionNode};
use crate::matcher::{is_pattern, NameIndex};

/// Run every check: unique names, existing dependencies, no cycles
pub fn validate(nodes: &[ExecutionNode]) -> Result<(), BuildError> {
    check_unique_names(nodes)?;
    check_dependencies_exist(nodes)?;
    check_acyclic(nodes)?;
    Ok(())
}

/// Fail on the first node name declared twice
pub fn check_unique_names(nodes: &[ExecutionNode]) -> Result<(), BuildError> {
    let mut seen = HashSet::new();

    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(BuildError::DuplicateNodeName {
                name: node.name.clone(),
            });
        }
    }

    Ok(())
}

/// Every dependency must name a node; a pattern must match at least one
pub fn check_dependencies_exist(nodes: &[ExecutionNode]) -> Result<(), BuildError> {
    let index = NameIndex::new(nodes.iter().map(|n| n.name.as_str()));

    for node in nodes {
        for dependency in &node.dependencies {
            let exists = if is_pattern(dependency) {
                !index.resolve(std::slice::from_ref(dependency)).is_empty()
            } else {
                index.position(dependency).is_some()
            };

            if !exists {
                return Err(BuildError::MissingDependency {
                    node: node.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Depth-first walk from every node toward its dependencies
///
/// Assumes names are unique and dependencies exist. The reported chain runs
/// from the root of the walk to the repeated node.
pub fn check_acyclic(nodes: &[ExecutionNode]) -> Result<(), BuildError> {
    let index = NameIndex::new(nodes.iter().map(|n| n.name.as_str()));
    let edges: Vec<Vec<usize>> = nodes.iter().map(|node| index.resolve(&node.dependencies)).collect();

    // Nodes whose whole dependency subtree is known to be acyclic
    let mut cleared = vec![false; nodes.len()];
    // Reset by every walk that finishes without finding a cycle
    let mut on_chain = vec![false; nodes.len()];

    for root in 0..nodes.len() {
        if cleared[root] {
            continue;
        }

        let mut chain: Vec<usize> = vec![root];
        on_chain[root] = true;
        // (node, next edge to follow) for each chain entry
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (current, next) = *frame;

            let Some(&dependency) = edges[current].get(next) else {
                cleared[current] = true;
                on_chain[current] = false;
                chain.pop();
                stack.pop();
                continue;
            };
            frame.1 += 1;

            if on_chain[dependency] {
                let mut cycle: Vec<String> = chain.iter().map(|&i| index.name(i).to_string()).collect();
                cycle.push(index.name(dependency).to_string());
                return Err(BuildError::CircularDependency { chain: cycle });
            }

            if cleared[dependency] {
                continue;
            }

            on_chain[dependency] = true;
            chain.push(dependency);
            stack.push((dependency, 0));
        }
    }

    Ok(())
}
