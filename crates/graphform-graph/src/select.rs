//! Node selection and dependency pruning

use graphform_core::{ExecutionNode, RunConfig};
use tracing::debug;

use crate::matcher::NameIndex;

/// Pick the nodes a run covers and narrow their dependencies to that set
///
/// Expects a validated graph. With `include_dependencies`, the selection is
/// grown by at most `nodes.len()` passes, each adding the dependencies of
/// every included node; an acyclic chain can never be longer than that.
pub fn select(nodes: &[ExecutionNode], run_config: &RunConfig) -> Vec<ExecutionNode> {
    let index = NameIndex::new(nodes.iter().map(|n| n.name.as_str()));
    let dependencies: Vec<Vec<usize>> = nodes.iter().map(|n| index.resolve(&n.dependencies)).collect();

    let mut included = if run_config.nodes.is_empty() {
        vec![true; nodes.len()]
    } else {
        let mut included = vec![false; nodes.len()];
        for position in index.resolve(&run_config.nodes) {
            included[position] = true;
        }
        included
    };

    if run_config.include_dependencies {
        for pass in 0..nodes.len() {
            let mut grew = false;

            for node in 0..nodes.len() {
                if !included[node] {
                    continue;
                }
                for &dependency in &dependencies[node] {
                    if !included[dependency] {
                        included[dependency] = true;
                        grew = true;
                    }
                }
            }

            // Later passes cannot add anything once a pass adds nothing
            if !grew {
                debug!(passes = pass + 1, "dependency expansion converged");
                break;
            }
        }
    }

    nodes
        .iter()
        .enumerate()
        .filter(|(position, _)| included[*position])
        .map(|(position, node)| ExecutionNode {
            name: node.name.clone(),
            dependencies: dependencies[position]
                .iter()
                .filter(|&&dependency| included[dependency])
                .map(|&dependency| index.name(dependency).to_string())
                .collect(),
            tasks: node.tasks.clone(),
        })
        .collect()
}
