//! Execution graph builder
//!
//! Single entry point: translate every entity, validate the full graph, then
//! select and prune. Any validation failure aborts the build.

use graphform_core::{BuildError, ExecutionGraph, ExecutionNode, RunConfig, TaskBuilder};
use tracing::{debug, info};

use crate::compiled::CompiledGraph;
use crate::{select, translate, validate};

/// Compile a graph into the execution graph for one run
pub fn build(
    graph: &CompiledGraph,
    run_config: &RunConfig,
    adapter: &dyn TaskBuilder,
) -> Result<ExecutionGraph, BuildError> {
    let nodes = translate_all(graph, run_config, adapter);
    debug!(nodes = nodes.len(), "translated compiled graph");

    validate::validate(&nodes)?;
    debug!("dependency graph is valid");

    let selected = select::select(&nodes, run_config);
    info!(
        selected = selected.len(),
        total = nodes.len(),
        include_dependencies = run_config.include_dependencies,
        "built execution graph"
    );

    Ok(ExecutionGraph {
        project_config: graph.project_config.clone(),
        run_config: run_config.clone(),
        nodes: selected,
    })
}

/// Materializations first, then operations, then assertions
fn translate_all(
    graph: &CompiledGraph,
    run_config: &RunConfig,
    adapter: &dyn TaskBuilder,
) -> Vec<ExecutionNode> {
    let mut nodes = Vec::with_capacity(graph.entity_count());

    nodes.extend(
        graph
            .materializations
            .iter()
            .map(|m| translate::from_materialization(m, adapter, run_config)),
    );
    nodes.extend(graph.operations.iter().map(translate::from_operation));
    nodes.extend(graph.assertions.iter().map(translate::from_assertion));

    nodes
}
