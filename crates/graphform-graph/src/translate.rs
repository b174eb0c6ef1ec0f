//! Entity to execution node translation

use graphform_core::{
    Assertion, ExecutionNode, ExecutionTask, Materialization, Operation, RunConfig, TaskBuilder,
};

/// Translate a materialization
///
/// Tasks run in a fixed order: pre statements, the adapter's build tasks,
/// post statements, then the materialization's own assertions.
pub fn from_materialization(
    materialization: &Materialization,
    adapter: &dyn TaskBuilder,
    run_config: &RunConfig,
) -> ExecutionNode {
    let mut tasks: Vec<ExecutionTask> = materialization
        .pres
        .iter()
        .map(ExecutionTask::statement)
        .collect();

    tasks.extend(adapter.build_tasks(materialization, run_config));
    tasks.extend(materialization.posts.iter().map(ExecutionTask::statement));
    tasks.extend(materialization.assertions.iter().map(ExecutionTask::assertion));

    ExecutionNode {
        name: materialization.name.clone(),
        dependencies: materialization.dependencies.clone(),
        tasks,
    }
}

/// Translate an operation: one statement task per statement
pub fn from_operation(operation: &Operation) -> ExecutionNode {
    ExecutionNode {
        name: operation.name.clone(),
        dependencies: operation.dependencies.clone(),
        tasks: operation.statements.iter().map(ExecutionTask::statement).collect(),
    }
}

/// Translate an assertion: one assertion task per query
pub fn from_assertion(assertion: &Assertion) -> ExecutionNode {
    ExecutionNode {
        name: assertion.name.clone(),
        dependencies: assertion.dependencies.clone(),
        tasks: assertion.queries.iter().map(ExecutionTask::assertion).collect(),
    }
}
