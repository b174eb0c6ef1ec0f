//! Benchmarks for execution graph building
//!
//! Long dependency chains are the worst case for both the cycle check and
//! the bounded dependency expansion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphform_core::{ExecutionTask, Materialization, Operation, RunConfig};
use graphform_graph::{build, CompiledGraph};

/// Chain of N materializations, each depending on the previous one
fn generate_chain(num_nodes: usize) -> CompiledGraph {
    let mut graph = CompiledGraph::default();

    graph.operations.push(Operation {
        name: "model_0".to_string(),
        dependencies: vec![],
        statements: vec!["create schema if not exists bench".to_string()],
    });

    for i in 1..num_nodes {
        graph.materializations.push(
            Materialization::new(format!("model_{}", i), format!("select * from model_{}", i - 1))
                .with_dependencies([format!("model_{}", i - 1)]),
        );
    }

    graph
}

fn adapter(m: &Materialization, _: &RunConfig) -> Vec<ExecutionTask> {
    vec![ExecutionTask::statement(format!("create table {} as {}", m.name, m.query))]
}

fn bench_full_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_build");

    for size in [100, 500, 1000] {
        let graph = generate_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| build(black_box(graph), &RunConfig::default(), &adapter))
        });
    }

    group.finish();
}

fn bench_expanded_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanded_selection");

    for size in [100, 500, 1000] {
        let graph = generate_chain(size);
        let run = RunConfig::select([format!("model_{}", size - 1)]).with_dependencies();
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| build(black_box(graph), &run, &adapter))
        });
    }

    group.finish();
}

fn bench_wildcard_selection(c: &mut Criterion) {
    let graph = generate_chain(1000);
    let run = RunConfig::select(["model_9*"]).with_dependencies();

    c.bench_function("wildcard_selection_1000", |b| {
        b.iter(|| build(black_box(&graph), &run, &adapter))
    });
}

criterion_group!(benches, bench_full_build, bench_expanded_selection, bench_wildcard_selection);
criterion_main!(benches);
