//! Integration tests for execution graph building

use graphform_core::{BuildError, ErrorCode, ExecutionTask, Materialization, RunConfig, TaskType};
use graphform_graph::{build, CompiledGraph};
use pretty_assertions::assert_eq;

const PROJECT: &str = r#"{
    "project_config": { "warehouse": "bigquery", "default_schema": "analytics" },
    "materializations": [
        {
            "name": "staging_users",
            "query": "select * from raw.users",
            "dependencies": ["load_raw"],
            "pres": ["set timezone = 'UTC'"],
            "posts": ["grant select on staging_users to analysts"],
            "assertions": ["select * from staging_users where id is null"]
        },
        {
            "name": "reporting_daily",
            "type": "view",
            "query": "select date, count(*) from staging_users group by 1",
            "dependencies": ["staging_users"]
        },
        {
            "name": "reporting_weekly",
            "query": "select week, count(*) from staging_users group by 1",
            "dependencies": ["staging_users"]
        }
    ],
    "operations": [
        { "name": "load_raw", "statements": ["copy raw.users from 's3://bucket/users'", "analyze raw.users"] }
    ],
    "assertions": [
        {
            "name": "reports_complete",
            "dependencies": ["reporting_*"],
            "queries": ["select 1 from reporting_daily having count(*) = 0"]
        }
    ]
}"#;

fn adapter(m: &Materialization, _: &RunConfig) -> Vec<ExecutionTask> {
    vec![ExecutionTask::statement(format!("create or replace {} {} as {}", m.kind, m.name, m.query))]
}

fn project() -> CompiledGraph {
    CompiledGraph::from_str(PROJECT).unwrap()
}

#[test]
fn full_build_translates_every_entity() {
    let graph = build(&project(), &RunConfig::default(), &adapter).unwrap();

    assert_eq!(
        graph.node_names(),
        vec!["staging_users", "reporting_daily", "reporting_weekly", "load_raw", "reports_complete"]
    );

    let staging = graph.node("staging_users").unwrap();
    let kinds: Vec<TaskType> = staging.tasks.iter().map(|t| t.task_type).collect();
    assert_eq!(
        kinds,
        vec![TaskType::Statement, TaskType::Statement, TaskType::Statement, TaskType::Assertion]
    );
    assert_eq!(staging.tasks[1].statement, "create or replace table staging_users as select * from raw.users");

    // Nothing excluded, so pruning only resolves wildcards
    assert_eq!(graph.node("staging_users").unwrap().dependencies, vec!["load_raw"]);
    assert_eq!(
        graph.node("reports_complete").unwrap().dependencies,
        vec!["reporting_daily", "reporting_weekly"]
    );
    assert_eq!(graph.project_config.default_schema, "analytics");
    assert_eq!(graph.task_count(), 4 + 1 + 1 + 2 + 1);
}

#[test]
fn selecting_reports_without_dependencies() {
    let run = RunConfig::select(["reporting_*"]);
    let graph = build(&project(), &run, &adapter).unwrap();

    assert_eq!(graph.node_names(), vec!["reporting_daily", "reporting_weekly"]);
    assert!(graph.nodes.iter().all(|n| n.dependencies.is_empty()));
    assert_eq!(graph.run_config, run);
}

#[test]
fn selecting_assertion_with_dependencies_pulls_in_whole_upstream() {
    let run = RunConfig::select(["reports_complete"]).with_dependencies();
    let graph = build(&project(), &run, &adapter).unwrap();

    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.node("reporting_daily").unwrap().dependencies, vec!["staging_users"]);
}

#[test]
fn every_remaining_dependency_is_in_the_graph() {
    let runs = [
        RunConfig::default(),
        RunConfig::select(["staging_users", "reporting_weekly"]),
        RunConfig::select(["reporting_daily"]).with_dependencies(),
        RunConfig::select(["*_complete", "load_raw"]),
    ];

    for run in runs {
        let graph = build(&project(), &run, &adapter).unwrap();
        let names = graph.node_names();
        for node in &graph.nodes {
            for dep in &node.dependencies {
                assert!(names.contains(&dep.as_str()), "{} -> {} dangles for {:?}", node.name, dep, run);
            }
        }
    }
}

#[test]
fn missing_dependency_aborts_build() {
    let mut compiled = project();
    compiled.materializations[1].dependencies.push("staging_orders".into());

    let err = build(&compiled, &RunConfig::default(), &adapter).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingDependency);
    assert_eq!(
        err.to_string(),
        "Missing dependency detected: node \"reporting_daily\" depends on \"staging_orders\" which does not exist."
    );
}

#[test]
fn cycle_aborts_build() {
    let mut compiled = project();
    compiled.operations[0].dependencies.push("reporting_weekly".into());

    let err = build(&compiled, &RunConfig::default(), &adapter).unwrap_err();
    assert_eq!(
        err,
        BuildError::CircularDependency {
            chain: vec![
                "staging_users".into(),
                "load_raw".into(),
                "reporting_weekly".into(),
                "staging_users".into(),
            ],
        }
    );
}

#[test]
fn build_is_deterministic() {
    let run = RunConfig::select(["reporting_*"]).with_dependencies();
    let first = build(&project(), &run, &adapter).unwrap();
    let second = build(&project(), &run, &adapter).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
