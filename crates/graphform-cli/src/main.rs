use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use graphform_adapters::adapter_for;
use graphform_core::{BuildError, ExecutionGraph, ProjectConfig, RunConfig, TaskType};
use graphform_graph::{build, CompiledGraph};

const DEFAULT_CONFIG: &str = "graphform.toml";

/// Graphform - compile data transformation graphs into execution graphs
#[derive(Parser)]
#[command(name = "graphform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: graphform.toml, else the graph's own config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which nodes a run covers
#[derive(Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// Node names or `*` patterns, comma separated (default: all nodes)
    #[arg(short, long, value_delimiter = ',')]
    nodes: Vec<String>,

    /// Also include every transitive dependency of the selected nodes
    #[arg(long)]
    include_deps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the execution graph and write it as JSON
    Build {
        /// Compiled graph JSON
        graph: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Rebuild incremental tables from scratch
        #[arg(long)]
        full_refresh: bool,

        /// Output file for the execution graph
        #[arg(short, long, default_value = "execution-graph.json")]
        output: PathBuf,
    },

    /// Check the compiled graph for missing dependencies and cycles
    Validate {
        /// Compiled graph JSON
        graph: PathBuf,
    },

    /// List the nodes a run would include
    Ls {
        /// Compiled graph JSON
        graph: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { graph, selection, full_refresh, output } => {
            let mut run_config = run_config(&selection);
            run_config.full_refresh = full_refresh;
            build_command(cli.config.as_deref(), &graph, &run_config, &output, cli.verbose)
        }
        Commands::Validate { graph } => validate_command(cli.config.as_deref(), &graph),
        Commands::Ls { graph, selection } => {
            ls_command(cli.config.as_deref(), &graph, &run_config(&selection))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_config(selection: &SelectionArgs) -> RunConfig {
    RunConfig {
        nodes: selection.nodes.clone(),
        include_dependencies: selection.include_deps,
        full_refresh: false,
    }
}

/// Load the compiled graph and apply the project config override, if any
fn load_graph(config_path: Option<&Path>, graph_path: &Path) -> Result<CompiledGraph> {
    let mut graph = CompiledGraph::from_file(graph_path)?;

    let config_file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };

    if let Some(path) = config_file {
        tracing::info!(path = %path.display(), "loading project config");
        graph.project_config = ProjectConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
    } else {
        tracing::info!("no config file found, using the compiled graph's project config");
    }

    graph.project_config = graph.project_config.with_env_overrides();
    Ok(graph)
}

/// Build against the project's adapter; build errors are reported, then exit 1
fn compile(graph: &CompiledGraph, run_config: &RunConfig) -> Result<ExecutionGraph> {
    let adapter = adapter_for(&graph.project_config)?;

    match build(graph, run_config, adapter.as_ref()) {
        Ok(execution) => Ok(execution),
        Err(err) => {
            print_build_error(&err);
            std::process::exit(1);
        }
    }
}

/// Build command - write the execution graph
fn build_command(
    config_path: Option<&Path>,
    graph_path: &Path,
    run_config: &RunConfig,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Loading compiled graph from:".cyan(), graph_path.display());
    }

    let graph = load_graph(config_path, graph_path)?;

    if verbose {
        eprintln!("{} {}", "Using warehouse:".cyan(), graph.project_config.warehouse);
    }

    let execution = compile(&graph, run_config)?;

    let json = serde_json::to_string_pretty(&execution)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if verbose {
        eprintln!("{} {}", "Execution graph saved to:".green(), output.display());
    }

    print_build_summary(&graph, &execution);
    Ok(())
}

/// Validate command - full build with everything selected, nothing written
fn validate_command(config_path: Option<&Path>, graph_path: &Path) -> Result<()> {
    let graph = load_graph(config_path, graph_path)?;
    let execution = compile(&graph, &RunConfig::default())?;

    println!(
        "{} {} nodes, {} tasks",
        "✓ Graph is valid:".green().bold(),
        execution.nodes.len(),
        execution.task_count()
    );
    Ok(())
}

/// Ls command - print selected nodes and their pruned dependencies
fn ls_command(config_path: Option<&Path>, graph_path: &Path, run_config: &RunConfig) -> Result<()> {
    let graph = load_graph(config_path, graph_path)?;
    let execution = compile(&graph, run_config)?;

    if execution.nodes.is_empty() {
        println!("{}", "No nodes match the selection".yellow());
        return Ok(());
    }

    for node in &execution.nodes {
        if node.dependencies.is_empty() {
            println!("{}", node.name.green());
        } else {
            println!("{} {} {}", node.name.green(), "<-".dimmed(), node.dependencies.join(", "));
        }
    }

    Ok(())
}

fn print_build_error(err: &BuildError) {
    eprintln!("{} {}: {}", "ERROR".red().bold(), err.code(), err);
}

/// Print build summary to stdout
fn print_build_summary(graph: &CompiledGraph, execution: &ExecutionGraph) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Execution Graph".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Warehouse: {}", execution.project_config.warehouse);
    println!(
        "Selected:  {} of {} nodes",
        execution.nodes.len().to_string().bold(),
        graph.entity_count()
    );
    println!();

    for node in &execution.nodes {
        let assertions = node
            .tasks
            .iter()
            .filter(|t| t.task_type == TaskType::Assertion)
            .count();

        print!("  {} ({} tasks", node.name.green(), node.tasks.len());
        if assertions > 0 {
            print!(", {} assertions", assertions.to_string().yellow());
        }
        println!(")");

        for dep in &node.dependencies {
            println!("      <- {}", dep);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
