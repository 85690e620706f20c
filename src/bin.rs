use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use itertools::Itertools;
use relnet::{graph::Graph, matrix::DEFAULT_MAX_ITERATIONS};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "relnet-cli",
    about = "Analyse a DOT graph: type, connectivity, cycles, components and Eulerian walks."
)]
struct Cli {
    /// DOT file holding a single `graph` or `digraph`.
    file: PathBuf,
    /// Print the adjacency matrix.
    #[arg(long, action = ArgAction::SetTrue)]
    matrix: bool,
    /// Print the reflexive and transitive closures of the adjacency matrix.
    #[arg(long, action = ArgAction::SetTrue)]
    closure: bool,
    /// Write the adjacency matrix as CSV.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Iteration cap for transitive closures.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let graph = Graph::from_dot(&source)
        .with_context(|| format!("failed to parse {}", cli.file.display()))?
        .with_closure_limit(cli.max_iterations);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );

    println!("{graph}");
    println!();
    println!("Strongly connected: {}", graph.is_connected()?);
    println!("Weakly connected: {}", graph.is_weakly_connected());
    println!("Has cycle: {}", graph.has_cycle());
    println!(
        "Components: {}",
        graph
            .components()
            .iter()
            .map(|c| format!("{{{}}}", c.iter().join(", ")))
            .join(" ")
    );
    match graph.endpoints() {
        Some((start, end)) => println!("Endpoints: {start} -> {end}"),
        None => println!("Endpoints: none"),
    }
    match graph.find_eulerian_path()? {
        Some(walk) => println!("Eulerian path: {}", walk.iter().join(" -> ")),
        None => println!("Eulerian path: none"),
    }

    if cli.matrix || cli.closure || cli.csv.is_some() {
        let adjacency = graph.to_matrix();
        println!("Nodes: {}", graph.nodes().iter().join(", "));
        if cli.matrix {
            println!("Adjacency:\n{adjacency}");
        }
        if cli.closure {
            println!("Reflexive closure:\n{}", adjacency.reflexive_closure());
            let transitive = adjacency
                .transitive_closure_with_limit(cli.max_iterations)
                .context("transitive closure failed")?;
            println!("Transitive closure:\n{transitive}");
        }
        if let Some(path) = &cli.csv {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            adjacency.write_csv(&mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "wrote adjacency CSV");
        }
    }
    Ok(())
}
