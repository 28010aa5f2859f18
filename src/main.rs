use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use reqgraph::analysis::{analyze_conflicts, reverse, ConflictReport};
use reqgraph::export::{self, image::DEFAULT_IMAGE_PATH, ExportFormat, ExportTarget};
use reqgraph::graph::DependencyGraph;
use reqgraph::parser::{resolved_file, site_packages, ResolvedSet};
use reqgraph::trace::{self, Trace};

#[derive(Parser)]
#[command(name = "reqgraph")]
#[command(version)]
#[command(about = "Trace dependency relationships between resolved packages and report version conflicts", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["resolved", "site_packages"])))]
struct Cli {
    /// Resolved-set JSON file listing packages and their requirements
    #[arg(long, value_name = "FILE", env = "REQGRAPH_RESOLVED")]
    resolved: Option<PathBuf>,

    /// site-packages directory of an installed Python environment
    #[arg(long, value_name = "DIR", env = "REQGRAPH_SITE_PACKAGES")]
    site_packages: Option<PathBuf>,

    /// Start tracing from this package (may be repeated; defaults to every package)
    #[arg(long = "root", value_name = "NAME")]
    roots: Vec<String>,

    /// JSON filename for result output
    #[arg(short = 'j', long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Dump dependency-side packages, one per line
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,

    /// Output a Graphviz dot file (may be repeated)
    #[arg(
        long,
        value_name = "FILE",
        visible_aliases = ["pydot", "pygraphviz"],
        action = ArgAction::Append
    )]
    dot: Vec<PathBuf>,

    /// Render the graph to a PNG image with Graphviz
    #[arg(
        long,
        visible_alias = "display-graph",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_IMAGE_PATH
    )]
    display: Option<PathBuf>,

    /// Reverse the direction of edges
    #[arg(short = 'R', long)]
    reverse: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn targets(&self) -> Vec<ExportTarget> {
        let json = self.json.iter().map(|p| (ExportFormat::Json, p));
        let dump = self.dump.iter().map(|p| (ExportFormat::Dump, p));
        let dot = self.dot.iter().map(|p| (ExportFormat::Dot, p));
        let display = self.display.iter().map(|p| (ExportFormat::Png, p));

        json.chain(dump)
            .chain(dot)
            .chain(display)
            .map(|(format, path)| ExportTarget::new(format, path))
            .collect()
    }

    fn load(&self) -> Result<ResolvedSet> {
        let mut resolved = match (&self.resolved, &self.site_packages) {
            (Some(file), _) => resolved_file::load_file(file)
                .with_context(|| format!("Failed to load resolved set from {}", file.display()))?,
            (None, Some(dir)) => site_packages::load_dir(dir)
                .with_context(|| format!("Failed to load installed packages from {}", dir.display()))?,
            (None, None) => anyhow::bail!("No package source given"),
        };

        if !self.roots.is_empty() {
            resolved.set_roots(&self.roots)?;
        }
        Ok(resolved)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(trace: &Trace<'_>, conflicts: &ConflictReport, graph: &DependencyGraph) {
    println!(
        "Traced {} dependencies between {} packages.",
        graph.edge_count(),
        graph.node_count()
    );

    if !trace.is_clean() {
        println!("Skipped requirements ({}):", trace.issues.len());
        for issue in trace.invalid_requirements().chain(trace.missing_dependencies()) {
            println!("  {}", issue);
        }
    }

    print!("{}", conflicts);
    if conflicts.is_empty() {
        println!();
    }

    if graph.has_cycles() {
        let cycles = graph.get_cycle_details();
        println!("Circular dependencies ({}):", cycles.len());
        for cycle in cycles {
            println!("  {}", cycle.cycle_path());
        }
    }
}

fn log_graph(graph: &DependencyGraph) {
    for node in graph.get_all_nodes() {
        debug!(
            "{}: {} dependencies, {} dependents",
            node.label,
            graph.get_dependencies(&node.label).len(),
            graph.get_dependents(&node.label).len()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let resolved = cli.load()?;

    info!("Tracing dependencies ...");
    let roots = resolved.roots();
    let traced = trace::trace(&roots, &resolved);

    let edges = if cli.reverse {
        reverse(&traced.edges)
    } else {
        traced.edges.clone()
    };

    info!("Output result ...");
    let conflicts = analyze_conflicts(&edges);
    let graph = DependencyGraph::from_edges(&edges);
    log_graph(&graph);

    for err in export::export_all(&graph, &cli.targets()) {
        error!("{}", err);
    }

    print_summary(&traced, &conflicts, &graph);
    Ok(())
}
