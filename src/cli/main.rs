//! Boundary relation command line tool.
//!
//! Loads a GeoJSON boundary dataset, rebuilds the admin relation tree, and
//! answers ancestor, descendant, search and point queries against it.
//! Results are printed as JSON on stdout; logs go to stderr.

mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use boundary_relations::dataset::load_feature_collection;
use boundary_relations::diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
use boundary_relations::pip::{BoundarySpatialIndex, LocateService};
use boundary_relations::relations::{
    ancestors, descendants, menu_order, search, AncestorChain, BrokenLink, RelationIndex,
};
use boundary_relations::{
    BoundaryFeature, BoundaryRelation, RelationTreeBuilder, RelationTreeData,
};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "boundaries")]
#[command(about = "Build and query admin boundary relation trees")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, default_value = "boundaries.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the relation tree and print it as JSON
    Build {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Chain of relations from the root down to one relation
    Ancestors {
        #[arg(long)]
        level: usize,
        #[arg(long)]
        name: String,
        /// Parent name, to pick between same-named relations
        #[arg(long)]
        parent: Option<String>,
    },
    /// A relation and its whole subtree
    Descendants {
        #[arg(long)]
        level: usize,
        #[arg(long)]
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Free-text search with ancestors and siblings for context
    Search {
        query: String,
    },
    /// Relations in dropdown menu order with their roles
    Menu,
    /// Admin names of the boundary containing a point
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },
    /// Print data-quality diagnostics found while building
    Report,
}

#[derive(Serialize)]
struct AncestorsOutput<'a> {
    complete: bool,
    #[serde(flatten)]
    chain: AncestorChainOutput<'a>,
}

#[derive(Serialize)]
struct AncestorChainOutput<'a> {
    relations: &'a [&'a BoundaryRelation],
    #[serde(skip_serializing_if = "Option::is_none")]
    broken: Option<&'a BrokenLink>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let features =
        load_feature_collection(&config.dataset.path).context("Failed to load dataset")?;

    match args.command {
        Command::Locate { lon, lat } => {
            let index = BoundarySpatialIndex::build(features);
            let service = LocateService::new(index, config.schema());
            match service.locate(lon, lat) {
                Some(location) => print_json(&location),
                None => {
                    warn!("No boundary contains ({}, {})", lon, lat);
                    print_json(&serde_json::Value::Null)
                }
            }
        }
        Command::Report => {
            let sink = CollectingSink::new();
            let tree = build_tree(&config, &features, &sink)?;
            let diagnostics = sink.take();
            info!(
                "{} relations, {} diagnostics",
                tree.relations.len(),
                diagnostics.len()
            );
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for diagnostic in diagnostics {
                writeln!(out, "{}", diagnostic)?;
            }
            Ok(())
        }
        Command::Build { output } => {
            let tree = build_tree(&config, &features, &TracingSink)?;
            match output {
                Some(path) => write_json_file(&path, &tree),
                None => print_json(&tree),
            }
        }
        Command::Ancestors {
            level,
            name,
            parent,
        } => {
            let tree = build_tree(&config, &features, &TracingSink)?;
            let index = RelationIndex::new(&tree);
            let chain = ancestors(&index, level, &name, parent.as_deref());
            chain.report(&TracingSink);
            print_json(&ancestors_output(&chain))
        }
        Command::Descendants {
            level,
            name,
            parent,
        } => {
            let tree = build_tree(&config, &features, &TracingSink)?;
            let index = RelationIndex::new(&tree);
            let subtree = descendants(&index, level, &name, parent.as_deref())?;
            print_json(&subtree)
        }
        Command::Search { query } => {
            let tree = build_tree(&config, &features, &TracingSink)?;
            let index = RelationIndex::new(&tree);
            print_json(&search(&index, &query))
        }
        Command::Menu => {
            let tree = build_tree(&config, &features, &TracingSink)?;
            let index = RelationIndex::new(&tree);
            let entries: Vec<serde_json::Value> = menu_order(&index)?
                .into_iter()
                .map(|entry| {
                    serde_json::json!({
                        "name": entry.relation.name,
                        "level": entry.relation.level,
                        "role": entry.role,
                    })
                })
                .collect();
            print_json(&entries)
        }
    }
}

fn build_tree(
    config: &Config,
    features: &[BoundaryFeature],
    sink: &dyn DiagnosticSink,
) -> Result<RelationTreeData> {
    let schema = config.schema();
    info!(
        "Building relations for {} features over levels {:?}",
        features.len(),
        schema.keys()
    );

    let tree = RelationTreeBuilder::new(&schema)
        .with_gap_policy(config.gap_policy())
        .with_sink(sink)
        .build(features)
        .context("Failed to build relation tree")?;

    info!("Built {} relations", tree.relations.len());
    Ok(tree)
}

fn ancestors_output<'a>(chain: &'a AncestorChain<'a>) -> AncestorsOutput<'a> {
    AncestorsOutput {
        complete: chain.is_complete(),
        chain: AncestorChainOutput {
            relations: &chain.relations,
            broken: chain.broken.as_ref(),
        },
    }
}

fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
