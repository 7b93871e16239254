use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use modgraph::export::{self, ExportData, ExportFormat};
use modgraph::graph::{DependencyGraph, DEFAULT_TREE_DEPTH};
use modgraph::manifest::{self, Manifest};

#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Dependency resolution for template and module registries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest; exits non-zero if cycles or missing templates are found
    Check {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Output format (text, json, markdown)
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
    /// Print a dependency-first load order
    Order {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Templates to order (defaults to every template)
        ids: Vec<String>,
    },
    /// Print the dependency tree of one template as JSON
    Tree {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Template id
        id: String,

        /// Depth at which expansion stops
        #[arg(short = 'd', long, default_value_t = DEFAULT_TREE_DEPTH)]
        max_depth: usize,
    },
    /// Print graph statistics as JSON
    Stats {
        /// Path to the manifest JSON file
        manifest: PathBuf,
    },
    /// Write a full report
    Export {
        /// Path to the manifest JSON file
        manifest: PathBuf,

        /// Output format (text, json, markdown)
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MODGRAPH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("modgraph=warn"));

    let format = env::var("MODGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn load(path: &Path) -> anyhow::Result<(Manifest, DependencyGraph)> {
    let manifest = manifest::parse_file(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    let graph = manifest
        .to_graph()
        .with_context(|| format!("failed to register templates from {}", path.display()))?;
    Ok((manifest, graph))
}

fn project_name(manifest: &Manifest, path: &Path) -> String {
    manifest.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "templates".to_string())
    })
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check { manifest, format } => {
            let (parsed, graph) = load(&manifest)?;
            let data = ExportData::new(project_name(&parsed, &manifest), &graph);
            export::export(format, &data, &mut stdout)?;
            if !data.report.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Order { manifest, ids } => {
            let (_, graph) = load(&manifest)?;
            let order = if ids.is_empty() {
                graph.full_load_order()
            } else {
                graph.load_order(&ids)
            };
            if graph.has_cycles() {
                tracing::warn!("graph contains cycles; load order is best-effort");
            }
            for id in order {
                writeln!(stdout, "{}", id)?;
            }
        }
        Commands::Tree {
            manifest,
            id,
            max_depth,
        } => {
            let (_, graph) = load(&manifest)?;
            let tree = graph
                .dependency_tree(&id, max_depth)
                .with_context(|| format!("unknown template '{}'", id))?;
            serde_json::to_writer_pretty(&mut stdout, &tree)?;
            writeln!(stdout)?;
        }
        Commands::Stats { manifest } => {
            let (_, graph) = load(&manifest)?;
            serde_json::to_writer_pretty(&mut stdout, &graph.stats())?;
            writeln!(stdout)?;
        }
        Commands::Export {
            manifest,
            format,
            output,
        } => {
            let (parsed, graph) = load(&manifest)?;
            let data = ExportData::new(project_name(&parsed, &manifest), &graph);
            match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    export::export(format, &data, &mut file)?;
                    eprintln!("📄 Report written to {}", path.display());
                }
                None => export::export(format, &data, &mut stdout)?,
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
