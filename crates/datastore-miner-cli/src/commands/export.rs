//! `export`: ledger correlation matrix as a network file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datastore_miner_core::MinerConfig;
use datastore_miner_graph::{correlation_graph, ExportFormat};
use datastore_miner_ledger::load_ledger_matrix;

use super::exit_code;

/// Arguments for the export command.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Ledger file (default from config)
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// pajek or gexf (default from config)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Minimum correlation for an edge (default from config)
    #[arg(short, long)]
    pub threshold: Option<f32>,
}

/// Counts of what was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub format: ExportFormat,
    pub vertices: usize,
    pub edges: usize,
}

pub fn handle_export(args: ExportArgs, config: &MinerConfig) -> i32 {
    let output = args.output.clone();
    exit_code(
        "export",
        run_export(&args, config).map(|report| {
            println!(
                "Wrote {} vertices and {} edges to {} ({})",
                report.vertices,
                report.edges,
                output.display(),
                report.format
            );
        }),
    )
}

pub fn run_export(args: &ExportArgs, config: &MinerConfig) -> Result<ExportReport> {
    let format: ExportFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.export.format)
        .parse()?;
    let threshold = args.threshold.unwrap_or(config.export.threshold);
    let path = args.ledger.clone().unwrap_or_else(|| config.ledger.path.clone());

    let matrix = load_ledger_matrix(&path)
        .with_context(|| format!("cannot load ledger {}", path.display()))?;
    let graph = correlation_graph(&matrix.matrix, &matrix.names, threshold)?;
    format
        .write_file(&graph, &args.output)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    Ok(ExportReport {
        format,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    })
}
