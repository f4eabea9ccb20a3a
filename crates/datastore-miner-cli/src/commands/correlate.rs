//! `correlate`: all-pairs Moran's I over a variable table.
//!
//! Results are appended to the ledger. Pairs already there are skipped, so
//! rerunning an interrupted command picks up where it stopped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datastore_miner_core::{
    BivariateCorrelator, CorrelatorVariant, ExactCorrelator, FastCorrelator,
    KNearestNeighbourIndex, KnnCorrelator, MinerConfig, SpatialWeightModel, SweepSummary,
    TracingReporter,
};
use datastore_miner_ledger::{CorrelationLedger, TableSweep, VariableTable};
use tracing::info;

use super::{exit_code, print_json};
use crate::centroids::read_centroids_file;

/// Arguments for the correlate command.
#[derive(Args, Debug, Clone)]
pub struct CorrelateArgs {
    /// Centroid CSV with columns key,x,y
    #[arg(long)]
    pub centroids: PathBuf,

    /// Variable CSV: area key in the first column, one variable per column
    #[arg(long)]
    pub table: PathBuf,

    /// exact, fast or knn (default from config)
    #[arg(long)]
    pub variant: Option<String>,

    /// Neighbour count for the knn variant (default from config)
    #[arg(short = 'k', long)]
    pub neighbours: Option<usize>,

    /// Ledger file (default from config)
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Dataset ordinal for this table's keys; give each table sharing a
    /// ledger its own
    #[arg(long, default_value_t = 0)]
    pub dataset: usize,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_correlate(args: CorrelateArgs, config: &MinerConfig) -> i32 {
    let json = args.json;
    exit_code(
        "correlate",
        run_correlate(&args, config).and_then(|summary| {
            if json {
                print_json(&summary)
            } else {
                print_summary(&summary);
                Ok(())
            }
        }),
    )
}

/// Run the sweep and return its summary.
pub fn run_correlate(args: &CorrelateArgs, config: &MinerConfig) -> Result<SweepSummary> {
    let variant: CorrelatorVariant = match &args.variant {
        Some(v) => v.parse()?,
        None => config.correlation.variant,
    };
    let neighbours = args.neighbours.unwrap_or(config.correlation.neighbours);
    let ledger_path = args.ledger.clone().unwrap_or_else(|| config.ledger.path.clone());

    let centroids = read_centroids_file(&args.centroids)?;
    let table = VariableTable::read_csv_file(&args.table, &centroids)
        .with_context(|| format!("cannot load variable table {}", args.table.display()))?;
    let mut ledger = CorrelationLedger::open(&ledger_path)
        .with_context(|| format!("cannot open ledger {}", ledger_path.display()))?;
    info!(
        variant = %variant,
        dataset = args.dataset,
        variables = table.len(),
        ledger = %ledger_path.display(),
        "correlating"
    );

    let mut sweep = |correlator: &dyn BivariateCorrelator| -> Result<SweepSummary> {
        Ok(TableSweep::new(&table, &centroids, correlator, &TracingReporter)
            .with_dataset(args.dataset)
            .run(&mut ledger)?)
    };
    match variant {
        CorrelatorVariant::Exact => sweep(&ExactCorrelator::new()),
        CorrelatorVariant::Fast => {
            let model = SpatialWeightModel::from_centroids(&centroids);
            sweep(&FastCorrelator::new(&model))
        }
        CorrelatorVariant::Knn => {
            let index = KNearestNeighbourIndex::build(neighbours, &centroids)?;
            let correlator = KnnCorrelator::new(&index).with_weights(
                config.correlation.self_weight,
                config.correlation.neighbour_weight,
            );
            sweep(&correlator)
        }
    }
}

fn print_summary(summary: &SweepSummary) {
    println!("Correlation sweep");
    println!("  computed:            {}", summary.computed);
    println!("  already in ledger:   {}", summary.skipped_existing);
    println!("  non-numeric columns: {}", summary.skipped_non_numeric);
    println!("  degenerate skips:    {}", summary.skipped_degenerate);
    println!("  degenerate results:  {}", summary.degenerate_results);
    println!("  unique variables:    {}", summary.unique_variables);
}
