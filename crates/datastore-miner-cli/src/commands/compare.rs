//! `compare`: how far one correlation ledger is from another.
//!
//! Typically the nearest-neighbour ledger against the exact one. The second
//! matrix is laid out on the first one's variable order; variables missing
//! from it read as 0.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datastore_miner_core::stats::MatrixComparison;
use datastore_miner_core::{MinerConfig, SquareMatrix};
use datastore_miner_ledger::{load_ledger_matrix, CorrelationMatrix};
use tracing::warn;

use super::{exit_code, print_json};

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Reference ledger
    pub reference: PathBuf,

    /// Ledger to compare against the reference
    pub candidate: PathBuf,

    /// Output as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

pub fn handle_compare(args: CompareArgs, _config: &MinerConfig) -> i32 {
    let json = args.json;
    exit_code(
        "compare",
        run_compare(&args).and_then(|cmp| {
            if json {
                print_json(&cmp)
            } else {
                print_comparison(&cmp);
                Ok(())
            }
        }),
    )
}

pub fn run_compare(args: &CompareArgs) -> Result<MatrixComparison> {
    let reference = load_ledger_matrix(&args.reference)
        .with_context(|| format!("cannot load ledger {}", args.reference.display()))?;
    let candidate = load_ledger_matrix(&args.candidate)
        .with_context(|| format!("cannot load ledger {}", args.candidate.display()))?;

    let mut x = reference.matrix.clone();
    let mut y = align_to(&candidate, &reference.names);
    x.replace_nan(0.0);
    y.replace_nan(0.0);
    Ok(MatrixComparison::compute(&x, &y)?)
}

/// `matrix` re-indexed by `names`.
pub fn align_to(matrix: &CorrelationMatrix, names: &[String]) -> SquareMatrix<f32> {
    let index: Vec<Option<usize>> = names.iter().map(|n| matrix.index_of(n)).collect();
    let missing = index.iter().filter(|i| i.is_none()).count();
    if missing > 0 {
        warn!(missing, "variables absent from compared ledger read as 0");
    }
    let mut out = SquareMatrix::zeros(names.len());
    for (a, ia) in index.iter().enumerate() {
        for (b, ib) in index.iter().enumerate() {
            if let (Some(ia), Some(ib)) = (ia, ib) {
                out.set(a, b, matrix.matrix.get(*ia, *ib));
            }
        }
    }
    out
}

fn print_comparison(c: &MatrixComparison) {
    let rows = [
        ("mean (reference)", c.mean_x),
        ("mean (candidate)", c.mean_y),
        ("sd (reference)", c.sd_x),
        ("sd (candidate)", c.sd_y),
        ("correlation", c.correlation),
        ("rmse", c.rmse),
        ("chi squared", c.chi_squared),
        ("sorensen-dice", c.sorensen_dice),
        ("jaccard", c.jaccard),
        ("sum of ratios", c.sum_of_ratios),
        ("average ratio", c.average_ratio),
        ("abs difference", c.absolute_difference),
        ("avg abs difference", c.average_absolute_difference),
        ("abs % difference", c.absolute_percent_difference),
        ("avg abs % difference", c.average_absolute_percent_difference),
        ("entropy (reference)", c.entropy_x),
        ("entropy (candidate)", c.entropy_y),
        ("information difference", c.information_difference),
    ];
    for (name, value) in rows {
        println!("{:<24} {:>12.6}", name, value);
    }
}
