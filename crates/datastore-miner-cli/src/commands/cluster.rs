//! `cluster`: threshold cut of the ledger's correlation matrix.
//!
//! With `--profile` the command sweeps a threshold range instead and prints
//! cluster count and average degree per threshold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datastore_miner_core::{MinerConfig, TracingReporter};
use datastore_miner_graph::clustering::threshold_range;
use datastore_miner_graph::{CutProfileRow, ThresholdClusterer};
use datastore_miner_ledger::{load_ledger_matrix, CorrelationMatrix};
use serde::Serialize;

use super::{exit_code, print_json};

/// Arguments for the cluster command.
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Ledger file (default from config)
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Cut threshold (default from config)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Sweep thresholds from config sweep_start to sweep_end
    #[arg(long)]
    pub profile: bool,

    /// Output as JSON instead of human-readable
    #[arg(long)]
    pub json: bool,
}

/// One group of a single cut, by variable name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCluster {
    pub group: i32,
    pub members: Vec<String>,
}

/// What the command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClusterOutput {
    Cut { threshold: f32, clusters: Vec<NamedCluster> },
    Profile(Vec<CutProfileRow>),
}

pub fn handle_cluster(args: ClusterArgs, config: &MinerConfig) -> i32 {
    let json = args.json;
    exit_code(
        "cluster",
        run_cluster(&args, config).and_then(|output| {
            if json {
                print_json(&output)
            } else {
                print_output(&output);
                Ok(())
            }
        }),
    )
}

pub fn run_cluster(args: &ClusterArgs, config: &MinerConfig) -> Result<ClusterOutput> {
    let path = args.ledger.clone().unwrap_or_else(|| config.ledger.path.clone());
    let matrix = load_ledger_matrix(&path)
        .with_context(|| format!("cannot load ledger {}", path.display()))?;
    let clusterer = ThresholdClusterer::new(&TracingReporter);

    if args.profile {
        let c = &config.clustering;
        let thresholds = threshold_range(c.sweep_start, c.sweep_end, c.sweep_step);
        return Ok(ClusterOutput::Profile(
            clusterer.profile(&matrix.matrix, &thresholds),
        ));
    }

    let threshold = args.threshold.unwrap_or(config.clustering.threshold);
    Ok(ClusterOutput::Cut {
        threshold,
        clusters: named_clusters(&clusterer, &matrix, threshold),
    })
}

fn named_clusters(
    clusterer: &ThresholdClusterer<'_>,
    matrix: &CorrelationMatrix,
    threshold: f32,
) -> Vec<NamedCluster> {
    let cut = clusterer.cluster_cut(&matrix.matrix, threshold);
    (0..cut.cluster_count() as i32)
        .map(|group| NamedCluster {
            group,
            members: cut
                .members(group)
                .into_iter()
                .map(|i| matrix.names[i].clone())
                .collect(),
        })
        .collect()
}

fn print_output(output: &ClusterOutput) {
    match output {
        ClusterOutput::Cut {
            threshold,
            clusters,
        } => {
            println!("{} clusters at threshold {}", clusters.len(), threshold);
            for c in clusters {
                println!("  [{}] ({}) {}", c.group, c.members.len(), c.members.join(", "));
            }
        }
        ClusterOutput::Profile(rows) => {
            println!("{:>10} {:>10} {:>14}", "threshold", "clusters", "avg degree");
            for row in rows {
                println!(
                    "{:>10.3} {:>10} {:>14.3}",
                    row.threshold, row.clusters, row.average_degree
                );
            }
        }
    }
}
