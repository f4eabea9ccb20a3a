//! Datastore Miner CLI
//!
//! Library half of the `datastore-miner` binary: argument types, command
//! handlers and the centroid reader, kept here so integration tests can
//! drive commands without spawning a process.

pub mod centroids;
pub mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cluster::ClusterArgs;
use commands::compare::CompareArgs;
use commands::correlate::CorrelateArgs;
use commands::export::ExportArgs;

/// Spatial correlation miner for area-keyed open data.
#[derive(Parser, Debug)]
#[command(name = "datastore-miner", version, about)]
pub struct Cli {
    /// TOML configuration file (default: config/ directory and environment)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Correlate every pair of variables in a table into the ledger
    Correlate(CorrelateArgs),
    /// Cluster the ledger's correlation matrix by threshold cut
    Cluster(ClusterArgs),
    /// Write the ledger's correlation matrix as a Pajek or GEXF network
    Export(ExportArgs),
    /// Compare two ledgers' correlation matrices
    Compare(CompareArgs),
}
