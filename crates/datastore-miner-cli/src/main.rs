//! `datastore-miner` binary.

use std::process;

use clap::Parser;
use datastore_miner_cli::commands::{cluster, compare, correlate, export};
use datastore_miner_cli::{logging, Cli, Commands};
use datastore_miner_core::MinerConfig;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MinerConfig::from_file(path),
        None => MinerConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    logging::init(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "datastore-miner starting");

    let code = match cli.command {
        Commands::Correlate(args) => correlate::handle_correlate(args, &config),
        Commands::Cluster(args) => cluster::handle_cluster(args, &config),
        Commands::Export(args) => export::handle_export(args, &config),
        Commands::Compare(args) => compare::handle_compare(args, &config),
    };
    process::exit(code);
}
