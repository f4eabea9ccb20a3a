//! CLI command handlers
//!
//! # Commands
//!
//! - `correlate`: sweep a variable table into the correlation ledger
//! - `cluster`: threshold cut or cut profile of the ledger matrix
//! - `export`: ledger matrix as a Pajek or GEXF network
//! - `compare`: comparison statistics between two ledgers
//!
//! Every handler returns a process exit code: 0 on success, 1 on error.

pub mod cluster;
pub mod compare;
pub mod correlate;
pub mod export;

use tracing::error;

/// Map a handler result to an exit code, reporting the error chain.
pub(crate) fn exit_code(command: &str, result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(command, error = %format!("{:#}", e), "command failed");
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
