//! Datastore Miner Ledger
//!
//! Drives long all-pairs correlation sweeps and keeps their results in an
//! append-only text ledger, so a run killed after days of work resumes
//! without recomputing or duplicating anything.
//!
//! # Components
//!
//! - **Record Module**: the 15-field ledger line and its parser
//! - **Ledger Module**: append with flush-per-record, completed-key resume
//! - **Catalogue Module**: catalogue and data-staging collaborator traits
//! - **Sweep Module**: deterministic dataset × dataset × column sweep
//! - **Table Module**: sweep over a pre-aligned variable table
//! - **Matrix Loader**: dense symmetric I2 matrix rebuilt from a ledger
//!
//! # Usage
//!
//! ```no_run
//! use datastore_miner_core::{CentroidSet, FastCorrelator, SpatialWeightModel, TracingReporter};
//! use datastore_miner_ledger::{CorrelationLedger, TableSweep, VariableTable};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let centroids = CentroidSet::from_points(vec![("A".into(), 0.0, 0.0), ("B".into(), 1.0, 0.0)])?;
//! let table = VariableTable::read_csv_file(Path::new("variables.csv"), &centroids)?;
//! let model = SpatialWeightModel::from_centroids(&centroids);
//! let correlator = FastCorrelator::new(&model);
//!
//! let mut ledger = CorrelationLedger::open("spatial_correlate.csv")?;
//! let summary = TableSweep::new(&table, &centroids, &correlator, &TracingReporter).run(&mut ledger)?;
//! println!("{} pairs computed", summary.computed);
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
pub mod error;
pub mod ledger;
pub mod matrix_loader;
pub mod record;
pub mod sweep;
pub mod table;

// Re-exports
pub use catalogue::{Catalogue, DataStager, DatasetEntry, StagedColumn, StagedFile};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{load_completed, read_records, CorrelationLedger};
pub use matrix_loader::{load_ledger_matrix, CorrelationMatrix};
pub use record::{ColumnOrigin, CorrelationKey, CorrelationRecord, RecordTag};
pub use sweep::CatalogueSweep;
pub use table::{TableSweep, VariableTable};
