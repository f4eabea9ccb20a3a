//! Error types for datastore-miner-ledger.

use std::path::PathBuf;

use datastore_miner_core::MinerError;
use thiserror::Error;

/// Error type for ledger I/O, record parsing and sweeps.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] MinerError),

    /// A ledger line that does not hold a complete record.
    #[error("Malformed ledger record: {reason}")]
    MalformedRecord { reason: String },

    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// The data stager could not provide files for a dataset.
    #[error("Staging failed for dataset {dataset}: {message}")]
    Staging { dataset: usize, message: String },
}

impl LedgerError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn staging(dataset: usize, message: impl Into<String>) -> Self {
        Self::Staging {
            dataset,
            message: message.into(),
        }
    }
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: LedgerError = MinerError::UnknownArea("E02000001".into()).into();
        assert_eq!(err.to_string(), "Unknown area key: E02000001");
    }

    #[test]
    fn test_malformed_message() {
        let err = LedgerError::malformed("expected 15 fields, found 3");
        assert!(err.to_string().contains("15 fields"));
    }
}
