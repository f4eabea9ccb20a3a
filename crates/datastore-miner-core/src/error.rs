//! Error types for datastore-miner-core.

use thiserror::Error;

/// Top-level error type for datastore-miner-core.
#[derive(Debug, Error)]
pub enum MinerError {
    /// Two arrays that must be aligned index-for-index have different lengths.
    #[error("Length mismatch for {what}: expected {expected}, actual {actual}")]
    LengthMismatch {
        /// Which input was out of step
        what: &'static str,
        /// Length required by the other inputs
        expected: usize,
        /// Length actually provided
        actual: usize,
    },

    /// An area key was not present in the centroid set.
    #[error("Unknown area key: {0}")]
    UnknownArea(String),

    /// A variable has no value for an area the caller required.
    #[error("Missing value for area {area} in variable {variable}")]
    MissingArea {
        /// Variable (column) name
        variable: String,
        /// Area key with no value
        area: String,
    },

    /// The same area key appeared twice in a centroid list.
    #[error("Duplicate area key: {0}")]
    DuplicateArea(String),

    /// K nearest neighbours cannot be satisfied by the number of areas.
    #[error("Invalid neighbour count: k={k} needs more than {k} areas, have {areas}")]
    InvalidNeighbourCount {
        /// Requested neighbour count
        k: usize,
        /// Number of areas available
        areas: usize,
    },

    /// A computation produced NaN or infinity.
    #[error("Numeric degeneracy in {context}: {value}")]
    NumericDegeneracy {
        /// What was being computed
        context: String,
        /// The offending value
        value: f64,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MinerError {
    /// Create a LengthMismatch error.
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Create a MissingArea error.
    pub fn missing_area(variable: impl Into<String>, area: impl Into<String>) -> Self {
        Self::MissingArea {
            variable: variable.into(),
            area: area.into(),
        }
    }

    /// Create a NumericDegeneracy error.
    pub fn degenerate(context: impl Into<String>, value: f64) -> Self {
        Self::NumericDegeneracy {
            context: context.into(),
            value,
        }
    }
}

impl From<serde_json::Error> for MinerError {
    fn from(err: serde_json::Error) -> Self {
        MinerError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for MinerError {
    fn from(err: config::ConfigError) -> Self {
        MinerError::ConfigError(err.to_string())
    }
}

/// Result type alias for core operations.
pub type MinerResult<T> = Result<T, MinerError>;

/// Reject NaN and infinite values.
///
/// Used at the boundary where a correlation value is about to be persisted.
pub fn ensure_finite(context: &str, value: f64) -> MinerResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MinerError::degenerate(context, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MinerError::length_mismatch("y", 10, 9);
        let msg = err.to_string();
        assert!(msg.contains("expected 10"));
        assert!(msg.contains("actual 9"));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("i2", 0.25).unwrap(), 0.25);
        assert!(matches!(
            ensure_finite("i2", f64::NAN),
            Err(MinerError::NumericDegeneracy { .. })
        ));
        assert!(ensure_finite("i2", f64::INFINITY).is_err());
    }

    #[test]
    fn test_neighbour_count_message() {
        let err = MinerError::InvalidNeighbourCount { k: 5, areas: 3 };
        assert!(err.to_string().contains("k=5"));
        assert!(err.to_string().contains("have 3"));
    }
}
