//! Dense correlation matrix rebuilt from a ledger.

use std::collections::HashMap;
use std::path::Path;

use datastore_miner_core::SquareMatrix;
use tracing::info;

use crate::error::LedgerResult;
use crate::ledger::read_records;
use crate::record::CorrelationRecord;

/// Variable names and their pairwise I2 values.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub matrix: SquareMatrix<f32>,
}

impl CorrelationMatrix {
    /// Build from records in order.
    ///
    /// Names get indices by first appearance, column I before column J
    /// within a record. Each finite I2 is written to both `M[i][j]` and
    /// `M[j][i]`; cells with no finite value stay 0.
    pub fn from_records<'r, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r CorrelationRecord>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut cells: Vec<(usize, usize, f32)> = Vec::new();

        let mut slot = |name: &str, names: &mut Vec<String>| -> usize {
            if let Some(&i) = index.get(name) {
                return i;
            }
            let i = names.len();
            index.insert(name.to_string(), i);
            names.push(name.to_string());
            i
        };

        for record in records {
            let i = slot(&record.origin_i.column_name, &mut names);
            let j = slot(&record.origin_j.column_name, &mut names);
            if record.i2.is_finite() {
                cells.push((i, j, record.i2 as f32));
            }
        }

        let mut matrix = SquareMatrix::zeros(names.len());
        for (i, j, value) in cells {
            matrix.set_symmetric(i, j, value);
        }
        Self { names, matrix }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f32> {
        Some(self.matrix.get(self.index_of(a)?, self.index_of(b)?))
    }
}

/// Read the ledger at `path` into a [`CorrelationMatrix`].
///
/// A missing ledger gives an empty matrix.
pub fn load_ledger_matrix(path: &Path) -> LedgerResult<CorrelationMatrix> {
    let records = read_records(path)?;
    let matrix = CorrelationMatrix::from_records(&records);
    info!(
        path = %path.display(),
        records = records.len(),
        variables = matrix.len(),
        "correlation matrix loaded"
    );
    Ok(matrix)
}
