//! Sweep over a table of columns already aligned to the centroid order.
//!
//! Loading every variable into one table up front trades memory for not
//! re-joining on area keys for each pair, which is what lets the fast and
//! nearest-neighbour variants run over the full geography. Results go to the
//! same ledger format with both dataset indices set to the table's dataset
//! ordinal (`0` unless given), column indices `i/j` and the table name as
//! file name. Tables sharing one ledger need distinct ordinals or the later
//! table's pairs read as already done.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use datastore_miner_core::progress::{ProgressEvent, ProgressReporter, SweepSummary};
use datastore_miner_core::{
    BivariateCorrelator, CentroidSet, JoinedColumns, MinerError, VariableVector,
};
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::CorrelationLedger;
use crate::record::{ColumnOrigin, CorrelationKey};
use crate::sweep::{PairRunner, Tally};

/// Named numeric columns, each one value per centroid in centroid order.
#[derive(Debug, Clone)]
pub struct VariableTable {
    name: String,
    areas: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl VariableTable {
    pub fn new(name: impl Into<String>, centroids: &CentroidSet) -> Self {
        Self {
            name: name.into(),
            areas: centroids.len(),
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, i: usize) -> Option<&[f64]> {
        self.columns.get(i).map(Vec::as_slice)
    }

    /// Append a column already in centroid order.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` when `values` does not have one entry per area.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> LedgerResult<()> {
        if values.len() != self.areas {
            return Err(MinerError::length_mismatch("table column", self.areas, values.len()).into());
        }
        self.names.push(name.into());
        self.columns.push(values);
        Ok(())
    }

    /// Append an area-keyed column, aligning it to `centroids`.
    ///
    /// # Errors
    ///
    /// `MissingArea` when the column has no value for some centroid.
    pub fn push_vector(&mut self, vector: &VariableVector, centroids: &CentroidSet) -> LedgerResult<()> {
        let values = vector.align(centroids)?;
        self.push_column(vector.name(), values)
    }

    /// Read a CSV whose first column is the area key and whose other
    /// columns are variables.
    ///
    /// Rows for areas outside `centroids` are ignored. Columns with a
    /// non-numeric cell or with no value for some centroid are dropped
    /// with a warning.
    pub fn read_csv<R: Read>(
        name: impl Into<String>,
        reader: R,
        centroids: &CentroidSet,
    ) -> LedgerResult<Self> {
        let mut table = Self::new(name, centroids);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| LedgerError::csv(table.name.as_str(), e))?
            .iter()
            .skip(1)
            .map(str::to_owned)
            .collect();
        let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; centroids.len()]; headers.len()];
        let mut numeric = vec![true; headers.len()];

        for row in rdr.records() {
            let row = row.map_err(|e| LedgerError::csv(table.name.as_str(), e))?;
            let Some(area) = row.get(0).and_then(|key| centroids.index_of(key)) else {
                continue;
            };
            for (c, cell) in row.iter().skip(1).enumerate() {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(v) if v.is_finite() => cells[c][area] = Some(v),
                    _ => numeric[c] = false,
                }
            }
        }

        for ((header, column), is_numeric) in headers.into_iter().zip(cells).zip(numeric) {
            if !is_numeric {
                warn!(table = %table.name, column = %header, "dropping non-numeric column");
                continue;
            }
            match column.into_iter().collect::<Option<Vec<f64>>>() {
                Some(values) => table.push_column(header, values)?,
                None => {
                    warn!(table = %table.name, column = %header, "dropping column with missing areas")
                }
            }
        }
        info!(table = %table.name, columns = table.len(), areas = table.areas, "variable table loaded");
        Ok(table)
    }

    /// [`VariableTable::read_csv`] from a file; the table takes the file
    /// name.
    pub fn read_csv_file(path: &Path, centroids: &CentroidSet) -> LedgerResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = std::fs::File::open(path)?;
        Self::read_csv(name, file, centroids)
    }
}

/// Correlates every column pair `i <= j` of a [`VariableTable`].
pub struct TableSweep<'a> {
    table: &'a VariableTable,
    dataset: usize,
    centroids: &'a CentroidSet,
    correlator: &'a dyn BivariateCorrelator,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> TableSweep<'a> {
    pub fn new(
        table: &'a VariableTable,
        centroids: &'a CentroidSet,
        correlator: &'a dyn BivariateCorrelator,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            table,
            dataset: 0,
            centroids,
            correlator,
            reporter,
        }
    }

    /// Dataset ordinal written into both key halves.
    pub fn with_dataset(mut self, dataset: usize) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn run(&self, ledger: &mut CorrelationLedger) -> LedgerResult<SweepSummary> {
        if self.table.areas != self.centroids.len() {
            return Err(MinerError::length_mismatch(
                "table areas",
                self.centroids.len(),
                self.table.areas,
            )
            .into());
        }
        let runner = PairRunner {
            correlator: self.correlator,
            reporter: self.reporter,
            started: Instant::now(),
        };
        let n = self.table.len();
        let total = n * (n + 1) / 2;
        info!(
            table = %self.table.name,
            dataset = self.dataset,
            columns = n,
            pairs = total,
            variant = %self.correlator.variant(),
            "table sweep started"
        );

        let mut tally = Tally::default();
        let mut done = 0usize;
        for i in 0..n {
            for j in i..n {
                done += 1;
                let key = CorrelationKey::new(self.dataset, self.dataset, i, j);
                if ledger.is_completed(&key) {
                    tally.summary.skipped_existing += 1;
                    runner.skip(key, "already in ledger");
                    continue;
                }
                let joined = JoinedColumns::from_aligned(
                    self.table.columns[i].clone(),
                    self.table.columns[j].clone(),
                    self.centroids,
                )?;
                let outcome = runner.run_pair(
                    ledger,
                    key,
                    &joined,
                    ColumnOrigin::new(self.table.name.as_str(), self.table.names[i].as_str()),
                    ColumnOrigin::new(self.table.name.as_str(), self.table.names[j].as_str()),
                )?;
                tally.record(key, outcome);
            }
            runner.progress(done, total);
        }

        let summary = tally.finish();
        self.reporter.report(ProgressEvent::Summary(summary.clone()));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CentroidSet {
        CentroidSet::from_points(vec![
            ("A".to_string(), 0.0, 0.0),
            ("B".to_string(), 1.0, 0.0),
            ("C".to_string(), 2.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_push_column_length_checked() {
        let mut table = VariableTable::new("t", &line());
        table.push_column("ok", vec![1.0, 2.0, 3.0]).unwrap();
        assert!(table.push_column("short", vec![1.0]).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_read_csv_drops_bad_columns() {
        let csv = "area,pop,label,partial\n\
                   C,3,x,1\n\
                   A,1,y,2\n\
                   Z,9,z,3\n\
                   B,2,w,\n";
        let table = VariableTable::read_csv("t.csv", csv.as_bytes(), &line()).unwrap();
        assert_eq!(table.column_names(), ["pop".to_string()]);
        assert_eq!(table.column(0), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_push_vector_needs_every_area() {
        let centroids = line();
        let mut table = VariableTable::new("t", &centroids);
        let full = VariableVector::from_pairs("full", [("A", 1.0), ("B", 2.0), ("C", 3.0)]);
        let gap = VariableVector::from_pairs("gap", [("A", 1.0)]);
        table.push_vector(&full, &centroids).unwrap();
        assert!(table.push_vector(&gap, &centroids).is_err());
    }
}
