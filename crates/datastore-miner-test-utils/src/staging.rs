//! In-memory catalogue and data stager.

use std::collections::{BTreeMap, BTreeSet};

use datastore_miner_core::CentroidSet;
use datastore_miner_ledger::{
    Catalogue, DataStager, DatasetEntry, LedgerError, LedgerResult, StagedColumn, StagedFile,
};
use parking_lot::Mutex;

use crate::fixtures::{constant_column, gradient_column, random_column};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    pub datasets: Vec<DatasetEntry>,
}

impl InMemoryCatalogue {
    pub fn new(datasets: Vec<DatasetEntry>) -> Self {
        Self { datasets }
    }
}

impl Catalogue for InMemoryCatalogue {
    fn datasets(&self) -> Vec<DatasetEntry> {
        self.datasets.clone()
    }
}

/// Serves prepared files per dataset index and counts staging calls.
#[derive(Debug, Default)]
pub struct InMemoryStager {
    files: BTreeMap<usize, Vec<StagedFile>>,
    failing: BTreeSet<usize>,
    calls: Mutex<Vec<usize>>,
}

impl InMemoryStager {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_files(mut self, dataset: usize, files: Vec<StagedFile>) -> Self {
        self.files.insert(dataset, files);
        self
    }

    /// Staging `dataset` returns an error.
    #[must_use]
    pub fn failing(mut self, dataset: usize) -> Self {
        self.failing.insert(dataset);
        self
    }

    /// Dataset indices in the order they were staged.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }
}

impl DataStager for InMemoryStager {
    fn stage(&self, index: usize, _dataset: &DatasetEntry) -> LedgerResult<Vec<StagedFile>> {
        self.calls.lock().push(index);
        if self.failing.contains(&index) {
            return Err(LedgerError::staging(index, "archive is corrupt"));
        }
        Ok(self.files.get(&index).cloned().unwrap_or_default())
    }
}

/// Four datasets over `centroids`:
///
/// - 0: `census.csv` with `east` (gradient), `name` (text), `noise`
/// - 1: `a.csv` with `north` (gradient) and `b.csv` with `flat` (constant)
///   and `noise2`
/// - 2: no data link
/// - 3: `c.csv` with `diag` (gradient)
pub fn sample_catalogue(centroids: &CentroidSet) -> (InMemoryCatalogue, InMemoryStager) {
    let catalogue = InMemoryCatalogue::new(vec![
        DatasetEntry::new("Census", "http://data/census.zip", "census"),
        DatasetEntry::new("Survey", "http://data/survey.zip", "survey"),
        DatasetEntry::new("Empty", "", "empty"),
        DatasetEntry::new("Roads", "http://data/roads.csv", "roads"),
    ]);
    let stager = InMemoryStager::new()
        .with_files(
            0,
            vec![StagedFile::new(
                "census.csv",
                vec![
                    StagedColumn::numeric(gradient_column("east", centroids, 1.0, 0.0)),
                    StagedColumn::non_numeric("name"),
                    StagedColumn::numeric(random_column("noise", centroids, 11)),
                ],
            )],
        )
        .with_files(
            1,
            vec![
                StagedFile::new(
                    "a.csv",
                    vec![StagedColumn::numeric(gradient_column(
                        "north", centroids, 0.0, 1.0,
                    ))],
                ),
                StagedFile::new(
                    "b.csv",
                    vec![
                        StagedColumn::numeric(constant_column("flat", centroids, 5.0)),
                        StagedColumn::numeric(random_column("noise2", centroids, 12)),
                    ],
                ),
            ],
        )
        .with_files(
            3,
            vec![StagedFile::new(
                "c.csv",
                vec![StagedColumn::numeric(gradient_column(
                    "diag", centroids, 1.0, 1.0,
                ))],
            )],
        );
    (catalogue, stager)
}
