//! Contracts for the collaborators a sweep reads from.
//!
//! A [`Catalogue`] lists datasets. A [`DataStager`] turns one dataset into
//! local files whose columns are already keyed by area. Downloading,
//! unzipping and format sniffing all happen behind these traits.

use std::collections::BTreeMap;

use datastore_miner_core::{AreaKey, VariableVector};
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;

/// One catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub title: String,
    /// Where the data lives. Empty when the row has no data.
    pub link: String,
    pub unique_key: String,
}

impl DatasetEntry {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        unique_key: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            unique_key: unique_key.into(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.link.trim().is_empty()
    }
}

/// Ordered list of datasets. Dataset indices in ledger keys are positions
/// in this list, so it must be stable between runs.
pub trait Catalogue: Send + Sync {
    fn datasets(&self) -> Vec<DatasetEntry>;
}

/// Provides the local data files of a dataset.
pub trait DataStager: Send + Sync {
    /// Files of `dataset` in a stable order. `index` is its catalogue
    /// position.
    fn stage(&self, index: usize, dataset: &DatasetEntry) -> LedgerResult<Vec<StagedFile>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub name: String,
    pub columns: Vec<StagedColumn>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, columns: Vec<StagedColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A data column keyed by area. `values` is `None` for a column that is
/// not numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedColumn {
    pub name: String,
    pub values: Option<VariableVector>,
}

impl StagedColumn {
    pub fn numeric(values: VariableVector) -> Self {
        Self {
            name: values.name().to_string(),
            values: Some(values),
        }
    }

    pub fn non_numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: None,
        }
    }

    /// Parse raw cells. Blank cells are dropped; any other cell that is
    /// not a number makes the whole column non-numeric.
    pub fn from_cells<'a, I>(name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let name = name.into();
        let mut values: BTreeMap<AreaKey, f64> = BTreeMap::new();
        for (area, cell) in cells {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => {
                    values.insert(area.to_string(), v);
                }
                _ => return Self::non_numeric(name),
            }
        }
        Self::numeric(VariableVector::from_pairs(name, values))
    }

    pub fn is_numeric(&self) -> bool {
        self.values.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells() {
        let col = StagedColumn::from_cells("pop", [("A", "1.5"), ("B", " "), ("C", "3")]);
        assert!(col.is_numeric());
        let values = col.values.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("C"), Some(3.0));

        let col = StagedColumn::from_cells("name", [("A", "1"), ("B", "Camden")]);
        assert!(!col.is_numeric());
        assert_eq!(col.name, "name");
    }

    #[test]
    fn test_has_data() {
        assert!(DatasetEntry::new("t", "http://x/y.zip", "k").has_data());
        assert!(!DatasetEntry::new("t", "  ", "k").has_data());
    }
}
