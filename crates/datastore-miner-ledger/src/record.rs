//! One line of the correlation ledger.
//!
//! ```text
//! tag,I,I2,di,dj,ci,cj,fileI,fileJ,colI,colJ,countX,countY,countCentroids,elapsedMs
//! Correlate,,-0.3333,0,2,1,4,a.csv,b.csv,pop,age,5,5,5,812
//! ```
//!
//! Fields are never quoted. Names have `,` replaced by `;` on the way in so
//! a record always splits into exactly [`FIELD_COUNT`] fields.

use std::fmt;
use std::str::FromStr;

use datastore_miner_core::MoranPair;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Fields per ledger line.
pub const FIELD_COUNT: usize = 15;

/// Identity of one correlated pair: dataset indices and ordinal column
/// indices within each dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationKey {
    pub dataset_i: usize,
    pub dataset_j: usize,
    pub column_i: usize,
    pub column_j: usize,
}

impl CorrelationKey {
    pub fn new(dataset_i: usize, dataset_j: usize, column_i: usize, column_j: usize) -> Self {
        Self {
            dataset_i,
            dataset_j,
            column_i,
            column_j,
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.dataset_i, self.dataset_j, self.column_i, self.column_j
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordTag {
    /// Finite correlation.
    Correlate,
    /// I2 came out NaN or infinite. The key still counts as done.
    Degenerate,
}

impl RecordTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTag::Correlate => "Correlate",
            RecordTag::Degenerate => "Degenerate",
        }
    }
}

impl FromStr for RecordTag {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Correlate" => Ok(RecordTag::Correlate),
            "Degenerate" => Ok(RecordTag::Degenerate),
            other => Err(LedgerError::malformed(format!("unknown tag \"{}\"", other))),
        }
    }
}

/// Where a column came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOrigin {
    pub file_name: String,
    pub column_name: String,
}

impl ColumnOrigin {
    pub fn new(file_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            column_name: column_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRecord {
    pub tag: RecordTag,
    pub i1: Option<f64>,
    pub i2: f64,
    pub key: CorrelationKey,
    pub origin_i: ColumnOrigin,
    pub origin_j: ColumnOrigin,
    pub count_x: usize,
    pub count_y: usize,
    pub count_centroids: usize,
    /// Milliseconds since the sweep started.
    pub elapsed_ms: u64,
}

impl CorrelationRecord {
    /// Build a record, tagging it `Degenerate` when the result is not finite.
    pub fn new(
        key: CorrelationKey,
        pair: MoranPair,
        origin_i: ColumnOrigin,
        origin_j: ColumnOrigin,
        joined: usize,
        elapsed_ms: u64,
    ) -> Self {
        let tag = if pair.is_finite() {
            RecordTag::Correlate
        } else {
            RecordTag::Degenerate
        };
        Self {
            tag,
            i1: pair.i1,
            i2: pair.i2,
            key,
            origin_i,
            origin_j,
            count_x: joined,
            count_y: joined,
            count_centroids: joined,
            elapsed_ms,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.tag == RecordTag::Degenerate
    }

    /// The ledger line, without a trailing newline.
    pub fn to_line(&self) -> String {
        let i1 = self.i1.map(|v| v.to_string()).unwrap_or_default();
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.tag.as_str(),
            i1,
            self.i2,
            self.key.dataset_i,
            self.key.dataset_j,
            self.key.column_i,
            self.key.column_j,
            clean_field(&self.origin_i.file_name),
            clean_field(&self.origin_j.file_name),
            clean_field(&self.origin_i.column_name),
            clean_field(&self.origin_j.column_name),
            self.count_x,
            self.count_y,
            self.count_centroids,
            self.elapsed_ms
        )
    }

    /// Parse one ledger line.
    ///
    /// # Errors
    ///
    /// `MalformedRecord` for a wrong field count, an unknown tag or any
    /// numeric field that does not parse.
    pub fn parse_line(line: &str) -> LedgerResult<Self> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(LedgerError::malformed(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let i1 = if fields[1].is_empty() {
            None
        } else {
            Some(number::<f64>(fields[1], "I")?)
        };

        Ok(Self {
            tag: fields[0].parse()?,
            i1,
            i2: number(fields[2], "I2")?,
            key: CorrelationKey {
                dataset_i: number(fields[3], "datasetIndexI")?,
                dataset_j: number(fields[4], "datasetIndexJ")?,
                column_i: number(fields[5], "columnIndexI")?,
                column_j: number(fields[6], "columnIndexJ")?,
            },
            origin_i: ColumnOrigin::new(fields[7], fields[9]),
            origin_j: ColumnOrigin::new(fields[8], fields[10]),
            count_x: number(fields[11], "countX")?,
            count_y: number(fields[12], "countY")?,
            count_centroids: number(fields[13], "countCentroids")?,
            elapsed_ms: number(fields[14], "elapsedMs")?,
        })
    }
}

/// Replace the ledger's separator and line breaks inside a name.
pub fn clean_field(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ',' => ';',
            '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}

fn number<T: FromStr>(field: &str, what: &str) -> LedgerResult<T> {
    field
        .trim()
        .parse()
        .map_err(|_| LedgerError::malformed(format!("{} is not a number: \"{}\"", what, field)))
}
