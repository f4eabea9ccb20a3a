//! Centroid CSV reader.
//!
//! Expects a header row and the columns `key,x,y`, one row per area.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use datastore_miner_core::CentroidSet;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CentroidRow {
    key: String,
    x: f64,
    y: f64,
}

pub fn read_centroids<R: Read>(reader: R) -> Result<CentroidSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut points = Vec::new();
    for (line, row) in rdr.deserialize::<CentroidRow>().enumerate() {
        // header is line 1
        let row = row.with_context(|| format!("bad centroid row at line {}", line + 2))?;
        points.push((row.key, row.x, row.y));
    }
    Ok(CentroidSet::from_points(points)?)
}

pub fn read_centroids_file(path: &Path) -> Result<CentroidSet> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open centroid file {}", path.display()))?;
    let centroids = read_centroids(file)
        .with_context(|| format!("cannot read centroid file {}", path.display()))?;
    info!(path = %path.display(), areas = centroids.len(), "centroids loaded");
    Ok(centroids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_in_order() {
        let text = "key,x,y\nE01, 1.5, 2\nE02,0,0\n";
        let set = read_centroids(text.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of("E02"), Some(1));
        assert_eq!(set.get(0).unwrap().coords(), [1.5, 2.0]);
    }

    #[test]
    fn test_bad_coordinate_is_an_error() {
        let text = "key,x,y\nE01,east,2\n";
        let err = read_centroids(text.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_duplicate_key_is_an_error() {
        let text = "key,x,y\nE01,0,0\nE01,1,1\n";
        assert!(read_centroids(text.as_bytes()).is_err());
    }
}
