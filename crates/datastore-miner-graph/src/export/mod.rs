//! Network interchange formats for external visualisation tools.
//!
//! Both writers renumber vertices densely in ascending id order: Pajek from
//! 1, GEXF from 0. Edges are written in creation order.

mod gexf;
mod pajek;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

pub use gexf::{write_gexf, xml_escape};
pub use pajek::write_pajek;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pajek `.net` vertex/edge list.
    Pajek,
    /// Gephi `.gexf` XML.
    Gexf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pajek => "pajek",
            Self::Gexf => "gexf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pajek => "net",
            Self::Gexf => "gexf",
        }
    }

    /// Write `graph` to `writer` in this format.
    pub fn write<T, W: Write>(&self, graph: &Graph<T>, writer: W) -> GraphResult<()> {
        match self {
            Self::Pajek => write_pajek(graph, writer),
            Self::Gexf => write_gexf(graph, writer),
        }
    }

    /// Create (or truncate) `path` and write `graph` to it.
    pub fn write_file<T>(&self, graph: &Graph<T>, path: &Path) -> GraphResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(graph, &mut writer)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            format = self.as_str(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph exported"
        );
        Ok(())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pajek" | "net" => Ok(Self::Pajek),
            "gexf" => Ok(Self::Gexf),
            other => Err(GraphError::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("pajek".parse::<ExportFormat>().unwrap(), ExportFormat::Pajek);
        assert_eq!("GEXF".parse::<ExportFormat>().unwrap(), ExportFormat::Gexf);
        assert!("graphml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Pajek.extension(), "net");
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.net");
        let g: Graph<()> = Graph::from_edge_pairs(false, [(0, 1)]);
        ExportFormat::Pajek.write_file(&g, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("*Vertices 2\n"));
    }
}
