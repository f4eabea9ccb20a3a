//! Graphs built from correlation matrices and dataset keywords.

use std::collections::{BTreeMap, BTreeSet};

use datastore_miner_core::SquareMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeId, Graph, VertexId};

/// Text a data source exposes about one dataset.
///
/// Each catalogue implements this in its own way; the graph builders only
/// need the strings.
pub trait DatasetText {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    /// Keywords in any order, duplicates allowed.
    fn keywords(&self) -> Vec<String>;
}

/// Vertex payload of a keyword graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataNode {
    /// Position of the dataset in the builder's input.
    pub resource_id: usize,
    pub title: String,
}

/// One undirected edge per pair `i < j` with `matrix[i][j] >= threshold`.
///
/// Vertex `i` carries `names[i]` as payload and label; each edge's weight
/// is the matrix value and its label the value printed. NaN cells never
/// pass the threshold.
///
/// # Errors
///
/// `NameCountMismatch` if `names` and `matrix` differ in size.
pub fn correlation_graph(
    matrix: &SquareMatrix<f32>,
    names: &[String],
    threshold: f32,
) -> GraphResult<Graph<String>> {
    if names.len() != matrix.dim() {
        return Err(GraphError::NameCountMismatch {
            matrix: matrix.dim(),
            names: names.len(),
        });
    }

    let mut graph = Graph::undirected();
    for (i, name) in names.iter().enumerate() {
        let id = graph.add_vertex_with_id(i as VertexId, name.clone())?;
        graph.set_label(id, name.clone())?;
    }
    for i in 0..names.len() {
        for (j, &value) in matrix.row(i).iter().enumerate().skip(i + 1) {
            if value >= threshold {
                graph.connect_vertices(i as VertexId, j as VertexId, value.to_string(), value)?;
            }
        }
    }
    info!(
        threshold,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "correlation graph built"
    );
    Ok(graph)
}

/// Connect `a` and `b`, reusing an existing edge between them.
///
/// An existing edge gains 1.0 weight and `label` appended to its label.
/// Otherwise a new edge of weight 1.0 labelled `label` is created.
pub fn single_connect<T>(
    graph: &mut Graph<T>,
    a: VertexId,
    b: VertexId,
    label: &str,
) -> GraphResult<EdgeId> {
    let existing = graph.edges_between(a, b)?.into_iter().next();
    match existing.and_then(|id| graph.edge_mut(id)) {
        Some(edge) => {
            edge.weight += 1.0;
            if edge.label.is_empty() {
                edge.label.push_str(label);
            } else if !label.is_empty() {
                edge.label.push(' ');
                edge.label.push_str(label);
            }
            Ok(edge.id())
        }
        None => graph.connect_vertices(a, b, label, 1.0),
    }
}

/// Datasets linked by shared keywords.
///
/// Dataset `k` becomes vertex `k`, labelled with its title (`&` replaced
/// by a space). Datasets without keywords get no vertex. Every keyword used
/// by at least `min_frequency` datasets links each pair of them through
/// [`single_connect`], so an edge's weight is the number of qualifying
/// keywords the pair shares. Vertices left without edges are removed.
pub fn keyword_graph<D: DatasetText>(datasets: &[D], min_frequency: usize) -> Graph<DataNode> {
    let mut graph = Graph::undirected();
    let mut index: BTreeMap<String, Vec<VertexId>> = BTreeMap::new();

    for (resource_id, dataset) in datasets.iter().enumerate() {
        let keywords: BTreeSet<String> = dataset
            .keywords()
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            continue;
        }

        let id = resource_id as VertexId;
        let title = dataset.title().to_string();
        if graph
            .add_vertex_with_id(
                id,
                DataNode {
                    resource_id,
                    title: title.clone(),
                },
            )
            .is_err()
        {
            continue;
        }
        let _ = graph.set_label(id, title.replace('&', " "));
        for keyword in keywords {
            index.entry(keyword).or_default().push(id);
        }
    }
    debug!(
        datasets = datasets.len(),
        keywords = index.len(),
        "keyword index built"
    );

    for (keyword, ids) in &index {
        if ids.len() < min_frequency.max(2) {
            continue;
        }
        for (n, &a) in ids.iter().enumerate() {
            for &b in &ids[n + 1..] {
                // every id in the index was added above
                let _ = single_connect(&mut graph, a, b, keyword);
            }
        }
    }

    let orphans: Vec<VertexId> = graph
        .vertices()
        .filter(|v| v.is_orphan())
        .map(|v| v.id())
        .collect();
    for id in &orphans {
        let _ = graph.delete_vertex(*id);
    }
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        orphans_removed = orphans.len(),
        "keyword graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        title: &'static str,
        keywords: &'static [&'static str],
    }

    impl DatasetText for Doc {
        fn title(&self) -> &str {
            self.title
        }
        fn description(&self) -> &str {
            ""
        }
        fn keywords(&self) -> Vec<String> {
            self.keywords.iter().map(|k| k.to_string()).collect()
        }
    }

    #[test]
    fn test_correlation_graph_threshold() {
        let m = SquareMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.1],
            vec![0.8, 1.0, 0.5],
            vec![0.1, 0.5, 1.0],
        ])
        .unwrap();
        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let g = correlation_graph(&m, &names, 0.5).unwrap();

        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.w(0, 1).unwrap(), 0.8);
        assert_eq!(g.w(1, 2).unwrap(), 0.5);
        assert_eq!(g.w(0, 2).unwrap(), 0.0);
        assert_eq!(g.vertex(2).unwrap().label_or_empty(), "c");
        assert_eq!(g.edges().next().unwrap().label, "0.8");
    }

    #[test]
    fn test_correlation_graph_name_mismatch() {
        let m = SquareMatrix::<f32>::zeros(2);
        let err = correlation_graph(&m, &["x".to_string()], 0.0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::NameCountMismatch {
                matrix: 2,
                names: 1
            }
        ));
    }

    #[test]
    fn test_single_connect_accumulates() {
        let mut g: Graph<()> = Graph::undirected();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let first = single_connect(&mut g, a, b, "rain").unwrap();
        let second = single_connect(&mut g, b, a, "wind").unwrap();
        assert_eq!(first, second);
        assert_eq!(g.edge_count(), 1);
        let e = g.edge(first).unwrap();
        assert_eq!(e.weight, 2.0);
        assert_eq!(e.label, "rain wind");
    }

    #[test]
    fn test_keyword_graph() {
        let docs = [
            Doc {
                title: "Rain & Snow",
                keywords: &["weather", "rain", "weather"],
            },
            Doc {
                title: "Wind",
                keywords: &["weather", "rain"],
            },
            Doc {
                title: "Untagged",
                keywords: &[],
            },
            Doc {
                title: "Housing",
                keywords: &["homes"],
            },
            Doc {
                title: "Storms",
                keywords: &["weather"],
            },
        ];
        let g = keyword_graph(&docs, 2);

        // Untagged never added; Housing is an orphan
        assert_eq!(g.vertex_ids().collect::<Vec<_>>(), vec![0, 1, 4]);
        assert_eq!(g.vertex(0).unwrap().label_or_empty(), "Rain   Snow");
        assert_eq!(g.vertex(4).unwrap().payload.resource_id, 4);
        // rain and weather both link 0 and 1
        assert_eq!(g.w(0, 1).unwrap(), 2.0);
        assert_eq!(g.w(0, 4).unwrap(), 1.0);
        assert_eq!(g.w(1, 4).unwrap(), 1.0);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_keyword_graph_high_frequency_leaves_nothing() {
        let docs = [
            Doc {
                title: "a",
                keywords: &["x"],
            },
            Doc {
                title: "b",
                keywords: &["x"],
            },
        ];
        let g = keyword_graph(&docs, 3);
        assert_eq!(g.vertex_count(), 0);
    }
}
