//! Threshold cut clustering.
//!
//! Treats a dense N×N weight matrix as a graph whose edges are the entries
//! `>= threshold` off the diagonal, and labels its connected components by
//! flood fill. Seeds are taken in index order, so group ids are assigned
//! in order of each group's lowest member.

use datastore_miner_core::progress::{ProgressEvent, ProgressReporter};
use datastore_miner_core::SquareMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Group id of a vertex not yet reached by the fill.
pub const UNASSIGNED: i32 = -1;

/// Vertex to group mapping produced by one cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Group id per vertex index.
    pub groups: Vec<i32>,
    /// Member count per group id.
    pub member_counts: Vec<usize>,
}

impl ClusterAssignment {
    /// Number of connected components.
    pub fn cluster_count(&self) -> usize {
        self.member_counts.len()
    }

    pub fn group_of(&self, vertex: usize) -> Option<i32> {
        self.groups.get(vertex).copied()
    }

    /// Vertex indices of `group`, ascending.
    pub fn members(&self, group: i32) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| **g == group)
            .map(|(i, _)| i)
            .collect()
    }
}

/// One row of a threshold sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutProfileRow {
    pub threshold: f32,
    pub clusters: usize,
    pub average_degree: f32,
}

pub struct ThresholdClusterer<'r> {
    reporter: &'r dyn ProgressReporter,
}

impl<'r> ThresholdClusterer<'r> {
    pub fn new(reporter: &'r dyn ProgressReporter) -> Self {
        Self { reporter }
    }

    /// Connected components of the matrix cut at `threshold`.
    ///
    /// Vertex `j` joins `i`'s group when `matrix[i][j] >= threshold` and
    /// `i != j`. Uses an explicit worklist, so dense inputs cannot exhaust
    /// the call stack.
    pub fn cluster_cut(&self, matrix: &SquareMatrix<f32>, threshold: f32) -> ClusterAssignment {
        let n = matrix.dim();
        let mut groups = vec![UNASSIGNED; n];
        let mut member_counts: Vec<usize> = Vec::new();
        let mut worklist: Vec<usize> = Vec::new();

        for seed in 0..n {
            if groups[seed] != UNASSIGNED {
                continue;
            }
            let group = member_counts.len() as i32;
            groups[seed] = group;
            let mut members = 1;
            worklist.push(seed);

            while let Some(v) = worklist.pop() {
                for (v2, &weight) in matrix.row(v).iter().enumerate() {
                    if v2 != v && weight >= threshold && groups[v2] == UNASSIGNED {
                        groups[v2] = group;
                        members += 1;
                        worklist.push(v2);
                    }
                }
            }
            member_counts.push(members);
        }

        debug!(threshold, clusters = member_counts.len(), "cluster cut");
        ClusterAssignment {
            groups,
            member_counts,
        }
    }

    /// Entries strictly above `threshold` (diagonal included) divided by N.
    ///
    /// A cheap density proxy for the graph left after the cut. 0 for an
    /// empty matrix.
    pub fn average_degree_after_cut(&self, matrix: &SquareMatrix<f32>, threshold: f32) -> f32 {
        let n = matrix.dim();
        if n == 0 {
            return 0.0;
        }
        let count = matrix.iter().filter(|&&v| v > threshold).count();
        count as f32 / n as f32
    }

    /// Cluster count and average degree for each threshold, each row also
    /// sent to the reporter.
    pub fn profile(&self, matrix: &SquareMatrix<f32>, thresholds: &[f32]) -> Vec<CutProfileRow> {
        thresholds
            .iter()
            .map(|&threshold| {
                let row = CutProfileRow {
                    threshold,
                    clusters: self.cluster_cut(matrix, threshold).cluster_count(),
                    average_degree: self.average_degree_after_cut(matrix, threshold),
                };
                self.reporter.report(ProgressEvent::ClusterCut {
                    threshold: row.threshold,
                    clusters: row.clusters,
                    average_degree: row.average_degree,
                });
                row
            })
            .collect()
    }
}

/// Thresholds from `start` to `end` inclusive in steps of `step`.
///
/// Computed as `start + k * step` so rounding does not accumulate.
pub fn threshold_range(start: f32, end: f32, step: f32) -> Vec<f32> {
    if !(step > 0.0) || start > end {
        return Vec::new();
    }
    let steps = ((end - start) / step + 1e-4).floor() as usize;
    (0..=steps).map(|k| start + k as f32 * step).collect()
}
