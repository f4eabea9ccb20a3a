//! Progress reporting for long batch runs.
//!
//! Sweeps and clusterers never print directly. They emit [`ProgressEvent`]s
//! into a [`ProgressReporter`] handed to them by the caller, which decides
//! whether events go to `tracing`, a test recorder, or nowhere.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single progress notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// `completed` out of `total` work units done.
    Progress {
        completed: usize,
        total: usize,
        elapsed: Duration,
    },
    /// A unit of work was skipped.
    Skipped { key: String, reason: String },
    /// A recoverable data-quality problem.
    Warning { message: String },
    /// One threshold of a cluster cut profile.
    ClusterCut {
        threshold: f32,
        clusters: usize,
        average_degree: f32,
    },
    /// End-of-run summary.
    Summary(SweepSummary),
}

impl ProgressEvent {
    /// Percentage complete for `Progress` events.
    pub fn percent(&self) -> Option<f32> {
        match self {
            ProgressEvent::Progress {
                completed, total, ..
            } if *total > 0 => Some(*completed as f32 / *total as f32 * 100.0),
            _ => None,
        }
    }
}

/// Sink for progress events.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Progress {
                completed,
                total,
                elapsed,
            } => {
                tracing::info!(
                    completed,
                    total,
                    percent = event.percent().unwrap_or(0.0),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "sweep progress"
                );
            }
            ProgressEvent::Skipped { key, reason } => {
                tracing::debug!(%key, %reason, "skipped");
            }
            ProgressEvent::Warning { message } => {
                tracing::warn!("{}", message);
            }
            ProgressEvent::ClusterCut {
                threshold,
                clusters,
                average_degree,
            } => {
                tracing::info!(threshold, clusters, average_degree, "cluster cut");
            }
            ProgressEvent::Summary(summary) => {
                tracing::info!(
                    computed = summary.computed,
                    skipped_existing = summary.skipped_existing,
                    skipped_non_numeric = summary.skipped_non_numeric,
                    skipped_degenerate = summary.skipped_degenerate,
                    degenerate_results = summary.degenerate_results,
                    unique_variables = summary.unique_variables,
                    "sweep finished"
                );
                for (dataset, matches) in &summary.match_histogram {
                    tracing::info!(dataset, matches, "dataset match count");
                }
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Counters collected over one correlation sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Pairs correlated and appended to the ledger in this run.
    pub computed: usize,
    /// Pairs already present in the ledger.
    pub skipped_existing: usize,
    /// Columns skipped because they are not numeric.
    pub skipped_non_numeric: usize,
    /// Pairs skipped for zero/undefined variance or an empty join.
    pub skipped_degenerate: usize,
    /// Pairs whose correlation came out NaN or infinite (recorded with a flag).
    pub degenerate_results: usize,
    /// Distinct (dataset, column) variables that took part in a computed pair.
    pub unique_variables: usize,
    /// Dataset index -> number of computed pairs it took part in.
    pub match_histogram: BTreeMap<usize, usize>,
}
