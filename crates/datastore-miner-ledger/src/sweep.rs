//! All-pairs correlation sweep over a dataset catalogue.
//!
//! Visit order is fixed: dataset `i` ascending, dataset `j` from `i` up,
//! then every numeric column of `i` against every numeric column of `j`.
//! Column indices are ordinal across all staged files of a dataset. For the
//! self pair `i == j` only column pairs with `column_i <= column_j` are
//! visited, since the statistic is symmetric in its two columns.
//!
//! Keys already in the ledger are skipped before any data is touched, so a
//! rerun after an interruption carries on where the last flushed record
//! left off.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use datastore_miner_core::progress::{ProgressEvent, ProgressReporter, SweepSummary};
use datastore_miner_core::{
    inner_join, BivariateCorrelator, CentroidSet, JoinedColumns, MinerError, RunningStatistic,
    VariableVector,
};
use tracing::{debug, info};

use crate::catalogue::{Catalogue, DataStager, DatasetEntry, StagedFile};
use crate::error::LedgerResult;
use crate::ledger::CorrelationLedger;
use crate::record::{ColumnOrigin, CorrelationKey, CorrelationRecord};

/// Column of a staged dataset with its ordinal index.
pub(crate) struct IndexedColumn<'f> {
    pub(crate) ordinal: usize,
    pub(crate) file_name: &'f str,
    pub(crate) column_name: &'f str,
    pub(crate) values: Option<&'f VariableVector>,
}

fn indexed_columns(files: &[StagedFile]) -> Vec<IndexedColumn<'_>> {
    files
        .iter()
        .flat_map(|f| f.columns.iter().map(move |c| (f.name.as_str(), c)))
        .enumerate()
        .map(|(ordinal, (file_name, c))| IndexedColumn {
            ordinal,
            file_name,
            column_name: &c.name,
            values: c.values.as_ref(),
        })
        .collect()
}

/// Outcome of correlating one column pair.
pub(crate) enum PairOutcome {
    Recorded { degenerate: bool },
    SkippedDegenerate,
}

/// Shared per-pair logic of the catalogue and table sweeps.
pub(crate) struct PairRunner<'a> {
    pub(crate) correlator: &'a dyn BivariateCorrelator,
    pub(crate) reporter: &'a dyn ProgressReporter,
    pub(crate) started: Instant,
}

impl<'a> PairRunner<'a> {
    /// Check variance, correlate and append one joined pair.
    ///
    /// Data-quality problems are reported and skipped. Only ledger I/O and
    /// unexpected correlator errors are returned.
    pub(crate) fn run_pair(
        &self,
        ledger: &mut CorrelationLedger,
        key: CorrelationKey,
        joined: &JoinedColumns,
        origin_i: ColumnOrigin,
        origin_j: ColumnOrigin,
    ) -> LedgerResult<PairOutcome> {
        if joined.is_empty() {
            self.skip(key, "no areas in common");
            return Ok(PairOutcome::SkippedDegenerate);
        }
        for (values, origin) in [(&joined.x, &origin_i), (&joined.y, &origin_j)] {
            if RunningStatistic::from_slice(values).is_degenerate() {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!(
                        "{}: column \"{}\" has zero variance",
                        key, origin.column_name
                    ),
                });
                self.skip(key, "zero or undefined variance");
                return Ok(PairOutcome::SkippedDegenerate);
            }
        }

        let pair = match self.correlator.correlate_joined(joined) {
            Ok(pair) => pair,
            Err(MinerError::LengthMismatch {
                expected, actual, ..
            }) => {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!(
                        "{}: {} variant needs all {} areas, join has {}",
                        key,
                        self.correlator.variant(),
                        expected,
                        actual
                    ),
                });
                self.skip(key, "join does not cover the area set");
                return Ok(PairOutcome::SkippedDegenerate);
            }
            Err(e) => return Err(e.into()),
        };

        let record = CorrelationRecord::new(
            key,
            pair,
            origin_i,
            origin_j,
            joined.len(),
            self.started.elapsed().as_millis() as u64,
        );
        if record.is_degenerate() {
            self.reporter.report(ProgressEvent::Warning {
                message: format!("{}: correlation is not finite ({})", key, record.i2),
            });
        }
        ledger.append(&record)?;
        Ok(PairOutcome::Recorded {
            degenerate: record.is_degenerate(),
        })
    }

    pub(crate) fn skip(&self, key: CorrelationKey, reason: &str) {
        self.reporter.report(ProgressEvent::Skipped {
            key: key.to_string(),
            reason: reason.to_string(),
        });
    }

    pub(crate) fn progress(&self, completed: usize, total: usize) {
        self.reporter.report(ProgressEvent::Progress {
            completed,
            total,
            elapsed: self.started.elapsed(),
        });
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Running counters, folded into a [`SweepSummary`] at the end.
#[derive(Default)]
pub(crate) struct Tally {
    pub(crate) summary: SweepSummary,
    variables: BTreeSet<(usize, usize)>,
}

impl Tally {
    pub(crate) fn record(&mut self, key: CorrelationKey, outcome: PairOutcome) {
        match outcome {
            PairOutcome::Recorded { degenerate } => {
                self.summary.computed += 1;
                if degenerate {
                    self.summary.degenerate_results += 1;
                }
                self.variables.insert((key.dataset_i, key.column_i));
                self.variables.insert((key.dataset_j, key.column_j));
                *self.summary.match_histogram.entry(key.dataset_i).or_insert(0) += 1;
                if key.dataset_j != key.dataset_i {
                    *self.summary.match_histogram.entry(key.dataset_j).or_insert(0) += 1;
                }
            }
            PairOutcome::SkippedDegenerate => self.summary.skipped_degenerate += 1,
        }
    }

    pub(crate) fn finish(mut self) -> SweepSummary {
        self.summary.unique_variables = self.variables.len();
        self.summary
    }
}

/// Correlates every column pair of every dataset pair in a catalogue.
pub struct CatalogueSweep<'a> {
    catalogue: &'a dyn Catalogue,
    stager: &'a dyn DataStager,
    centroids: &'a CentroidSet,
    correlator: &'a dyn BivariateCorrelator,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> CatalogueSweep<'a> {
    pub fn new(
        catalogue: &'a dyn Catalogue,
        stager: &'a dyn DataStager,
        centroids: &'a CentroidSet,
        correlator: &'a dyn BivariateCorrelator,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            catalogue,
            stager,
            centroids,
            correlator,
            reporter,
        }
    }

    /// Run the sweep, appending every new result to `ledger`.
    ///
    /// # Errors
    ///
    /// Ledger I/O failures abort the run. Records flushed before the
    /// failure stay valid.
    pub fn run(&self, ledger: &mut CorrelationLedger) -> LedgerResult<SweepSummary> {
        let runner = PairRunner {
            correlator: self.correlator,
            reporter: self.reporter,
            started: Instant::now(),
        };
        let datasets = self.catalogue.datasets();
        let n = datasets.len();
        let total = n * (n + 1) / 2;
        info!(
            datasets = n,
            dataset_pairs = total,
            variant = %self.correlator.variant(),
            already_completed = ledger.completed_count(),
            "catalogue sweep started"
        );

        let mut staged: BTreeMap<usize, Option<Vec<StagedFile>>> = BTreeMap::new();
        let mut tally = Tally::default();
        let mut non_numeric: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut done = 0usize;

        for i in 0..n {
            self.ensure_staged(&mut staged, i, &datasets[i]);
            for j in i..n {
                done += 1;
                self.ensure_staged(&mut staged, j, &datasets[j]);
                let (Some(Some(files_i)), Some(Some(files_j))) = (staged.get(&i), staged.get(&j))
                else {
                    runner.progress(done, total);
                    continue;
                };
                let cols_i = indexed_columns(files_i);
                let cols_j = indexed_columns(files_j);

                for ci in &cols_i {
                    for cj in &cols_j {
                        if i == j && cj.ordinal < ci.ordinal {
                            continue;
                        }
                        let key = CorrelationKey::new(i, j, ci.ordinal, cj.ordinal);
                        if ledger.is_completed(&key) {
                            tally.summary.skipped_existing += 1;
                            runner.skip(key, "already in ledger");
                            continue;
                        }
                        let (Some(x), Some(y)) = (ci.values, cj.values) else {
                            for (dataset, col) in [(i, ci), (j, cj)] {
                                if col.values.is_none() && non_numeric.insert((dataset, col.ordinal))
                                {
                                    tally.summary.skipped_non_numeric += 1;
                                }
                            }
                            runner.skip(key, "non-numeric column");
                            continue;
                        };

                        let joined = inner_join(x, y, self.centroids);
                        let outcome = runner.run_pair(
                            ledger,
                            key,
                            &joined,
                            ColumnOrigin::new(ci.file_name, ci.column_name),
                            ColumnOrigin::new(cj.file_name, cj.column_name),
                        )?;
                        tally.record(key, outcome);
                    }
                }
                runner.progress(done, total);
            }
            // dataset i is never needed again
            staged.remove(&i);
        }

        let summary = tally.finish();
        info!(
            computed = summary.computed,
            elapsed_ms = runner.elapsed().as_millis() as u64,
            "catalogue sweep finished"
        );
        self.reporter.report(ProgressEvent::Summary(summary.clone()));
        Ok(summary)
    }

    fn ensure_staged(
        &self,
        staged: &mut BTreeMap<usize, Option<Vec<StagedFile>>>,
        index: usize,
        dataset: &DatasetEntry,
    ) {
        if staged.contains_key(&index) {
            return;
        }
        let files = if !dataset.has_data() {
            debug!(dataset = index, title = %dataset.title, "dataset has no data link");
            None
        } else {
            match self.stager.stage(index, dataset) {
                Ok(files) => Some(files),
                Err(e) => {
                    self.reporter.report(ProgressEvent::Warning {
                        message: format!("dataset {} ({}) skipped: {}", index, dataset.title, e),
                    });
                    None
                }
            }
        };
        staged.insert(index, files);
    }
}
