//! Progress reporter that keeps every event for later assertions.

use datastore_miner_core::progress::{ProgressEvent, ProgressReporter, SweepSummary};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Warning { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(key, reason)` of every skip.
    pub fn skipped(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Skipped { key, reason } => Some((key.clone(), reason.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_summary(&self) -> Option<SweepSummary> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ProgressEvent::Summary(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn count<F: Fn(&ProgressEvent) -> bool>(&self, pred: F) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}
