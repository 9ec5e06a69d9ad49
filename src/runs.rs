//! Runs observed in the stream file and the snapshot store shared with the UI.

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Energy samples from one execution of the optimiser, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    samples: Vec<f64>,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, energy: f64) {
        self.samples.push(energy);
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest energy seen in this run.
    pub fn best(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }
}

/// Runs in chronological order. The last run is in progress, the rest are
/// finished.
///
/// Runs sit behind `Arc`, so cloning a list to publish it shares every
/// finished run and the in-progress one is copied only on its next write.
#[derive(Debug, Clone)]
pub struct RunList {
    runs: Vec<Arc<Run>>,
    updated_at: Option<DateTime<Local>>,
}

impl Default for RunList {
    fn default() -> Self {
        Self::new()
    }
}

impl RunList {
    /// A fresh list holds exactly one empty run.
    pub fn new() -> Self {
        Self {
            runs: vec![Arc::new(Run::new())],
            updated_at: None,
        }
    }

    /// A run marker was seen: later samples belong to a new run.
    pub fn start_run(&mut self) {
        self.runs.push(Arc::new(Run::new()));
        self.touch();
    }

    /// Append a sample to the in-progress run.
    pub fn record(&mut self, energy: f64) {
        if let Some(last) = self.runs.last_mut() {
            Arc::make_mut(last).push(energy);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Local::now());
    }

    pub fn runs(&self) -> impl ExactSizeIterator<Item = &Run> + '_ {
        self.runs.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn in_progress(&self) -> Option<&Run> {
        self.runs.last().map(|r| r.as_ref())
    }

    /// Every run except the last.
    pub fn finished(&self) -> impl Iterator<Item = &Run> + '_ {
        let n = self.runs.len().saturating_sub(1);
        self.runs[..n].iter().map(|r| r.as_ref())
    }

    /// Number of completed runs: finished runs that recorded at least one
    /// sample. The producer writes a marker before its first sample, so the
    /// implicit initial run is usually empty and never counts.
    pub fn completed_count(&self) -> usize {
        self.finished().filter(|r| !r.is_empty()).count()
    }

    pub fn sample_count(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }

    pub fn has_samples(&self) -> bool {
        self.runs.iter().any(|r| !r.is_empty())
    }

    /// Wall-clock time of the last marker or sample.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// Plain copy of every run's samples, mostly useful for assertions.
    pub fn to_vecs(&self) -> Vec<Vec<f64>> {
        self.runs.iter().map(|r| r.samples().to_vec()).collect()
    }
}

/// Latest published run list, written by the tailer and read by the renderer.
///
/// Each publish swaps in a whole immutable snapshot, so a reader always sees a
/// consistent prefix of the file and never a half-written sample.
#[derive(Debug)]
pub struct RunStore {
    snapshot: ArcSwapOption<RunList>,
}

impl Default for RunStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStore {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwapOption::empty(),
        }
    }

    /// `None` until the stream file has been opened once.
    pub fn snapshot(&self) -> Option<Arc<RunList>> {
        self.snapshot.load_full()
    }

    pub fn publish(&self, runs: RunList) {
        self.snapshot.store(Some(Arc::new(runs)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_has_one_empty_run() {
        let runs = RunList::new();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs.completed_count(), 0);
        assert!(!runs.has_samples());
        assert!(runs.updated_at().is_none());
    }

    #[test]
    fn samples_attach_to_the_latest_run() {
        let mut runs = RunList::new();
        runs.start_run();
        runs.record(-1.0);
        runs.record(-1.5);
        runs.start_run();
        runs.record(-0.9);

        assert_eq!(runs.to_vecs(), vec![vec![], vec![-1.0, -1.5], vec![-0.9]]);
        assert_eq!(runs.completed_count(), 1);
        assert_eq!(runs.sample_count(), 3);
        assert_eq!(runs.in_progress().unwrap().samples(), &[-0.9]);
        assert_eq!(runs.finished().count(), 2);
        assert!(runs.updated_at().is_some());
    }

    #[test]
    fn consecutive_markers_leave_an_empty_run_that_is_not_completed() {
        let mut runs = RunList::new();
        runs.record(-1.0);
        runs.start_run();
        runs.start_run();
        runs.record(-2.0);

        assert_eq!(runs.to_vecs(), vec![vec![-1.0], vec![], vec![-2.0]]);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs.finished().count(), 2);
        assert_eq!(runs.completed_count(), 1);
    }

    #[test]
    fn best_is_the_lowest_sample() {
        let mut run = Run::new();
        assert_eq!(run.best(), None);
        run.push(-1.2);
        run.push(-1.6);
        run.push(-1.4);
        assert_eq!(run.best(), Some(-1.6));
    }

    #[test]
    fn published_snapshot_is_unaffected_by_later_writes() {
        let store = RunStore::new();
        assert!(store.snapshot().is_none());

        let mut runs = RunList::new();
        runs.record(-1.0);
        store.publish(runs.clone());

        runs.record(-2.0);
        runs.start_run();

        let seen = store.snapshot().unwrap();
        assert_eq!(seen.to_vecs(), vec![vec![-1.0]]);

        store.publish(runs);
        let seen = store.snapshot().unwrap();
        assert_eq!(seen.to_vecs(), vec![vec![-1.0, -2.0], vec![]]);
    }
}
