//! Numbers for the stats panel.

use crate::constants::INSUFFICIENT_DATA;
use crate::runs::RunList;
use chrono::{DateTime, Local};

/// Spread of the best energy reached by each finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinishedStats {
    /// Fewer than two finished runs with samples.
    Insufficient,
    /// Mean and population standard deviation of the per-run minima.
    Computed { mean: f64, std_dev: f64 },
}

impl FinishedStats {
    pub fn from_minima(minima: &[f64]) -> Self {
        if minima.len() < 2 {
            return Self::Insufficient;
        }
        let n = minima.len() as f64;
        let mean = minima.iter().sum::<f64>() / n;
        let var = minima.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
        Self::Computed {
            mean,
            std_dev: var.sqrt(),
        }
    }

    fn mean_text(&self) -> String {
        match self {
            Self::Insufficient => INSUFFICIENT_DATA.to_string(),
            Self::Computed { mean, .. } => format_energy(*mean),
        }
    }

    fn std_dev_text(&self) -> String {
        match self {
            Self::Insufficient => INSUFFICIENT_DATA.to_string(),
            Self::Computed { std_dev, .. } => format_energy(*std_dev),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub completed_runs: usize,
    /// Lowest sample in any run, the in-progress one included.
    pub min_energy: f64,
    pub finished: FinishedStats,
    pub samples: usize,
    pub updated_at: Option<DateTime<Local>>,
}

impl Summary {
    /// `None` while no sample has been seen at all.
    pub fn from_runs(runs: &RunList) -> Option<Self> {
        let min_energy = runs.runs().filter_map(|r| r.best()).reduce(f64::min)?;
        let minima: Vec<f64> = runs.finished().filter_map(|r| r.best()).collect();

        Some(Self {
            completed_runs: runs.completed_count(),
            min_energy,
            finished: FinishedStats::from_minima(&minima),
            samples: runs.sample_count(),
            updated_at: runs.updated_at(),
        })
    }

    /// Text block for the stats panel, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("N runs = {}", self.completed_runs),
            format!("Minimum energy seen = {}", format_energy(self.min_energy)),
            format!("Final mean = {}", self.finished.mean_text()),
            format!("Final std dev = {}", self.finished.std_dev_text()),
            format!("Samples = {}", self.samples),
        ];
        if let Some(ts) = self.updated_at {
            lines.push(format!("Last update = {}", ts.format("%H:%M:%S")));
        }
        lines
    }
}

pub fn format_energy(value: f64) -> String {
    format!("{value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs_of(data: &[&[f64]]) -> RunList {
        let mut runs = RunList::new();
        for (i, run) in data.iter().enumerate() {
            if i > 0 {
                runs.start_run();
            }
            for &v in run.iter() {
                runs.record(v);
            }
        }
        runs
    }

    #[test]
    fn no_samples_means_no_summary() {
        assert!(Summary::from_runs(&RunList::new()).is_none());
        assert!(Summary::from_runs(&runs_of(&[&[], &[]])).is_none());
    }

    #[test]
    fn end_to_end_example() {
        // "#", -1.0, -1.5, "#", -0.9
        let runs = runs_of(&[&[], &[-1.0, -1.5], &[-0.9]]);
        let s = Summary::from_runs(&runs).unwrap();

        assert_eq!(s.completed_runs, 1);
        assert_eq!(s.min_energy, -1.5);
        assert_eq!(s.finished, FinishedStats::Insufficient);
        let text = s.lines().join("\n");
        assert!(text.contains("N runs = 1"));
        assert!(text.contains("Final mean = Insufficient data"));
        assert!(text.contains("Final std dev = Insufficient data"));
    }

    #[test]
    fn global_minimum_includes_the_live_run() {
        let runs = runs_of(&[&[-1.0, -1.2], &[-1.1], &[-1.4, -2.5]]);
        let s = Summary::from_runs(&runs).unwrap();
        assert_eq!(s.min_energy, -2.5);
    }

    #[test]
    fn mean_and_population_std_of_finished_minima() {
        // finished minima: -1.0, -2.0, -3.0; the live run is excluded
        let runs = runs_of(&[&[-1.0, 0.0], &[-2.0], &[-0.5, -3.0], &[-10.0]]);
        let s = Summary::from_runs(&runs).unwrap();

        assert_eq!(s.completed_runs, 3);
        match s.finished {
            FinishedStats::Computed { mean, std_dev } => {
                assert!((mean + 2.0).abs() < 1e-12);
                // population std of {-1, -2, -3} = sqrt(2/3)
                assert!((std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
            }
            other => panic!("expected computed stats, got {other:?}"),
        }
    }

    #[test]
    fn two_finished_runs_is_enough() {
        let stats = FinishedStats::from_minima(&[-1.0, -1.0]);
        assert_eq!(
            stats,
            FinishedStats::Computed {
                mean: -1.0,
                std_dev: 0.0
            }
        );
        assert_eq!(FinishedStats::from_minima(&[-1.0]), FinishedStats::Insufficient);
        assert_eq!(FinishedStats::from_minima(&[]), FinishedStats::Insufficient);
    }
}
