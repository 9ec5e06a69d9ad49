//! Global paths, timings and glyphs.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

/// <data_local_dir>/vqe-watch
pub static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("vqe-watch");
    p
});

/// <data_local_dir>/vqe-watch/logs
pub static LOG_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let mut p = DATA_ROOT.clone();
    p.push("logs");
    p
});

// timings
pub const TAIL_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(100);
/// Publish the run list at least this often while catching up on a long file.
pub const PUBLISH_EVERY_LINES: usize = 256;

// log file format
pub const MARKER_PREFIX: char = '#';
pub const OBSERVATION_PREFIX: char = '{';
pub const STREAM_DIR: &str = "tmp";
pub const STREAM_FILE: &str = "vqe_stream.json";

// environment
pub const PROVIDER_VAR: &str = "VQE_QUANTUM_PROVIDER";
pub const CK_ROOT_VAR: &str = "CK_ROOT";
pub const COLOR_VAR: &str = "VQE_WATCH_COLOR";
pub const LOG_FILTER_VAR: &str = "VQE_WATCH_LOG";
pub const APP_LOG_FILE: &str = "vqe-watch.log";

// chart
/// Seed for the y-axis so an almost flat series still gets a usable range.
pub const DEFAULT_Y_RANGE: (f64, f64) = (-1.7, -1.6);
pub const LIVE_MARKER: &str = "*";
pub const FINISHED_MARKER: &str = ".";
pub const CHART_TITLE: &str = "Optimiser iteration";
pub const CHART_TITLE_OFFSET: u16 = 20;
pub const Y_AXIS_LABEL: &str = "Energy";

// stats
pub const NO_DATA: &str = "No data yet!";
pub const INSUFFICIENT_DATA: &str = "Insufficient data";
