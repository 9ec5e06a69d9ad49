//! Diagnostic logging via tracing.
//!
//! Logs go to a daily rolling file under `<data_local_dir>/vqe-watch/logs/`,
//! never to the terminal, which belongs to the dashboard. The filter is read
//! from `VQE_WATCH_LOG`:
//!
//! ```bash
//! VQE_WATCH_LOG=debug vqe-watch stream.json
//! VQE_WATCH_LOG=vqe_watch::tail=trace vqe-watch
//! ```

use crate::constants::{APP_LOG_FILE, LOG_FILTER_VAR, LOG_ROOT};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() -> Result<()> {
    let log_dir = LOG_ROOT.clone();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, APP_LOG_FILE);

    let env_filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new("vqe_watch=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "vqe-watch starting"
    );
    Ok(())
}

/// Path of today's log file prefix; the appender adds the date suffix.
pub fn log_file() -> PathBuf {
    LOG_ROOT.join(APP_LOG_FILE)
}
