//! File follower for the optimiser's stream file.
//!
//! The producer deletes and recreates its stream file whenever it restarts, so
//! an open handle can silently end up pointing at an orphaned inode. Before each
//! read the tailer checks that the handle is still linked (and not truncated
//! under us); if not it drops the handle and the next successful open starts a
//! fresh run list.

use crate::constants::{PUBLISH_EVERY_LINES, TAIL_POLL_INTERVAL};
use crate::liveness::Liveness;
use crate::record::{parse_line, Record};
use crate::runs::{RunList, RunStore};
use std::{
    fs::{File, Metadata},
    io::{BufRead, BufReader, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
    thread,
    time::Duration,
};
use tracing::{debug, info, warn};

/// Outcome of a single tailer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TailEvent {
    /// A fresh handle was opened and the run list reset.
    Opened,
    /// No handle and the file could not be opened yet.
    Missing,
    /// The open file was unlinked; the handle was dropped.
    Replaced,
    /// The open file shrank below what was already read; the handle was dropped.
    Truncated,
    /// A complete line was consumed.
    Line(Record),
    /// A complete observation line was malformed and ignored.
    Skipped,
    /// No complete line available right now.
    Idle,
}

/// Follows one path and maintains the run list for it.
pub struct Tailer {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    /// Bytes of a line whose terminator has not arrived yet.
    pending: Vec<u8>,
    /// Bytes consumed from the current handle.
    offset: u64,
    runs: Option<RunList>,
    dirty: bool,
    since_publish: usize,
    last_open_error: Option<ErrorKind>,
    store: Arc<RunStore>,
    alive: Liveness,
    interval: Duration,
}

impl Tailer {
    pub fn new(path: impl Into<PathBuf>, store: Arc<RunStore>) -> Self {
        Self {
            path: path.into(),
            reader: None,
            pending: Vec::new(),
            offset: 0,
            runs: None,
            dirty: false,
            since_publish: 0,
            last_open_error: None,
            store,
            alive: Liveness::new(),
            interval: TAIL_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn liveness(&self) -> Liveness {
        self.alive.clone()
    }

    /// The tailer's working copy; the store may lag it by one publish.
    pub fn runs(&self) -> Option<&RunList> {
        self.runs.as_ref()
    }

    /// Poll until stopped. Sleeps only when there is nothing to do.
    pub fn run(mut self) {
        info!(path = %self.path.display(), "tailer started");
        while self.alive.is_alive() {
            match self.poll_once() {
                TailEvent::Missing | TailEvent::Idle => thread::sleep(self.interval),
                _ => {}
            }
        }
        info!("tailer stopped");
    }

    /// Advance the state machine by one step.
    pub fn poll_once(&mut self) -> TailEvent {
        let Some(reader) = self.reader.as_ref() else {
            return self.open();
        };

        match reader.get_ref().metadata() {
            Ok(meta) => {
                if let Some(event) = detached(&meta, &self.path, self.offset) {
                    info!(path = %self.path.display(), ?event, "stream file went away, dropping handle");
                    self.reader = None;
                    return event;
                }
            }
            Err(e) => warn!(error = %e, "could not stat stream file"),
        }

        self.read_line()
    }

    fn open(&mut self) -> TailEvent {
        match File::open(&self.path) {
            Ok(file) => {
                info!(path = %self.path.display(), "opened stream file");
                self.reader = Some(BufReader::new(file));
                self.pending.clear();
                self.offset = 0;
                self.last_open_error = None;
                self.runs = Some(RunList::new());
                self.publish();
                TailEvent::Opened
            }
            Err(e) => {
                // only report a changed condition, this runs every poll
                if self.last_open_error != Some(e.kind()) {
                    if e.kind() == ErrorKind::NotFound {
                        debug!(path = %self.path.display(), "waiting for stream file");
                    } else {
                        warn!(path = %self.path.display(), error = %e, "cannot open stream file");
                    }
                    self.last_open_error = Some(e.kind());
                }
                TailEvent::Missing
            }
        }
    }

    fn read_line(&mut self) -> TailEvent {
        let Some(reader) = self.reader.as_mut() else {
            return TailEvent::Missing;
        };

        match reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => self.idle(),
            Ok(n) => {
                self.offset += n as u64;
                if self.pending.last() != Some(&b'\n') {
                    // writer is mid-line; wait for the rest
                    return self.idle();
                }
                let line = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                self.apply(&line)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => TailEvent::Idle,
            Err(e) => {
                warn!(error = %e, "read from stream file failed");
                self.idle()
            }
        }
    }

    fn apply(&mut self, line: &str) -> TailEvent {
        let Some(runs) = self.runs.as_mut() else {
            return TailEvent::Skipped;
        };

        match parse_line(line) {
            Ok(record) => {
                match record {
                    Record::Observation(energy) => runs.record(energy),
                    Record::Marker => {
                        debug!(runs = runs.len() + 1, "run marker");
                        runs.start_run();
                    }
                    Record::Unrecognized => return TailEvent::Line(record),
                }
                self.mark_dirty();
                TailEvent::Line(record)
            }
            Err(e) => {
                warn!(error = %e, line = line.trim_end(), "skipping malformed observation");
                TailEvent::Skipped
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.since_publish += 1;
        if self.since_publish >= PUBLISH_EVERY_LINES {
            self.publish();
        }
    }

    fn idle(&mut self) -> TailEvent {
        if self.dirty {
            self.publish();
        }
        TailEvent::Idle
    }

    fn publish(&mut self) {
        if let Some(runs) = &self.runs {
            self.store.publish(runs.clone());
        }
        self.dirty = false;
        self.since_publish = 0;
    }
}

/// Why the open handle no longer reflects the file at `path`, if it doesn't.
fn detached(meta: &Metadata, path: &Path, offset: u64) -> Option<TailEvent> {
    if is_unlinked(meta, path) {
        Some(TailEvent::Replaced)
    } else if meta.len() < offset {
        Some(TailEvent::Truncated)
    } else {
        None
    }
}

#[cfg(unix)]
fn is_unlinked(meta: &Metadata, _path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.nlink() == 0
}

#[cfg(not(unix))]
fn is_unlinked(_meta: &Metadata, path: &Path) -> bool {
    !path.exists()
}
