//! Line classifier for the optimiser's stream file.
//!
//! The producer writes one record per line:
//!
//! ```text
//! # new run
//! {"energy": -1.6234, "iteration": 3}
//! ```
//!
//! `#` lines open a new run, `{` lines carry one energy sample for the current
//! run, and everything else is left alone so the producer can add annotations
//! without breaking older readers.

use crate::constants::{MARKER_PREFIX, OBSERVATION_PREFIX};
use crate::error::ParseError;
use serde::Deserialize;

/// A classified log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    Observation(f64),
    Marker,
    Unrecognized,
}

/// Only the field we plot; everything else in the mapping is ignored.
#[derive(Debug, Deserialize)]
struct Observation {
    energy: f64,
}

/// Classify one complete line (line terminator optional).
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);

    if line.starts_with(MARKER_PREFIX) {
        return Ok(Record::Marker);
    }
    if !line.starts_with(OBSERVATION_PREFIX) {
        return Ok(Record::Unrecognized);
    }

    let obs: Observation = serde_json::from_str(line).map_err(|e| {
        if e.is_data() {
            ParseError::MissingEnergy(e)
        } else {
            ParseError::Malformed(e)
        }
    })?;
    Ok(Record::Observation(obs.energy))
}
