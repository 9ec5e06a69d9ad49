//! Typed errors for the log format and startup configuration.

use thiserror::Error;

/// Why an observation line could not be turned into a sample.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed observation literal: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("observation has no numeric energy: {0}")]
    MissingEnergy(#[source] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("unknown quantum provider '{0}' (expected 'ibm' or 'rigetti')")]
    Unknown(String),
}
