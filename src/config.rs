//! Startup configuration from the command line and the environment.

use crate::constants::{CK_ROOT_VAR, COLOR_VAR, PROVIDER_VAR};
use crate::locate::{self, LookupConfig, Provider};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where the stream file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Given on the command line.
    File(PathBuf),
    /// Looked up through CK for the configured provider.
    Lookup(LookupConfig),
}

impl LogSource {
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            LogSource::File(path) => Ok(path.clone()),
            LogSource::Lookup(cfg) => locate::resolve_stream_path(cfg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: LogSource,
    /// Style every series from the palette.
    pub color: bool,
}

impl Config {
    pub fn from_env(cli_path: Option<PathBuf>) -> Result<Self> {
        Self::from_vars(cli_path, |key| std::env::var(key).ok())
    }

    /// Build from an explicit variable lookup.
    pub fn from_vars(
        cli_path: Option<PathBuf>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let source = match cli_path {
            Some(path) => LogSource::File(path),
            None => {
                let provider = match var(PROVIDER_VAR) {
                    Some(name) => name
                        .parse::<Provider>()
                        .with_context(|| format!("invalid {PROVIDER_VAR}"))?,
                    None => Provider::default(),
                };
                let ck_root = var(CK_ROOT_VAR)
                    .filter(|root| !root.is_empty())
                    .map(PathBuf::from);
                LogSource::Lookup(LookupConfig { provider, ck_root })
            }
        };

        let color = var(COLOR_VAR).is_some_and(|v| is_truthy(&v));

        Ok(Self { source, color })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
