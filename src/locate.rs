//! Find the stream file of the selected optimiser program through the CK CLI.

use crate::constants::{STREAM_DIR, STREAM_FILE};
use crate::error::ProviderError;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info};

/// Quantum backend, which decides the program whose stream file is watched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Ibm,
    Rigetti,
}

impl Provider {
    /// CK program entry that writes the stream file.
    pub fn program(self) -> &'static str {
        match self {
            Provider::Ibm => "qiskit-vqe",
            Provider::Rigetti => "rigetti-vqe2",
        }
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ibm" => Ok(Provider::Ibm),
            "rigetti" => Ok(Provider::Rigetti),
            other => Err(ProviderError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Ibm => "ibm",
            Provider::Rigetti => "rigetti",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub provider: Provider,
    /// CK installation root; `ck` is taken from `PATH` when unset.
    pub ck_root: Option<PathBuf>,
}

impl LookupConfig {
    pub fn ck_binary(&self) -> PathBuf {
        match &self.ck_root {
            Some(root) => root.join("bin").join("ck"),
            None => PathBuf::from("ck"),
        }
    }
}

/// Reply of `ck load ... --out=json`.
#[derive(Debug, Deserialize)]
struct LoadResponse {
    #[serde(rename = "return")]
    code: i64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
}

/// Ask CK where the program entry lives and point at its stream file.
pub fn resolve_stream_path(cfg: &LookupConfig) -> Result<PathBuf> {
    let program = cfg.provider.program();
    let ck = cfg.ck_binary();
    info!(provider = %cfg.provider, program, ck = %ck.display(), "looking up stream file");

    let output = Command::new(&ck)
        .arg("load")
        .arg(format!("program:{program}"))
        .arg("--out=json")
        .output()
        .with_context(|| format!("failed to run {}", ck.display()))?;

    if !output.status.success() && output.stdout.is_empty() {
        bail!(
            "{} exited with {}: {}",
            ck.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let entry = parse_load_response(&output.stdout)
        .with_context(|| format!("CK could not load program:{program}"))?;
    let path = stream_path(&entry);
    debug!(path = %path.display(), "resolved stream file");
    Ok(path)
}

/// Program entry directory from a CK JSON reply.
pub fn parse_load_response(raw: &[u8]) -> Result<PathBuf> {
    let resp: LoadResponse =
        serde_json::from_slice(raw).context("CK reply is not valid JSON")?;
    if resp.code > 0 {
        bail!(
            "CK returned {}: {}",
            resp.code,
            resp.error.as_deref().unwrap_or("no error message")
        );
    }
    resp.path.context("CK reply has no path")
}

/// `<entry>/tmp/vqe_stream.json`
pub fn stream_path(entry: &Path) -> PathBuf {
    entry.join(STREAM_DIR).join(STREAM_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_map_to_programs() {
        assert_eq!("ibm".parse::<Provider>().unwrap().program(), "qiskit-vqe");
        assert_eq!(
            "rigetti".parse::<Provider>().unwrap().program(),
            "rigetti-vqe2"
        );
        assert_eq!(Provider::default(), Provider::Ibm);
        assert_eq!(
            "dwave".parse::<Provider>(),
            Err(ProviderError::Unknown("dwave".into()))
        );
    }

    #[test]
    fn ck_binary_honours_root() {
        let mut cfg = LookupConfig {
            provider: Provider::Ibm,
            ck_root: None,
        };
        assert_eq!(cfg.ck_binary(), PathBuf::from("ck"));
        cfg.ck_root = Some(PathBuf::from("/opt/ck"));
        assert_eq!(cfg.ck_binary(), PathBuf::from("/opt/ck/bin/ck"));
    }

    #[test]
    fn successful_reply_gives_entry_path() {
        let raw = br#"{"return": 0, "path": "/repo/program/qiskit-vqe", "dict": {}}"#;
        let entry = parse_load_response(raw).unwrap();
        assert_eq!(entry, PathBuf::from("/repo/program/qiskit-vqe"));
        assert_eq!(
            stream_path(&entry),
            PathBuf::from("/repo/program/qiskit-vqe/tmp/vqe_stream.json")
        );
    }

    #[test]
    fn error_reply_carries_ck_message() {
        let raw = br#"{"return": 16, "error": "can't find path to CK entry"}"#;
        let err = parse_load_response(raw).unwrap_err();
        assert!(err.to_string().contains("can't find path to CK entry"));
    }

    #[test]
    fn garbage_reply_is_an_error() {
        assert!(parse_load_response(b"not json").is_err());
        assert!(parse_load_response(br#"{"return": 0}"#).is_err());
    }

    #[test]
    fn missing_ck_binary_is_an_error() {
        let cfg = LookupConfig {
            provider: Provider::Rigetti,
            ck_root: Some(PathBuf::from("/nonexistent/ck-root")),
        };
        let err = resolve_stream_path(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ck-root/bin/ck"));
    }
}
