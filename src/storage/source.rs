//! Snapshot sources
//!
//! Reads provider snapshots from a file or stdin. Files ending in `.yaml` or
//! `.yml` are YAML; other files are JSON. Stdin is sniffed: a document that
//! starts with `{` or `[` is JSON, anything else YAML.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::Snapshot;

/// Snapshot document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Picks a format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SnapshotFormat::Yaml
            }
            _ => SnapshotFormat::Json,
        }
    }

    /// Picks a format from document content
    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }

    /// Decodes a document in this format
    pub fn decode(self, content: &str) -> Result<Snapshot> {
        let snapshot = match self {
            SnapshotFormat::Json => Snapshot::from_json_str(content)?,
            SnapshotFormat::Yaml => Snapshot::from_yaml_str(content)?,
        };
        Ok(snapshot)
    }
}

/// Reads a snapshot from a path, or from stdin when the path is `-`
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read snapshot from stdin")?;
        return SnapshotFormat::sniff(&content)
            .decode(&content)
            .context("Failed to load snapshot from stdin");
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    SnapshotFormat::from_path(path)
        .decode(&content)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))
}
