//! Manifest stored alongside an exported data snapshot.
//!
//! The snapshot itself is produced outside labport; `labport stamp` records
//! which data module commit it came from so later runs can report it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

const MANIFEST_FILE: &str = ".labport-manifest.json";

/// Where a snapshot came from and when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    /// Commit hash of the data module the snapshot was exported from.
    pub commit: Option<String>,
    /// When the snapshot was stamped.
    pub updated_at: Option<DateTime<Utc>>,
}

impl SnapshotMetadata {
    /// Load metadata from the given path, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let metadata = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Some(metadata))
    }

    /// Record `commit` and the current time in the manifest of `snapshot_root`.
    pub fn stamp(snapshot_root: impl AsRef<Path>, commit: Option<String>) -> Result<Self> {
        let snapshot_root = snapshot_root.as_ref();
        if !snapshot_root.is_dir() {
            bail!("snapshot directory {} does not exist", snapshot_root.display());
        }

        let metadata = Self {
            commit,
            updated_at: Some(Utc::now()),
        };
        let path = manifest_path(snapshot_root);
        let serialized =
            serde_json::to_string_pretty(&metadata).context("failed to serialize snapshot metadata")?;
        fs::write(&path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;

        info!("stamped snapshot {}: {}", snapshot_root.display(), metadata.describe());
        Ok(metadata)
    }

    /// One-line summary for listings.
    pub fn describe(&self) -> String {
        let commit = self.commit.as_deref().unwrap_or("unknown commit");
        match self.updated_at {
            Some(at) => format!("{commit}, stamped {}", at.format("%Y-%m-%d %H:%M UTC")),
            None => format!("{commit}, never stamped"),
        }
    }
}

/// Manifest path inside a snapshot directory.
pub fn manifest_path(snapshot_root: impl AsRef<Path>) -> PathBuf {
    snapshot_root.as_ref().join(MANIFEST_FILE)
}
