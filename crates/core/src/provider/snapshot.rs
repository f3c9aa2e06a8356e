use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{DatasetProvider, ProviderError};
use crate::{
    manifest::{self, SnapshotMetadata},
    models::{ModData, ModInfo},
};

/// File listing every mod in the snapshot.
pub const MOD_LIST_FILE: &str = "mods.json";
/// Per-mod dataset file.
pub const DATA_FILE: &str = "data.json";
/// Per-mod icon atlas.
pub const ATLAS_FILE: &str = "icons.webp";

/// Thread-safe provider reading a snapshot exported from the planner data module.
///
/// Layout: `mods.json` at the root, then `<id>/data.json` and `<id>/icons.webp`.
#[derive(Clone)]
pub struct SnapshotProvider {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    root_path: PathBuf,
    metadata: SnapshotMetadata,
    cache: Vec<ModInfo>,
}

impl SnapshotProvider {
    /// Build a provider rooted at `root_path`, reading its manifest when present.
    pub fn open(root_path: impl Into<PathBuf>) -> Result<Self> {
        let root_path = root_path.into();
        let metadata =
            SnapshotMetadata::load(manifest::manifest_path(&root_path))?.unwrap_or_default();
        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                root_path,
                metadata,
                cache: Vec::new(),
            })),
        })
    }

    /// Current manifest metadata for the snapshot.
    pub fn metadata(&self) -> SnapshotMetadata {
        self.inner.read().metadata.clone()
    }

    /// Root path of the snapshot.
    pub fn root_path(&self) -> PathBuf {
        self.inner.read().root_path.clone()
    }

    fn mod_dir(&self, id: &str) -> Result<PathBuf> {
        let mods = self.mods()?;
        if !mods.iter().any(|info| info.id == id) {
            return Err(ProviderError::UnknownMod(id.to_string()).into());
        }
        Ok(self.root_path().join(id))
    }
}

impl DatasetProvider for SnapshotProvider {
    fn mods(&self) -> Result<Vec<ModInfo>> {
        let mut inner = self.inner.write();
        if inner.cache.is_empty() {
            inner.cache = read_mod_list(&inner.root_path)?;
        }
        Ok(inner.cache.clone())
    }

    async fn load(&self, id: &str) -> Result<ModData> {
        let path = self.mod_dir(id)?.join(DATA_FILE);
        if !path.is_file() {
            return Err(ProviderError::MissingDataset {
                id: id.to_string(),
                path,
            }
            .into());
        }

        info!("loading dataset {} from {}", id, path.display());
        let contents = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let data: ModData = serde_json::from_slice(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(
            items = data.items.len(),
            recipes = data.recipes.len(),
            icons = data.icons.len(),
            "loaded dataset {id}"
        );
        Ok(data)
    }

    fn atlas_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.mod_dir(id)?.join(ATLAS_FILE))
    }
}

fn read_mod_list(root: &Path) -> Result<Vec<ModInfo>> {
    let path = root.join(MOD_LIST_FILE);
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read mod list {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse mod list {}", path.display()))
}
