//! Dataset providers.
//!
//! A provider exposes the mod list of the external planner data module and
//! loads one mod's items, recipes and icons on demand.

use std::{future::Future, path::PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::models::{ModData, ModInfo};

/// Provider backed by a pre-exported snapshot directory.
pub mod snapshot;

pub use snapshot::SnapshotProvider;

/// Typed failures surfaced by providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No mod matches the requested id or name.
    #[error("unknown mod '{0}'")]
    UnknownMod(String),
    /// More than one mod matches a loose query.
    #[error("'{query}' is ambiguous, matches: {}", candidates.join(", "))]
    AmbiguousMod {
        /// Query as given by the caller.
        query: String,
        /// Ids of every matching mod.
        candidates: Vec<String>,
    },
    /// The mod is listed but its data file is absent.
    #[error("dataset for mod '{id}' missing at {path}")]
    MissingDataset {
        /// Mod id.
        id: String,
        /// Expected data file location.
        path: PathBuf,
    },
}

/// Capability to list mods and load their datasets.
pub trait DatasetProvider {
    /// All mods known to the provider.
    fn mods(&self) -> Result<Vec<ModInfo>>;

    /// Load the dataset for a mod id.
    fn load(&self, id: &str) -> impl Future<Output = Result<ModData>> + Send;

    /// Location of the mod's icon atlas image.
    fn atlas_path(&self, id: &str) -> Result<PathBuf>;

    /// Select a mod by id or human-readable name.
    ///
    /// Exact id matches win over exact name matches; otherwise a unique
    /// case-insensitive substring match on id, name or game is accepted.
    fn find(&self, query: &str) -> Result<ModInfo> {
        let mods = self.mods()?;
        select_mod(&mods, query)
    }
}

pub(crate) fn select_mod(mods: &[ModInfo], query: &str) -> Result<ModInfo> {
    let query = query.trim();
    if let Some(found) = mods.iter().find(|info| info.id == query) {
        return Ok(found.clone());
    }
    if let Some(found) = mods.iter().find(|info| info.name == query) {
        return Ok(found.clone());
    }

    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Err(ProviderError::UnknownMod(query.to_string()).into());
    }
    let matches: Vec<&ModInfo> = mods
        .iter()
        .filter(|info| {
            info.id.to_lowercase().contains(&needle)
                || info.name.to_lowercase().contains(&needle)
                || info.game.to_lowercase().contains(&needle)
        })
        .collect();

    match matches.as_slice() {
        [] => Err(ProviderError::UnknownMod(query.to_string()).into()),
        [only] => Ok((*only).clone()),
        many => Err(ProviderError::AmbiguousMod {
            query: query.to_string(),
            candidates: many.iter().map(|info| info.id.clone()).collect(),
        }
        .into()),
    }
}
