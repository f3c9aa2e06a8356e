//! Application configuration.
//!
//! Values are layered from built-in defaults, an optional TOML file under the
//! user's config directory, and `LABPORT_*` environment variables.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the user's config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "labport";

const DEFAULT_CONFIG: &str = r#"# labport configuration

# Directory holding the exported planner data snapshot
# (mods.json plus one <mod>/data.json and <mod>/icons.webp per mod).
snapshot_root = "snapshot"

# Directory holding local datasets (<dataset>.json with items/processes).
local_data_dir = "data/local"

# Directory receiving migrated <mod>.json and <mod>.webp files.
output_dir = "data"

# Mod analysed by `labport packs` when none is given.
default_mod = "Krastorio 2 + SE"

# Local dataset id -> planner mod id. Datasets without a counterpart
# can be listed with an empty string.
[datasets]
"#;

/// Resolved runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the exported data snapshot.
    pub snapshot_root: PathBuf,
    /// Directory holding local datasets.
    pub local_data_dir: PathBuf,
    /// Directory receiving migration output.
    pub output_dir: PathBuf,
    /// Mod name or id used when the driver is not given one.
    pub default_mod: String,
    /// Legacy mapping from local dataset id to planner mod id.
    #[serde(default)]
    pub datasets: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_root: PathBuf::from("snapshot"),
            local_data_dir: PathBuf::from("data/local"),
            output_dir: PathBuf::from("data"),
            default_mod: "Krastorio 2 + SE".to_string(),
            datasets: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load configuration from an explicit file; a missing file leaves defaults in place.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("snapshot_root", defaults.snapshot_root.to_string_lossy().to_string())?
            .set_default("local_data_dir", defaults.local_data_dir.to_string_lossy().to_string())?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("default_mod", defaults.default_mod)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("LABPORT"))
            .build()
            .with_context(|| format!("failed to load configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Planner mod id mapped to `dataset`, ignoring case.
    ///
    /// The config crate lowercases table keys, so `[datasets]` entries are
    /// compared case-insensitively against dataset file names.
    pub fn lab_for(&self, dataset: &str) -> Option<&str> {
        self.datasets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(dataset))
            .map(|(_, lab_id)| lab_id.trim())
            .filter(|lab_id| !lab_id.is_empty())
    }

    /// Invert the legacy mapping: planner mod id to the local datasets feeding it.
    ///
    /// Datasets mapped to an empty id have no planner counterpart and are skipped.
    pub fn lab_targets(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut targets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (dataset, lab_id) in &self.datasets {
            let lab_id = lab_id.trim();
            if lab_id.is_empty() {
                continue;
            }
            targets
                .entry(lab_id.to_string())
                .or_default()
                .insert(dataset.clone());
        }
        targets
    }
}

/// Default path of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_config_at(default_config_path())
}

/// Write a commented default configuration at `path` if it is missing.
pub fn ensure_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}
