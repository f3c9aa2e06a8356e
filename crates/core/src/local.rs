//! Index over the locally maintained datasets.
//!
//! Local datasets decide which synthetic barrel and container entities a
//! migration generates: only ids already present here are produced.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

/// Item and process ids known from local datasets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIds {
    /// Item ids, sorted.
    pub items: BTreeSet<String>,
    /// Process ids, sorted.
    pub processes: BTreeSet<String>,
}

impl KnownIds {
    /// Build from plain id lists.
    pub fn new<I, P>(items: I, processes: P) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            processes: processes.into_iter().map(Into::into).collect(),
        }
    }

    fn extend(&mut self, other: KnownIds) {
        self.items.extend(other.items);
        self.processes.extend(other.processes);
    }
}

#[derive(Debug, Deserialize)]
struct LocalDataset {
    #[serde(default)]
    items: BTreeMap<String, Value>,
    #[serde(default)]
    processes: BTreeMap<String, Value>,
}

/// Directory of `<dataset>.json` files.
#[derive(Debug, Clone)]
pub struct LocalDatasets {
    root: PathBuf,
}

impl LocalDatasets {
    /// Index datasets stored beneath `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ids of all datasets present on disk, sorted.
    pub fn discover(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| format!("failed to scan {}", self.root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Union of item and process ids across the given datasets.
    pub fn known_ids<'a>(&self, datasets: impl IntoIterator<Item = &'a str>) -> Result<KnownIds> {
        let mut known = KnownIds::default();
        for dataset in datasets {
            let ids = self.read(dataset)?;
            debug!(
                items = ids.items.len(),
                processes = ids.processes.len(),
                "indexed local dataset {dataset}"
            );
            known.extend(ids);
        }
        Ok(known)
    }

    fn read(&self, dataset: &str) -> Result<KnownIds> {
        let path = self.resolve(dataset)?;
        read_dataset(&path)
    }

    /// Path of `dataset`, matching the file stem case-insensitively when the
    /// exact file is absent. Config keys arrive lowercased, file names do not.
    fn resolve(&self, dataset: &str) -> Result<PathBuf> {
        let path = self.dataset_path(dataset);
        if path.is_file() {
            return Ok(path);
        }

        let matches: Vec<String> = self
            .discover()?
            .into_iter()
            .filter(|stem| stem.eq_ignore_ascii_case(dataset))
            .collect();
        match matches.as_slice() {
            [stem] => Ok(self.dataset_path(stem)),
            [] => Err(anyhow!(
                "local dataset {} missing at {}",
                dataset,
                path.display()
            )),
            _ => Err(anyhow!(
                "local dataset {} is ambiguous: {}",
                dataset,
                matches.join(", ")
            )),
        }
    }

    fn dataset_path(&self, dataset: &str) -> PathBuf {
        self.root.join(format!("{dataset}.json"))
    }
}

fn read_dataset(path: &Path) -> Result<KnownIds> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let dataset: LocalDataset = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(KnownIds {
        items: dataset.items.into_keys().collect(),
        processes: dataset.processes.into_keys().collect(),
    })
}
