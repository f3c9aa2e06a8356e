use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::models::IconPosition;

/// Migrated item record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabItem {
    /// Display name.
    pub name: String,
    /// Planner id when it differs from the local key.
    ///
    /// `Some(None)` is written as an explicit `null` and marks generated
    /// items that have no planner counterpart at all.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub lab_id: Option<Option<String>>,
    /// Stack size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<u32>,
    /// Position in the icon atlas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_pos: Option<IconPosition>,
    /// Set on synthesised barrel and container items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained: Option<bool>,
}

/// Migrated process record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabProcess {
    /// Display name.
    pub name: String,
    /// Position in the icon atlas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_pos: Option<IconPosition>,
    /// Set on synthesised fill/empty and load/unload processes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained: Option<bool>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Items and processes of one migrated mod, keyed and ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabExport {
    /// Items by local id.
    pub items: BTreeMap<String, LabItem>,
    /// Processes by planner recipe id.
    pub processes: BTreeMap<String, LabProcess>,
}

/// Files written by [`LabExport::write`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    /// Item/process record file.
    pub data: PathBuf,
    /// Copied icon atlas.
    pub atlas: PathBuf,
}

impl LabExport {
    /// Write `<mod_id>.json` and copy `atlas` to `<mod_id>.webp` under `output_dir`.
    pub fn write(&self, output_dir: &Path, mod_id: &str, atlas: &Path) -> Result<ExportPaths> {
        if !atlas.is_file() {
            return Err(anyhow!(
                "icon atlas for {} missing at {}",
                mod_id,
                atlas.display()
            ));
        }
        let serialised = serde_json::to_string_pretty(self)
            .with_context(|| format!("failed to serialize export for {mod_id}"))?;

        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        let paths = ExportPaths {
            data: output_dir.join(format!("{mod_id}.json")),
            atlas: output_dir.join(format!("{mod_id}.webp")),
        };

        fs::write(&paths.data, serialised)
            .with_context(|| format!("failed to write {}", paths.data.display()))?;
        fs::copy(atlas, &paths.atlas).with_context(|| {
            format!(
                "failed to copy {} to {}",
                atlas.display(),
                paths.atlas.display()
            )
        })?;

        info!(
            "wrote {} items and {} processes to {}",
            self.items.len(),
            self.processes.len(),
            paths.data.display()
        );
        Ok(paths)
    }

    /// Read an export previously written by [`LabExport::write`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> LabExport {
        let mut export = LabExport::default();
        export.items.insert(
            "water-barrel".to_string(),
            LabItem {
                name: "Water barrel".to_string(),
                lab_id: Some(None),
                stack: None,
                icon_pos: Some(IconPosition("0px 0px".to_string())),
                contained: Some(true),
            },
        );
        export.items.insert(
            "Iron_Plate".to_string(),
            LabItem {
                name: "Iron plate".to_string(),
                lab_id: Some(Some("iron-plate".to_string())),
                stack: Some(100),
                icon_pos: None,
                contained: None,
            },
        );
        export.items.insert(
            "water".to_string(),
            LabItem {
                name: "Water".to_string(),
                lab_id: None,
                stack: None,
                icon_pos: None,
                contained: None,
            },
        );
        export.processes.insert(
            "iron-plate".to_string(),
            LabProcess {
                name: "Iron plate".to_string(),
                icon_pos: None,
                contained: None,
            },
        );
        export
    }

    #[test]
    fn writes_sorted_indented_json_and_atlas() -> Result<()> {
        let temp = tempdir()?;
        let atlas = temp.path().join("icons.webp");
        fs::write(&atlas, b"RIFF....WEBP")?;
        let out = temp.path().join("data");

        let export = sample();
        let paths = export.write(&out, "bobang", &atlas)?;
        assert_eq!(fs::read(&paths.atlas)?, b"RIFF....WEBP");

        let text = fs::read_to_string(&paths.data)?;
        assert!(text.starts_with("{\n  \"items\": {\n    \"Iron_Plate\": {"));
        assert!(text.contains("\"labId\": null"));
        assert!(text.contains("\"labId\": \"iron-plate\""));
        assert!(text.contains("\"iconPos\": \"0px 0px\""));

        let keys: Vec<&String> = export.items.keys().collect();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

        assert_eq!(LabExport::read(&paths.data)?, export);
        Ok(())
    }

    #[test]
    fn missing_atlas_writes_nothing() -> Result<()> {
        let temp = tempdir()?;
        let out = temp.path().join("data");
        let result = sample().write(&out, "bobang", &temp.path().join("absent.webp"));
        assert!(result.is_err());
        assert!(!out.join("bobang.json").exists());
        Ok(())
    }
}
