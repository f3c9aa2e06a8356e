#![warn(clippy::all, missing_docs)]

//! Core logic for porting planner mod data into local datasets.
//!
//! This crate hosts the data models, configuration handling, the dataset
//! provider abstraction, science pack analysis over technology prerequisites,
//! and the item/process migration pipeline used by the `labport` driver.

pub mod analysis;
pub mod config;
pub mod local;
pub mod manifest;
pub mod migrate;
pub mod models;
pub mod provider;

pub use analysis::{pack_reach, pack_requirements, PackReach, PackRequirement, TechnologyGraph};
pub use config::AppConfig;
pub use local::{KnownIds, LocalDatasets};
pub use manifest::SnapshotMetadata;
pub use migrate::{DatasetMigrator, LabExport, MigrationRules};
pub use models::{ModData, ModInfo};
pub use provider::{DatasetProvider, ProviderError, SnapshotProvider};

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn snapshot_to_export_pipeline() -> Result<()> {
        let temp = tempdir()?;
        let snapshot = temp.path().join("snapshot");
        let local_dir = temp.path().join("local");
        let output = temp.path().join("data");
        fs::create_dir_all(snapshot.join("bobang"))?;
        fs::create_dir_all(&local_dir)?;

        fs::write(
            snapshot.join("mods.json"),
            r#"[{ "id": "bobang", "name": "Bob's + Angel's", "game": "Factorio" }]"#,
        )?;
        fs::write(
            snapshot.join("bobang/data.json"),
            r#"{
                "items": [
                    { "id": "water", "name": "Water", "category": "fluids" },
                    { "id": "automation", "name": "Automation", "category": "technology" },
                    { "id": "logistics", "name": "Logistics", "category": "technology",
                      "technology": { "prerequisites": ["automation"] } }
                ],
                "recipes": [
                    { "id": "automation", "name": "Automation", "in": { "red": 1 },
                      "out": { "automation": 1 }, "isTechnology": true },
                    { "id": "logistics", "name": "Logistics", "in": { "red": 1, "green": 1 },
                      "out": { "logistics": 1 }, "isTechnology": true },
                    { "id": "red", "name": "Red", "in": {}, "out": { "red": 1 },
                      "unlockedBy": "automation" },
                    { "id": "green", "name": "Green", "in": {}, "out": { "green": 1 },
                      "unlockedBy": "logistics" }
                ],
                "icons": [{ "id": "water", "position": "-32px 0px" }]
            }"#,
        )?;
        fs::write(snapshot.join("bobang/icons.webp"), b"atlas")?;
        fs::write(
            local_dir.join("bob.json"),
            r#"{ "items": { "water-barrel": {} }, "processes": { "fill-water-barrel": {} } }"#,
        )?;

        let provider = SnapshotProvider::open(&snapshot)?;
        let info = provider.find("Bob's + Angel's")?;
        let data = provider.load(&info.id).await?;

        let requirements = pack_requirements(&data.items, &data.recipes);
        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].pack, "red");
        assert!(requirements[1].implied.contains("red"));

        let known = LocalDatasets::new(&local_dir).known_ids(["bob"])?;
        let export = DatasetMigrator::default().migrate(&info.id, &data, &known);
        let paths = export.write(&output, &info.id, &provider.atlas_path(&info.id)?)?;

        let written = LabExport::read(&paths.data)?;
        assert_eq!(written.items["water-barrel"].name, "Water barrel");
        assert_eq!(written.processes["fill-water-barrel"].name, "Fill water barrel");
        assert_eq!(fs::read(&paths.atlas)?, b"atlas");
        Ok(())
    }
}
