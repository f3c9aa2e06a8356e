//! Command handlers.

use anyhow::{bail, Result};
use labport_core::{
    pack_reach, pack_requirements, AppConfig, DatasetMigrator, DatasetProvider, LocalDatasets,
    SnapshotMetadata, SnapshotProvider,
};
use tracing::{info, warn};

pub fn mods(config: &AppConfig) -> Result<()> {
    let provider = SnapshotProvider::open(&config.snapshot_root)?;
    println!(
        "snapshot {} ({})",
        provider.root_path().display(),
        provider.metadata().describe()
    );
    for info in provider.mods()? {
        println!("{:<16} {}", info.id, info.display_name());
    }
    Ok(())
}

pub fn stamp(config: &AppConfig, commit: Option<String>) -> Result<()> {
    let metadata = SnapshotMetadata::stamp(&config.snapshot_root, commit)?;
    println!("{}", metadata.describe());
    Ok(())
}

pub fn datasets(config: &AppConfig) -> Result<()> {
    let local = LocalDatasets::new(&config.local_data_dir);
    for dataset in local.discover()? {
        match config.lab_for(&dataset) {
            Some(lab_id) => println!("{dataset:<24} -> {lab_id}"),
            None => println!("{dataset:<24}    (unmapped)"),
        }
    }
    Ok(())
}

pub async fn packs(config: &AppConfig, target: Option<&str>, reach: bool, json: bool) -> Result<()> {
    let provider = SnapshotProvider::open(&config.snapshot_root)?;
    let info = provider.find(target.unwrap_or(config.default_mod.as_str()))?;
    info!("analysing {}", info.display_name());

    let data = provider.load(&info.id).await?;
    let requirements = pack_requirements(&data.items, &data.recipes);
    let reach = reach.then(|| pack_reach(&data.items, &data.recipes));

    if json {
        let report = serde_json::json!({
            "mod": info.id,
            "packs": requirements,
            "reach": reach,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for requirement in &requirements {
        let implied: Vec<&str> = requirement.implied.iter().map(String::as_str).collect();
        println!(
            "{} ({}): [{}]",
            requirement.pack,
            requirement.unlocked_by,
            implied.join(", ")
        );
    }

    if let Some(reach) = reach {
        println!();
        for entry in reach {
            println!("{} {} {}", entry.pack, entry.consumers, entry.reachable);
        }
    }
    Ok(())
}

pub async fn migrate(config: &AppConfig, only: &[String]) -> Result<()> {
    let targets = config.lab_targets();
    if targets.is_empty() {
        warn!("no local datasets are mapped to a mod; nothing to migrate");
        return Ok(());
    }
    for mod_id in only {
        if !targets.contains_key(mod_id) {
            bail!("no local dataset maps to mod '{mod_id}'");
        }
    }

    let provider = SnapshotProvider::open(&config.snapshot_root)?;
    let local = LocalDatasets::new(&config.local_data_dir);
    let migrator = DatasetMigrator::default();

    for (mod_id, datasets) in &targets {
        if !only.is_empty() && !only.contains(mod_id) {
            continue;
        }

        let known = local.known_ids(datasets.iter().map(String::as_str))?;
        let data = provider.load(mod_id).await?;
        let export = migrator.migrate(mod_id, &data, &known);
        let atlas = provider.atlas_path(mod_id)?;
        let paths = export.write(&config.output_dir, mod_id, &atlas)?;
        info!("migrated {} into {}", mod_id, paths.data.display());
    }
    Ok(())
}
