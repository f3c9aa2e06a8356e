//! Migration of planner mod data into the local item/process schema.
//!
//! Items are re-keyed with the mod's id transform, recipes keep their ids,
//! and icons are attached to whichever side they match. Barrel and container
//! variants the planner does not model are synthesised from local ids.

mod export;
mod rules;

pub use export::{ExportPaths, LabExport, LabItem, LabProcess};
pub use rules::{pascal_snake_case, IdTransform, MigrationRule, MigrationRules};

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{local::KnownIds, models::ModData};
use rules::lower_first;

static BARREL_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+)-barrel").expect("invalid barrel item regex"));
static FILL_BARREL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fill-(.+)-barrel").expect("invalid fill barrel regex"));
static EMPTY_BARREL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"empty-(.+)-barrel").expect("invalid empty barrel regex"));
static CONTAINER_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ic-container-(.+)").expect("invalid container item regex"));
static LOAD_CONTAINER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ic-load-(.+)").expect("invalid container load regex"));
static UNLOAD_CONTAINER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ic-unload-(.+)").expect("invalid container unload regex"));

/// Converts planner datasets according to a [`MigrationRules`] table.
#[derive(Debug, Clone, Default)]
pub struct DatasetMigrator {
    rules: MigrationRules,
}

impl DatasetMigrator {
    /// Migrator using a custom rules table.
    pub fn new(rules: MigrationRules) -> Self {
        Self { rules }
    }

    /// Build the export for `mod_id` from its planner data.
    ///
    /// `known` holds the local item and process ids; synthetic entities are
    /// only generated for ids listed there whose base item exists.
    pub fn migrate(&self, mod_id: &str, data: &ModData, known: &KnownIds) -> LabExport {
        let rule = self.rules.rule(mod_id);
        let mut items = BTreeMap::new();
        let mut processes = BTreeMap::new();

        for item in &data.items {
            let id = rule.transform.apply(&item.id);
            let lab_id = (id != item.id).then(|| Some(item.id.clone()));
            items.insert(
                id,
                LabItem {
                    name: item.name.clone(),
                    lab_id,
                    stack: item.stack.filter(|stack| *stack != 0),
                    icon_pos: None,
                    contained: None,
                },
            );
        }

        for recipe in &data.recipes {
            processes.insert(
                recipe.id.clone(),
                LabProcess {
                    name: recipe.name.clone(),
                    icon_pos: None,
                    contained: None,
                },
            );
        }

        for icon in &data.icons {
            if let Some(item) = items.get_mut(&rule.transform.apply(&icon.id)) {
                item.icon_pos = Some(icon.position.clone());
            }
            if let Some(process) = processes.get_mut(&icon.id) {
                process.icon_pos = Some(icon.position.clone());
            }
        }

        if rule.barrels {
            generate_items(&mut items, &known.items, &BARREL_ITEM_RE, "barrel");
            generate_processes(&mut processes, &items, &known.processes, &FILL_BARREL_RE, |name| {
                format!("Fill {name} barrel")
            });
            generate_processes(&mut processes, &items, &known.processes, &EMPTY_BARREL_RE, |name| {
                format!("Empty {name} barrel")
            });
        }

        if rule.containers {
            generate_items(&mut items, &known.items, &CONTAINER_ITEM_RE, "container");
            generate_processes(&mut processes, &items, &known.processes, &LOAD_CONTAINER_RE, |name| {
                format!("Load {name}")
            });
            generate_processes(
                &mut processes,
                &items,
                &known.processes,
                &UNLOAD_CONTAINER_RE,
                |name| format!("Unload {name}"),
            );
        }

        debug!(
            items = items.len(),
            processes = processes.len(),
            "migrated {mod_id}"
        );
        LabExport { items, processes }
    }
}

fn base_id<'a>(pattern: &Regex, id: &'a str) -> Option<&'a str> {
    pattern
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|base| base.as_str())
}

fn generate_items(
    items: &mut BTreeMap<String, LabItem>,
    known: &BTreeSet<String>,
    pattern: &Regex,
    suffix: &str,
) {
    for id in known {
        let Some(base) = base_id(pattern, id).and_then(|base| items.get(base)) else {
            continue;
        };
        let generated = LabItem {
            name: format!("{} {}", base.name, suffix),
            lab_id: Some(None),
            stack: None,
            icon_pos: base.icon_pos.clone(),
            contained: Some(true),
        };
        items.insert(id.clone(), generated);
    }
}

fn generate_processes(
    processes: &mut BTreeMap<String, LabProcess>,
    items: &BTreeMap<String, LabItem>,
    known: &BTreeSet<String>,
    pattern: &Regex,
    name: impl Fn(&str) -> String,
) {
    for id in known {
        let Some(base) = base_id(pattern, id).and_then(|base| items.get(base)) else {
            continue;
        };
        processes.insert(
            id.clone(),
            LabProcess {
                name: name(&lower_first(&base.name)),
                icon_pos: base.icon_pos.clone(),
                contained: Some(true),
            },
        );
    }
}
