use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::graph::TechnologyGraph;
use crate::models::RecipeJson;

/// Consumption and unlock data for every science pack of a dataset.
#[derive(Debug, Clone, Default)]
pub struct SciencePackUsage {
    packs: Vec<String>,
    consumers: HashMap<String, usize>,
    unlocked_by: HashMap<String, String>,
}

impl SciencePackUsage {
    /// Collect science packs from technology-unlock recipe inputs.
    ///
    /// A pack's unlocking technology comes from the first recipe, in
    /// collection order, whose outputs contain the pack. If that recipe has
    /// no `unlockedBy` the pack has no unlocking technology.
    pub fn from_recipes(recipes: &[RecipeJson]) -> Self {
        let mut usage = Self::default();
        for recipe in recipes.iter().filter(|recipe| recipe.is_technology) {
            for pack in recipe.inputs.keys() {
                let count = usage.consumers.entry(pack.clone()).or_insert(0);
                if *count == 0 {
                    usage.packs.push(pack.clone());
                }
                *count += 1;
            }
        }

        for pack in &usage.packs {
            let tech = recipes
                .iter()
                .find(|recipe| recipe.outputs.contains_key(pack))
                .and_then(|recipe| recipe.unlocked_by.clone());
            if let Some(tech) = tech {
                usage.unlocked_by.insert(pack.clone(), tech);
            }
        }

        usage
    }

    /// Pack ids in order of first consumption.
    pub fn packs(&self) -> &[String] {
        &self.packs
    }

    /// Number of technology recipes consuming `pack`.
    pub fn consumers(&self, pack: &str) -> usize {
        self.consumers.get(pack).copied().unwrap_or(0)
    }

    /// Technology unlocking `pack`, if any.
    pub fn unlocked_by(&self, pack: &str) -> Option<&str> {
        self.unlocked_by.get(pack).map(String::as_str)
    }

    /// Technology id to the packs it unlocks, in pack order.
    pub fn unlocks_packs(&self) -> HashMap<&str, Vec<&str>> {
        let mut unlocks: HashMap<&str, Vec<&str>> = HashMap::new();
        for pack in &self.packs {
            if let Some(tech) = self.unlocked_by(pack) {
                unlocks.entry(tech).or_default().push(pack);
            }
        }
        unlocks
    }

    /// Packs implied by unlocking each pack, fewest implications first.
    ///
    /// Packs without an unlocking technology are left out.
    pub fn requirements(&self, graph: &TechnologyGraph) -> Vec<PackRequirement> {
        let unlocks = self.unlocks_packs();
        let mut requirements = Vec::new();

        for pack in &self.packs {
            let Some(tech) = self.unlocked_by(pack) else {
                continue;
            };

            let mut implied: BTreeSet<String> = graph
                .closure(tech)
                .iter()
                .filter_map(|reached| unlocks.get(reached.as_str()))
                .flatten()
                .map(|implied| implied.to_string())
                .collect();
            implied.remove(pack);

            requirements.push(PackRequirement {
                pack: pack.clone(),
                unlocked_by: tech.to_string(),
                implied,
            });
        }

        requirements.sort_by_key(|requirement| requirement.implied.len());
        requirements
    }

    /// How much of the tree each pack is involved in.
    pub fn reach(&self, recipes: &[RecipeJson], graph: &TechnologyGraph) -> Vec<PackReach> {
        self.packs
            .iter()
            .map(|pack| {
                let consuming = recipes
                    .iter()
                    .filter(|recipe| recipe.is_technology && recipe.inputs.contains_key(pack))
                    .flat_map(|recipe| recipe.outputs.keys())
                    .filter(|tech| graph.contains(tech))
                    .map(String::as_str);
                PackReach {
                    pack: pack.clone(),
                    consumers: self.consumers(pack),
                    reachable: graph.closure_of(consuming).len(),
                }
            })
            .collect()
    }
}

/// Packs implied by unlocking a given pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackRequirement {
    /// Science pack id.
    pub pack: String,
    /// Technology unlocking the pack.
    pub unlocked_by: String,
    /// Other packs unlocked somewhere in that technology's closure.
    pub implied: BTreeSet<String>,
}

/// Research reach of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackReach {
    /// Science pack id.
    pub pack: String,
    /// Technology recipes consuming the pack.
    pub consumers: usize,
    /// Technologies in the union of the closures of those consumers.
    pub reachable: usize,
}
