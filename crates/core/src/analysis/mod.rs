//! Science pack implication analysis over the technology prerequisite graph.
//!
//! A science pack is any item consumed by a technology-unlock recipe. Unlocking
//! a pack means researching its unlocking technology, which in turn implies
//! every technology in that technology's prerequisite closure, and therefore
//! every pack those technologies unlock.

mod graph;
mod packs;

pub use graph::TechnologyGraph;
pub use packs::{PackReach, PackRequirement, SciencePackUsage};

use tracing::debug;

use crate::models::{ItemJson, RecipeJson};

/// Packs implied by each pack, sorted so the most independent packs come first.
pub fn pack_requirements(items: &[ItemJson], recipes: &[RecipeJson]) -> Vec<PackRequirement> {
    let graph = TechnologyGraph::from_items(items);
    let usage = SciencePackUsage::from_recipes(recipes);
    debug!(
        technologies = graph.technology_count(),
        packs = usage.packs().len(),
        "analysing pack requirements"
    );
    usage.requirements(&graph)
}

/// Consumer count and reachable technology count for each pack.
pub fn pack_reach(items: &[ItemJson], recipes: &[RecipeJson]) -> Vec<PackReach> {
    let graph = TechnologyGraph::from_items(items);
    SciencePackUsage::from_recipes(recipes).reach(recipes, &graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amounts, TechnologyJson};

    fn tech(id: &str, prerequisites: &[&str]) -> ItemJson {
        ItemJson {
            id: id.to_string(),
            name: id.to_string(),
            category: "technology".to_string(),
            technology: Some(TechnologyJson {
                prerequisites: Some(prerequisites.iter().map(|p| p.to_string()).collect()),
            }),
            ..Default::default()
        }
    }

    fn amounts(ids: &[&str]) -> Amounts {
        ids.iter().map(|id| (id.to_string(), 1.0)).collect()
    }

    /// Research recipe for `tech` consuming `packs`.
    fn research(tech: &str, packs: &[&str]) -> RecipeJson {
        RecipeJson {
            id: tech.to_string(),
            name: tech.to_string(),
            inputs: amounts(packs),
            outputs: amounts(&[tech]),
            is_technology: true,
            unlocked_by: None,
        }
    }

    /// Crafting recipe for `pack`, unlocked by `tech`.
    fn craft(pack: &str, tech: Option<&str>) -> RecipeJson {
        RecipeJson {
            id: pack.to_string(),
            name: pack.to_string(),
            inputs: amounts(&["iron-plate"]),
            outputs: amounts(&[pack]),
            is_technology: false,
            unlocked_by: tech.map(str::to_string),
        }
    }

    fn implied(requirements: &[PackRequirement], pack: &str) -> Vec<String> {
        requirements
            .iter()
            .find(|req| req.pack == pack)
            .map(|req| req.implied.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn later_pack_implies_earlier_pack() {
        let items = vec![tech("A", &[]), tech("B", &["A"])];
        let recipes = vec![
            research("A", &["p0"]),
            research("B", &["p0", "p1"]),
            research("C", &["p1", "p2"]),
            craft("p1", Some("A")),
            craft("p2", Some("B")),
        ];

        let requirements = pack_requirements(&items, &recipes);
        assert_eq!(implied(&requirements, "p2"), vec!["p1"]);
        assert!(implied(&requirements, "p1").is_empty());
        assert_eq!(requirements[0].pack, "p1");
        assert_eq!(requirements[1].unlocked_by, "B");
    }

    #[test]
    fn pack_without_unlocking_technology_is_excluded() {
        let items = vec![ItemJson {
            id: "sci-pack".to_string(),
            name: "Science pack".to_string(),
            category: "technology".to_string(),
            ..Default::default()
        }];
        let recipes = vec![
            research("sci-pack", &["basic-pack", "crafted-pack"]),
            craft("crafted-pack", None),
        ];

        let requirements = pack_requirements(&items, &recipes);
        assert!(requirements.is_empty());

        let usage = SciencePackUsage::from_recipes(&recipes);
        assert_eq!(usage.packs(), ["basic-pack", "crafted-pack"]);
        assert_eq!(usage.unlocked_by("crafted-pack"), None);
    }

    #[test]
    fn packs_follow_input_order_within_a_recipe() {
        let recipes = vec![
            research("T1", &["space-pack", "automation-pack"]),
            research("T2", &["automation-pack", "logistic-pack"]),
        ];
        let usage = SciencePackUsage::from_recipes(&recipes);
        assert_eq!(
            usage.packs(),
            ["space-pack", "automation-pack", "logistic-pack"]
        );
        assert_eq!(usage.consumers("automation-pack"), 2);
    }

    #[test]
    fn first_producing_recipe_wins() {
        let recipes = vec![
            research("T", &["pack"]),
            craft("pack", Some("first")),
            craft("pack", Some("second")),
        ];
        let usage = SciencePackUsage::from_recipes(&recipes);
        assert_eq!(usage.unlocked_by("pack"), Some("first"));
        assert_eq!(usage.consumers("pack"), 1);
    }

    #[test]
    fn output_is_sorted_by_implication_count_and_deterministic() {
        let items = vec![
            tech("t1", &[]),
            tech("t2", &["t1"]),
            tech("t3", &["t2"]),
        ];
        let recipes = vec![
            research("t1", &["c"]),
            research("t2", &["b", "c"]),
            research("t3", &["a", "b", "c"]),
            craft("a", Some("t3")),
            craft("b", Some("t2")),
            craft("c", Some("t1")),
        ];

        let first = pack_requirements(&items, &recipes);
        let order: Vec<_> = first.iter().map(|req| req.pack.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(implied(&first, "a"), vec!["b", "c"]);
        assert_eq!(first, pack_requirements(&items, &recipes));
    }

    #[test]
    fn cyclic_prerequisites_do_not_hang() {
        let items = vec![tech("x", &["y"]), tech("y", &["x"])];
        let recipes = vec![
            research("x", &["px", "py"]),
            craft("px", Some("x")),
            craft("py", Some("y")),
        ];

        let requirements = pack_requirements(&items, &recipes);
        assert_eq!(implied(&requirements, "px"), vec!["py"]);
        assert_eq!(implied(&requirements, "py"), vec!["px"]);
    }

    #[test]
    fn reach_counts_consumers_and_reachable_technologies() {
        let items = vec![tech("A", &[]), tech("B", &["A"]), tech("C", &["B"])];
        let recipes = vec![
            research("A", &["red"]),
            research("B", &["red", "green"]),
            research("C", &["green"]),
        ];

        let reach = pack_reach(&items, &recipes);
        assert_eq!(
            reach,
            vec![
                PackReach {
                    pack: "red".to_string(),
                    consumers: 2,
                    reachable: 2,
                },
                PackReach {
                    pack: "green".to_string(),
                    consumers: 2,
                    reachable: 3,
                },
            ]
        );
    }
}
