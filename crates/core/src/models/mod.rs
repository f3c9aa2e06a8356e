#![allow(missing_docs)]

//! Shared domain models.
//!
//! The raw shapes mirror the JSON exported by the external planner data
//! module; unknown fields are ignored so newer exports keep loading.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entry of the provider's mod list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModInfo {
    /// Short identifier (e.g. `k2se`), also the snapshot folder name.
    pub id: String,
    /// Human-readable dataset name.
    pub name: String,
    /// Game the dataset belongs to.
    pub game: String,
}

impl ModInfo {
    /// Returns a user-facing label combining name and game.
    pub fn display_name(&self) -> String {
        if self.game.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.game)
        }
    }
}

/// Full dataset of a single mod.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModData {
    #[serde(default)]
    pub items: Vec<ItemJson>,
    #[serde(default)]
    pub recipes: Vec<RecipeJson>,
    #[serde(default)]
    pub icons: Vec<IconJson>,
}

/// Raw item record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemJson {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<TechnologyJson>,
}

impl ItemJson {
    /// Whether the item represents a research unlock.
    pub fn is_technology(&self) -> bool {
        self.category == "technology"
    }

    /// Direct prerequisites, empty when the item carries no technology metadata.
    pub fn prerequisites(&self) -> &[String] {
        self.technology
            .as_ref()
            .and_then(|tech| tech.prerequisites.as_deref())
            .unwrap_or(&[])
    }
}

/// Technology metadata attached to an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnologyJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
}

/// Raw recipe record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeJson {
    pub id: String,
    pub name: String,
    #[serde(rename = "in", default)]
    pub inputs: Amounts,
    #[serde(rename = "out", default)]
    pub outputs: Amounts,
    #[serde(default)]
    pub is_technology: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_by: Option<String>,
}

/// Item quantities of a recipe side, kept in source order.
///
/// Science packs are ranked by first appearance, so the order the export
/// lists a recipe's inputs in is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amounts(Vec<(String, f64)>);

impl Amounts {
    /// Item ids in source order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|(id, _)| id)
    }

    /// Whether `id` is listed.
    pub fn contains_key(&self, id: &str) -> bool {
        self.0.iter().any(|(listed, _)| listed == id)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Amounts {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut amounts = Amounts::default();
        for (id, amount) in iter {
            let id = id.into();
            match amounts.0.iter_mut().find(|(listed, _)| *listed == id) {
                Some(entry) => entry.1 = amount,
                None => amounts.0.push((id, amount)),
            }
        }
        amounts
    }
}

impl Serialize for Amounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, amount) in &self.0 {
            map.serialize_entry(id, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Amounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountsVisitor;

        impl<'de> Visitor<'de> for AmountsVisitor {
            type Value = Amounts;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of item ids to quantities")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Amounts, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, f64>()? {
                    entries.push(entry);
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(AmountsVisitor)
    }
}

/// Atlas position of an item or recipe icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconPosition(pub String);

/// Raw icon record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconJson {
    pub id: String,
    pub position: IconPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_recipe() -> anyhow::Result<()> {
        let recipe: RecipeJson = serde_json::from_str(
            r#"{
                "id": "automation",
                "name": "Automation",
                "time": 10,
                "in": { "automation-science-pack": 10 },
                "out": { "automation": 1 },
                "isTechnology": true,
                "unlockedBy": "automation"
            }"#,
        )?;
        assert!(recipe.is_technology);
        assert!(recipe.inputs.contains_key("automation-science-pack"));
        assert_eq!(recipe.unlocked_by.as_deref(), Some("automation"));
        Ok(())
    }

    #[test]
    fn recipe_amounts_keep_source_order() -> anyhow::Result<()> {
        let recipe: RecipeJson = serde_json::from_str(
            r#"{
                "id": "production",
                "name": "Production",
                "in": { "production-science-pack": 1, "automation-science-pack": 1 },
                "out": { "production": 1 }
            }"#,
        )?;
        let keys: Vec<&String> = recipe.inputs.keys().collect();
        assert_eq!(keys, ["production-science-pack", "automation-science-pack"]);
        assert!(!recipe.outputs.contains_key("automation-science-pack"));

        let written = serde_json::to_string(&recipe.inputs)?;
        assert_eq!(
            written,
            r#"{"production-science-pack":1.0,"automation-science-pack":1.0}"#
        );
        Ok(())
    }

    #[test]
    fn missing_technology_metadata_has_no_prerequisites() -> anyhow::Result<()> {
        let item: ItemJson = serde_json::from_str(
            r#"{ "id": "logistics", "name": "Logistics", "category": "technology" }"#,
        )?;
        assert!(item.is_technology());
        assert!(item.prerequisites().is_empty());
        Ok(())
    }

    #[test]
    fn display_name_includes_game() {
        let info = ModInfo {
            id: "k2se".to_string(),
            name: "Krastorio 2 + SE".to_string(),
            game: "Factorio".to_string(),
        };
        assert_eq!(info.display_name(), "Krastorio 2 + SE (Factorio)");
    }
}
