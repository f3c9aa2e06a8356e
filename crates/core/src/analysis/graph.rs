use std::collections::{BTreeSet, HashMap};

use crate::models::ItemJson;

/// Technology id to its direct prerequisites.
///
/// Expected to be acyclic, but traversal never relies on it: every walk
/// keeps a visited set, so a malformed cycle is treated as fully connected.
#[derive(Debug, Clone, Default)]
pub struct TechnologyGraph {
    reqs: HashMap<String, Vec<String>>,
}

impl TechnologyGraph {
    /// Build the graph from the technology items of a dataset.
    ///
    /// Items outside the `technology` category are ignored; a technology
    /// without metadata has no prerequisites.
    pub fn from_items(items: &[ItemJson]) -> Self {
        Self::from_edges(
            items
                .iter()
                .filter(|item| item.is_technology())
                .map(|item| (item.id.clone(), item.prerequisites().to_vec())),
        )
    }

    /// Build the graph from `(technology, prerequisites)` pairs.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let reqs = edges
            .into_iter()
            .map(|(tech, reqs)| (tech.into(), reqs.into_iter().map(Into::into).collect()))
            .collect();
        Self { reqs }
    }

    /// Whether `id` is a known technology.
    pub fn contains(&self, id: &str) -> bool {
        self.reqs.contains_key(id)
    }

    /// Number of technologies.
    pub fn technology_count(&self) -> usize {
        self.reqs.len()
    }

    /// Direct prerequisites of `id`; unknown ids have none.
    pub fn prerequisites(&self, id: &str) -> &[String] {
        self.reqs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every technology reachable from `id` through prerequisites, `id` included.
    pub fn closure(&self, id: &str) -> BTreeSet<String> {
        self.closure_of([id])
    }

    /// Union of the closures of every id in `starts`.
    pub fn closure_of<'a>(&self, starts: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<&str> = starts.into_iter().collect();

        while let Some(tech) = stack.pop() {
            if visited.contains(tech) {
                continue;
            }
            visited.insert(tech.to_string());
            stack.extend(self.prerequisites(tech).iter().map(String::as_str));
        }

        visited
    }
}
