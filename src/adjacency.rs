use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::error::Result;

/// Symmetric "shares a boundary" relation between tracts.
///
/// Input records may be one-directional (A lists B but B omits A); the
/// relation is closed symmetrically on construction so that constraint
/// generation never depends on which direction survived in the data.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: BTreeMap<String, BTreeSet<String>>,
}

impl Adjacency {
    /// Builds the relation from directed edge records, applying symmetric
    /// closure. Self-loops are dropped.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut neighbors: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (a, b) in edges {
            let (a, b) = (a.into(), b.into());
            if a == b {
                continue;
            }
            neighbors.entry(a.clone()).or_default().insert(b.clone());
            neighbors.entry(b).or_default().insert(a);
        }
        Self { neighbors }
    }

    /// Loads the relation from a JSON document mapping each tract id to the
    /// list of its neighbors. `strip_prefix`, when non-empty, is removed from
    /// the front of every identifier so that shapefile GEOIDs (with a leading
    /// state FIPS digit) match the attribute table's tract ids.
    pub fn load_json(path: &Path, strip_prefix: &str) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;

        let edges = raw.into_iter().flat_map(|(tract, neighbors)| {
            let tract = strip_state_prefix(&tract, strip_prefix);
            neighbors
                .into_iter()
                .map(move |n| (tract.clone(), strip_state_prefix(&n, strip_prefix)))
        });
        let adjacency = Self::from_edges(edges);
        debug!(
            "loaded adjacency for {} tracts ({} undirected pairs)",
            adjacency.neighbors.len(),
            adjacency.pairs().len()
        );
        Ok(adjacency)
    }

    /// Neighbors of a tract, in ascending geoid order.
    pub fn neighbors(&self, geoid: &str) -> impl Iterator<Item = &str> {
        self.neighbors
            .get(geoid)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors
            .get(a)
            .map_or(false, |set| set.contains(b))
    }

    /// All unordered adjacent pairs, each emitted exactly once with its
    /// endpoints in ascending order.
    pub fn pairs(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        for (tract, neighbors) in &self.neighbors {
            for neighbor in neighbors {
                pairs.insert(canonical_pair(tract, neighbor));
            }
        }
        pairs
    }

    /// Unordered adjacent pairs with both endpoints inside `scope`.
    pub fn pairs_within(&self, scope: &BTreeSet<&str>) -> BTreeSet<(String, String)> {
        self.pairs()
            .into_iter()
            .filter(|(a, b)| scope.contains(a.as_str()) && scope.contains(b.as_str()))
            .collect()
    }
}

fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn strip_state_prefix(id: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return id.to_string();
    }
    id.strip_prefix(prefix).unwrap_or(id).to_string()
}
