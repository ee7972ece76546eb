//! Graph Documents
//!
//! JSON interchange format for graph snapshots:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "n1", "loc": { "lon": 13.4, "lat": 52.5 }, "tags": {} }],
//!   "ways": [{ "id": "w1", "nodes": ["n1", "n2"], "tags": { "highway": "residential" } }],
//!   "relations": [{ "id": "r1", "members": [{ "id": "w1", "type": "way", "role": "" }] }],
//!   "loaded_tiles": [{ "x": 35208, "y": 21492 }]
//! }
//! ```
//!
//! When `loaded_tiles` is absent the whole document counts as loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::coverage::{Coverage, Tile, TileCoverage};
use super::entity::{Entity, EntityId, EntityKind, Node, Relation, Way};
use super::error::GraphError;
use super::snapshot::Graph;

/// On-disk representation of a graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub ways: Vec<Way>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_tiles: Option<Vec<Tile>>,
}

/// A document turned into a graph plus its coverage
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub graph: Graph,
    pub coverage: Coverage,
}

impl GraphDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse graph document")
    }

    /// Read and build a document from disk
    pub fn load(path: &Path) -> Result<LoadedDocument> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph document {}", path.display()))?;
        let document = Self::from_json(&text)?;
        let loaded = document
            .into_graph()
            .with_context(|| format!("Invalid graph document {}", path.display()))?;

        log::info!(
            "Loaded {} entities from {}",
            loaded.graph.len(),
            path.display()
        );
        Ok(loaded)
    }

    /// Build the graph, checking ids are unique, match the list they appear
    /// in, and that way nodes resolve.
    ///
    /// Relation members may point at entities that are not in the document,
    /// but their declared type has to agree with their id.
    pub fn into_graph(self) -> Result<LoadedDocument, GraphError> {
        let mut seen = HashSet::new();
        let node_ids: HashSet<_> = self.nodes.iter().map(|n| n.id.clone()).collect();

        let ids = self
            .nodes
            .iter()
            .map(|n| &n.id)
            .chain(self.ways.iter().map(|w| &w.id))
            .chain(self.relations.iter().map(|r| &r.id));
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(GraphError::Duplicate(id.clone()));
            }
        }

        let listed = self
            .nodes
            .iter()
            .map(|n| (&n.id, EntityKind::Node))
            .chain(self.ways.iter().map(|w| (&w.id, EntityKind::Way)))
            .chain(self.relations.iter().map(|r| (&r.id, EntityKind::Relation)));
        for (id, expected) in listed {
            check_kind(id, expected)?;
        }
        for member in self.relations.iter().flat_map(|r| &r.members) {
            check_kind(&member.id, member.kind)?;
        }

        for way in &self.ways {
            if let Some(missing) = way.nodes.iter().find(|n| !node_ids.contains(*n)) {
                return Err(GraphError::MissingNode {
                    way: way.id.clone(),
                    node: missing.clone(),
                });
            }
        }

        let coverage = match self.loaded_tiles {
            Some(tiles) => Coverage::Tiles(tiles.into_iter().collect::<TileCoverage>()),
            None => Coverage::All,
        };

        let entities = self
            .nodes
            .into_iter()
            .map(Entity::from)
            .chain(self.ways.into_iter().map(Entity::from))
            .chain(self.relations.into_iter().map(Entity::from));

        Ok(LoadedDocument {
            graph: Graph::from_entities(entities),
            coverage,
        })
    }

    /// Snapshot a graph back into document form, sorted by id
    pub fn from_graph(graph: &Graph) -> Self {
        let mut document = GraphDocument::default();
        for id in graph.entity_ids() {
            match graph.has_entity(&id) {
                Some(Entity::Node(node)) => document.nodes.push(node.clone()),
                Some(Entity::Way(way)) => document.ways.push(way.clone()),
                Some(Entity::Relation(relation)) => document.relations.push(relation.clone()),
                None => {}
            }
        }
        document
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize graph document")
    }
}

fn check_kind(id: &EntityId, expected: EntityKind) -> Result<(), GraphError> {
    if id.kind() == expected {
        Ok(())
    } else {
        Err(GraphError::WrongKind {
            id: id.clone(),
            expected,
        })
    }
}
