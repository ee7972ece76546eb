//! Versioned Entity Graph
//!
//! A `Graph` is an immutable snapshot. Edits go through [`Graph::replace`] and
//! [`Graph::remove`], which return a new snapshot with a higher version and
//! leave the original untouched. Storage is shared between snapshots through
//! `Arc`, so cloning a graph is cheap.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::entity::{Entity, EntityId, EntityKind, Node, Relation, Way};
use super::error::GraphError;

type ParentIndex = HashMap<EntityId, BTreeSet<EntityId>>;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    version: u64,
    entities: Arc<HashMap<EntityId, Arc<Entity>>>,
    /// node -> ways listing it
    parent_ways: Arc<ParentIndex>,
    /// entity -> relations listing it as a member
    parent_relations: Arc<ParentIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a set of entities. Later duplicates win.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut map = HashMap::new();
        let mut parent_ways = ParentIndex::new();
        let mut parent_relations = ParentIndex::new();

        for entity in entities {
            let id = entity.id().clone();
            if let Some(old) = map.insert(id, Arc::new(entity.clone())) {
                unindex(&old, &mut parent_ways, &mut parent_relations);
            }
            index(&entity, &mut parent_ways, &mut parent_relations);
        }

        Self {
            version: 0,
            entities: Arc::new(map),
            parent_ways: Arc::new(parent_ways),
            parent_relations: Arc::new(parent_relations),
        }
    }

    /// Snapshot version, bumped by every edit
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Tolerant lookup: `None` when the entity is absent
    pub fn has_entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id).map(Arc::as_ref)
    }

    /// Strict lookup
    pub fn entity(&self, id: &EntityId) -> Result<&Entity, GraphError> {
        self.has_entity(id)
            .ok_or_else(|| GraphError::NotFound(id.clone()))
    }

    pub fn node(&self, id: &EntityId) -> Result<&Node, GraphError> {
        self.entity(id)?.as_node().ok_or(GraphError::WrongKind {
            id: id.clone(),
            expected: EntityKind::Node,
        })
    }

    pub fn way(&self, id: &EntityId) -> Result<&Way, GraphError> {
        self.entity(id)?.as_way().ok_or(GraphError::WrongKind {
            id: id.clone(),
            expected: EntityKind::Way,
        })
    }

    pub fn relation(&self, id: &EntityId) -> Result<&Relation, GraphError> {
        self.entity(id)?.as_relation().ok_or(GraphError::WrongKind {
            id: id.clone(),
            expected: EntityKind::Relation,
        })
    }

    /// All entities, in no particular order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().map(Arc::as_ref)
    }

    /// All entity ids, sorted
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ways that list `node` among their nodes, ordered by id
    pub fn parent_ways(&self, node: &EntityId) -> Vec<&Way> {
        self.parent_ways
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.has_entity(id).and_then(Entity::as_way))
            .collect()
    }

    /// Relations that list `id` as a member, ordered by id
    pub fn parent_relations(&self, id: &EntityId) -> Vec<&Relation> {
        self.parent_relations
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.has_entity(id).and_then(Entity::as_relation))
            .collect()
    }

    /// The way's nodes in order. Ids missing from the snapshot are skipped.
    pub fn child_nodes(&self, way: &Way) -> Vec<&Node> {
        way.nodes
            .iter()
            .filter_map(|id| self.has_entity(id).and_then(Entity::as_node))
            .collect()
    }

    /// New snapshot with `entity` inserted or replacing the entity with its id
    pub fn replace(&self, entity: Entity) -> Graph {
        let mut next = self.bumped();
        let entities = Arc::make_mut(&mut next.entities);
        let parent_ways = Arc::make_mut(&mut next.parent_ways);
        let parent_relations = Arc::make_mut(&mut next.parent_relations);

        if let Some(old) = entities.get(entity.id()) {
            unindex(old, parent_ways, parent_relations);
        }
        index(&entity, parent_ways, parent_relations);
        entities.insert(entity.id().clone(), Arc::new(entity));

        next
    }

    /// New snapshot without `id`.
    ///
    /// Only the entity's own references are dropped from the parent indices;
    /// entities that still list it keep doing so, the same as for members
    /// that were never downloaded.
    pub fn remove(&self, id: &EntityId) -> Graph {
        let mut next = self.bumped();
        let entities = Arc::make_mut(&mut next.entities);

        if let Some(old) = entities.remove(id) {
            unindex(
                &old,
                Arc::make_mut(&mut next.parent_ways),
                Arc::make_mut(&mut next.parent_relations),
            );
        }

        next
    }

    fn bumped(&self) -> Graph {
        Graph {
            version: self.version + 1,
            ..self.clone()
        }
    }
}

fn index(entity: &Entity, parent_ways: &mut ParentIndex, parent_relations: &mut ParentIndex) {
    match entity {
        Entity::Node(_) => {}
        Entity::Way(way) => {
            for node in &way.nodes {
                parent_ways
                    .entry(node.clone())
                    .or_default()
                    .insert(way.id.clone());
            }
        }
        Entity::Relation(relation) => {
            for member in &relation.members {
                parent_relations
                    .entry(member.id.clone())
                    .or_default()
                    .insert(relation.id.clone());
            }
        }
    }
}

fn unindex(entity: &Entity, parent_ways: &mut ParentIndex, parent_relations: &mut ParentIndex) {
    match entity {
        Entity::Node(_) => {}
        Entity::Way(way) => {
            for node in &way.nodes {
                detach(parent_ways, node, &way.id);
            }
        }
        Entity::Relation(relation) => {
            for member in &relation.members {
                detach(parent_relations, &member.id, &relation.id);
            }
        }
    }
}

fn detach(index: &mut ParentIndex, child: &EntityId, parent: &EntityId) {
    if let Some(parents) = index.get_mut(child) {
        parents.remove(parent);
        if parents.is_empty() {
            index.remove(child);
        }
    }
}
