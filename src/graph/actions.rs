//! Graph Actions
//!
//! Edits that keep the graph tidy: deleting an entity also detaches it from
//! its parents and drops anything left behind that no longer makes sense
//! (empty relations, ways with fewer than two nodes, untagged orphan nodes).
//! Each action returns a new snapshot.

use super::entity::{Entity, EntityId, EntityKind, Member};
use super::error::GraphError;
use super::snapshot::Graph;

/// Delete any entity by id
pub fn delete_entity(graph: &Graph, id: &EntityId) -> Result<Graph, GraphError> {
    match id.kind() {
        EntityKind::Node => delete_node(graph, id),
        EntityKind::Way => delete_way(graph, id),
        EntityKind::Relation => delete_relation(graph, id),
    }
}

pub fn delete_node(graph: &Graph, id: &EntityId) -> Result<Graph, GraphError> {
    graph.node(id)?;
    let mut next = graph.clone();

    let parent_ways: Vec<EntityId> = graph.parent_ways(id).iter().map(|w| w.id.clone()).collect();
    for way_id in parent_ways {
        let mut way = next.way(&way_id)?.clone();
        way.nodes.retain(|n| n != id);
        if way.is_degenerate() {
            next = delete_way(&next, &way_id)?;
        } else {
            next = next.replace(Entity::Way(way));
        }
    }

    next = detach_from_relations(&next, id)?;
    Ok(next.remove(id))
}

pub fn delete_way(graph: &Graph, id: &EntityId) -> Result<Graph, GraphError> {
    let way = graph.way(id)?.clone();
    let mut next = detach_from_relations(graph, id)?.remove(id);

    let mut nodes = way.nodes.clone();
    nodes.sort();
    nodes.dedup();
    for node_id in nodes {
        let orphan = next.has_entity(&node_id).is_some_and(|node| {
            node.tags().is_empty()
                && next.parent_ways(&node_id).is_empty()
                && next.parent_relations(&node_id).is_empty()
        });
        if orphan {
            next = next.remove(&node_id);
        }
    }

    Ok(next)
}

pub fn delete_relation(graph: &Graph, id: &EntityId) -> Result<Graph, GraphError> {
    graph.relation(id)?;
    let next = graph.remove(id);
    detach_from_relations(&next, id)
}

/// Replace the member at `index`
pub fn change_member(
    graph: &Graph,
    relation_id: &EntityId,
    member: Member,
    index: usize,
) -> Result<Graph, GraphError> {
    let mut relation = graph.relation(relation_id)?.clone();
    let slot = relation
        .members
        .get_mut(index)
        .ok_or_else(|| GraphError::NotFound(relation_id.clone()))?;
    *slot = member;
    Ok(graph.replace(Entity::Relation(relation)))
}

/// Remove the member at `index`; a relation left empty is deleted
pub fn delete_member(graph: &Graph, relation_id: &EntityId, index: usize) -> Result<Graph, GraphError> {
    let mut relation = graph.relation(relation_id)?.clone();
    if index >= relation.members.len() {
        return Err(GraphError::NotFound(relation_id.clone()));
    }
    relation.members.remove(index);

    if relation.members.is_empty() {
        delete_relation(graph, relation_id)
    } else {
        Ok(graph.replace(Entity::Relation(relation)))
    }
}

/// Drop every membership of `id`, deleting relations that end up empty
fn detach_from_relations(graph: &Graph, id: &EntityId) -> Result<Graph, GraphError> {
    let parents: Vec<EntityId> = graph
        .parent_relations(id)
        .iter()
        .map(|r| r.id.clone())
        .collect();

    let mut next = graph.clone();
    for relation_id in parents {
        // an earlier cascade may already have removed it
        let Some(relation) = next.has_entity(&relation_id).and_then(Entity::as_relation) else {
            continue;
        };
        let mut relation = relation.clone();
        relation.members.retain(|m| &m.id != id);

        next = if relation.members.is_empty() {
            delete_relation(&next, &relation_id)?
        } else {
            next.replace(Entity::Relation(relation))
        };
    }

    Ok(next)
}
