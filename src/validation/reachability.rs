//! Reachability Search
//!
//! Can a newly drawn road reach the existing network? Depth-first search over
//! ways that share nodes, using an explicit stack so long or cyclic chains of
//! new ways cannot overflow the call stack. Each way is expanded at most once.

use std::collections::HashSet;

use crate::graph::entity::is_entrance;
use crate::graph::{Entity, EntityId, Way};

use super::context::Context;

/// New (not yet uploaded) ways
pub fn is_new_road(id: &EntityId) -> bool {
    id.kind() == crate::graph::EntityKind::Way && id.is_new()
}

/// True if some chain of connected ways starting at `way` leads to an existing
/// routable highway or to an entrance. Ways already in `visited` are not
/// expanded; every way expanded here is added to it.
pub fn is_reachable_from_existing(
    ctx: &Context<'_>,
    way: &Way,
    visited: &mut HashSet<EntityId>,
) -> bool {
    let graph = ctx.graph();
    let tags = ctx.tags();

    visited.insert(way.id.clone());
    let mut stack: Vec<&Way> = vec![way];

    while let Some(current) = stack.pop() {
        for node_id in &current.nodes {
            let Some(vertex) = graph.has_entity(node_id).and_then(Entity::as_node) else {
                continue;
            };
            if is_entrance(&vertex.tags) {
                log::trace!("{} reaches entrance {}", way.id, vertex.id);
                return true;
            }

            for parent in graph.parent_ways(node_id) {
                if visited.contains(&parent.id) {
                    continue;
                }
                if tags.has_routable_highway(&parent.tags) && !is_new_road(&parent.id) {
                    log::trace!("{} reaches existing road {}", way.id, parent.id);
                    return true;
                }
                visited.insert(parent.id.clone());
                stack.push(parent);
            }
        }
    }

    false
}

/// A new routable highway with no path to the existing network
pub fn is_new_road_unreachable(ctx: &Context<'_>, entity: &Entity) -> bool {
    let Entity::Way(way) = entity else {
        return false;
    };
    if !is_new_road(&way.id) || !ctx.tags().has_routable_highway(&way.tags) {
        return false;
    }

    let mut visited = HashSet::new();
    let reachable = is_reachable_from_existing(ctx, way, &mut visited);
    log::debug!(
        "{} {} the existing network ({} ways searched)",
        way.id,
        if reachable { "reaches" } else { "cannot reach" },
        visited.len()
    );
    !reachable
}
