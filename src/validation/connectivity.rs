//! Connectivity Predicates
//!
//! Answers whether a way, or every way of a multipolygon, is cut off from the
//! routable network. A vertex is connected when another way through it is a
//! routable highway, a ferry route, or a member of a ferry-route relation or a
//! highway multipolygon. Vertices outside the loaded data are always treated
//! as connected.

use crate::graph::entity::is_entrance;
use crate::graph::{Entity, EntityId, Node, Relation, Way};

use super::context::Context;

pub struct Connectivity<'c, 'a> {
    ctx: &'c Context<'a>,
}

impl<'c, 'a> Connectivity<'c, 'a> {
    pub fn new(ctx: &'c Context<'a>) -> Self {
        Self { ctx }
    }

    /// Whether `vertex` of `way` has no link to routable space.
    ///
    /// Checks run in a fixed order: coverage, then the dead-end test, then the
    /// entrance exception. A vertex used by one way only is disconnected even
    /// when it is an entrance.
    pub fn vertex_is_disconnected(
        &self,
        way: &Way,
        vertex: &Node,
        ignore_relation: Option<&EntityId>,
    ) -> bool {
        if !self.ctx.is_data_loaded(vertex.loc) {
            log::trace!("{} is outside the loaded data", vertex.id);
            return false;
        }

        let graph = self.ctx.graph();
        let parents = graph.parent_ways(&vertex.id);

        if parents.len() == 1 {
            return true;
        }

        if is_entrance(&vertex.tags) {
            return false;
        }

        !parents
            .iter()
            .filter(|parent| parent.id != way.id)
            .any(|parent| self.is_connector(parent, ignore_relation))
    }

    fn is_connector(&self, parent: &Way, ignore_relation: Option<&EntityId>) -> bool {
        if parent.tags.get("route").map(String::as_str) == Some("ferry") {
            return true;
        }
        if self.ctx.tags().has_routable_highway(&parent.tags) {
            return true;
        }

        self.ctx
            .graph()
            .parent_relations(&parent.id)
            .into_iter()
            .filter(|relation| Some(&relation.id) != ignore_relation)
            .any(|relation| self.is_connecting_relation(relation))
    }

    fn is_connecting_relation(&self, relation: &Relation) -> bool {
        if relation.is_ferry_route() {
            return true;
        }
        relation.is_multipolygon() && self.ctx.tags().has_routable_highway(&relation.tags)
    }

    /// Every vertex of `way` is disconnected. Ways with no resolvable
    /// vertex are skipped.
    pub fn is_way_fully_disconnected(&self, way: &Way, ignore_relation: Option<&EntityId>) -> bool {
        if way.is_incomplete() {
            return false;
        }
        let vertices = self.ctx.graph().child_nodes(way);
        if vertices.is_empty() {
            log::trace!("{} has no loaded vertices", way.id);
            return false;
        }
        vertices
            .into_iter()
            .all(|vertex| self.vertex_is_disconnected(way, vertex, ignore_relation))
    }

    pub fn is_disconnected_way(&self, entity: &Entity) -> bool {
        match entity {
            Entity::Way(way) => self.is_way_fully_disconnected(way, None),
            Entity::Node(_) | Entity::Relation(_) => false,
        }
    }

    /// Every way member of a multipolygon is disconnected, not counting the
    /// multipolygon itself as a connector.
    ///
    /// Loaded members that are not ways count as disconnected. Members missing
    /// from the graph, and member ways with no loaded vertex, are skipped. A
    /// multipolygon with nothing left to judge is not flagged.
    pub fn is_disconnected_multipolygon(&self, entity: &Entity) -> bool {
        let relation = match entity {
            Entity::Relation(relation) if relation.is_multipolygon() => relation,
            _ => return false,
        };

        let mut judged = false;
        for member in &relation.members {
            let Some(target) = self.ctx.has_entity(&member.id) else {
                continue;
            };
            let Entity::Way(way) = target else {
                judged = true;
                continue;
            };
            if way.is_incomplete() || self.ctx.graph().child_nodes(way).is_empty() {
                continue;
            }
            judged = true;
            if !self.is_way_fully_disconnected(way, Some(&relation.id)) {
                return false;
            }
        }

        judged
    }
}
