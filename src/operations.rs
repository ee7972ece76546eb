//! Operation Capabilities
//!
//! Fixes describe what they want done with a [`FixAction`]; an [`Operations`]
//! implementation decides whether that is currently possible and carries it
//! out. Interactive actions (continue drawing, connect by hand) are handed back
//! to the caller instead of being performed here.

use std::fmt;

use crate::graph::{actions, Entity, EntityId, Graph, GraphError};
use crate::validation::{Fix, FixAction};

/// Why an operation cannot run right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// A referenced entity is gone
    NotFound,
    /// The relation has members that are not loaded
    IncompleteRelation,
    /// The member slot no longer exists
    MemberMissing,
    /// The target does not support the operation (e.g. continuing a closed way)
    NotEligible,
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::IncompleteRelation => write!(f, "incomplete_relation"),
            Self::MemberMissing => write!(f, "member_missing"),
            Self::NotEligible => write!(f, "not_eligible"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    #[error("operation disabled: {0}")]
    Disabled(DisabledReason),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Editing capabilities invoked by fixes
pub trait Operations {
    /// `Some(reason)` when `action` cannot run against `graph`
    fn disabled(&self, graph: &Graph, action: &FixAction) -> Option<DisabledReason>;

    /// Run `action`. Returns `Ok(None)` for interactive actions that the
    /// editor has to carry out itself.
    fn perform(&self, graph: &Graph, action: &FixAction) -> Result<Option<Graph>, OperationError>;
}

/// What happened when a fix was invoked
#[derive(Debug, Clone)]
pub enum FixOutcome {
    /// The graph was edited; issues of the old snapshot are stale
    Applied(Graph),
    /// Needs the editor UI
    Deferred(FixAction),
    /// The operation was disabled at invocation time; nothing changed
    Skipped(DisabledReason),
}

/// Invoke a fix, re-checking that its operation is still enabled
pub fn invoke_fix(
    fix: &Fix,
    graph: &Graph,
    operations: &dyn Operations,
) -> Result<FixOutcome, OperationError> {
    if let Some(reason) = operations.disabled(graph, &fix.action) {
        log::debug!("Skipping fix '{}': {}", fix.title, reason);
        return Ok(FixOutcome::Skipped(reason));
    }

    match operations.perform(graph, &fix.action)? {
        Some(next) => {
            log::info!(
                "Applied fix '{}' (graph version {} -> {})",
                fix.title,
                graph.version(),
                next.version()
            );
            Ok(FixOutcome::Applied(next))
        }
        None => Ok(FixOutcome::Deferred(fix.action.clone())),
    }
}

/// Operations implemented directly on the graph
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOperations;

impl GraphOperations {
    fn delete_disabled(graph: &Graph, ids: &[EntityId]) -> Option<DisabledReason> {
        for id in ids {
            match graph.has_entity(id) {
                None => return Some(DisabledReason::NotFound),
                Some(entity) if entity.kind() != id.kind() => {
                    return Some(DisabledReason::NotEligible);
                }
                Some(Entity::Relation(relation)) => {
                    if relation
                        .members
                        .iter()
                        .any(|m| graph.has_entity(&m.id).is_none())
                    {
                        return Some(DisabledReason::IncompleteRelation);
                    }
                }
                Some(_) => {}
            }
        }
        None
    }

    fn member_disabled(graph: &Graph, relation: &EntityId, index: usize) -> Option<DisabledReason> {
        match graph.has_entity(relation).and_then(Entity::as_relation) {
            None => Some(DisabledReason::NotFound),
            Some(relation) if index >= relation.members.len() => Some(DisabledReason::MemberMissing),
            Some(_) => None,
        }
    }

    fn continue_disabled(graph: &Graph, way: &EntityId, vertex: &EntityId) -> Option<DisabledReason> {
        let Some(way) = graph.has_entity(way).and_then(Entity::as_way) else {
            return Some(DisabledReason::NotFound);
        };
        if graph.has_entity(vertex).is_none() {
            return Some(DisabledReason::NotFound);
        }
        match way.affix(vertex) {
            Some(_) => None,
            None => Some(DisabledReason::NotEligible),
        }
    }
}

impl Operations for GraphOperations {
    fn disabled(&self, graph: &Graph, action: &FixAction) -> Option<DisabledReason> {
        match action {
            FixAction::ContinueDrawing { way, vertex } => Self::continue_disabled(graph, way, vertex),
            FixAction::ConnectFeature => None,
            FixAction::Delete { ids } => Self::delete_disabled(graph, ids),
            FixAction::ChangeMember {
                relation, index, ..
            } => Self::member_disabled(graph, relation, *index),
            FixAction::DeleteMember { relation, index } => {
                Self::member_disabled(graph, relation, *index)
            }
        }
    }

    fn perform(&self, graph: &Graph, action: &FixAction) -> Result<Option<Graph>, OperationError> {
        if let Some(reason) = self.disabled(graph, action) {
            return Err(OperationError::Disabled(reason));
        }

        let next = match action {
            FixAction::ContinueDrawing { .. } | FixAction::ConnectFeature => return Ok(None),
            FixAction::Delete { ids } => {
                let mut next = graph.clone();
                for id in ids {
                    // earlier deletions may cascade into later ids
                    if next.has_entity(id).is_some() {
                        next = actions::delete_entity(&next, id)?;
                    }
                }
                next
            }
            FixAction::ChangeMember {
                relation,
                member,
                index,
            } => actions::change_member(graph, relation, member.clone(), *index)?,
            FixAction::DeleteMember { relation, index } => {
                actions::delete_member(graph, relation, *index)?
            }
        };

        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Loc, Member, Node, Relation, Tags, Way};

    fn graph() -> Graph {
        let node = |n: i64| {
            Entity::Node(Node {
                id: EntityId::node(n),
                loc: Loc::new(0.0, 0.0),
                tags: Tags::new(),
            })
        };
        Graph::from_entities(vec![
            node(1),
            node(2),
            Entity::Way(Way {
                id: EntityId::way(1),
                nodes: vec![EntityId::node(1), EntityId::node(2)],
                tags: Tags::new(),
            }),
            Entity::Relation(Relation {
                id: EntityId::relation(1),
                members: vec![Member::new(EntityId::way(1), "")],
                tags: Tags::new(),
            }),
            Entity::Relation(Relation {
                id: EntityId::relation(2),
                members: vec![Member::new(EntityId::way(7), "outer")],
                tags: Tags::new(),
            }),
        ])
    }

    #[test]
    fn test_delete_disabled_reasons() {
        let graph = graph();
        let ops = GraphOperations;

        let missing = FixAction::Delete {
            ids: vec![EntityId::way(9)],
        };
        assert_eq!(ops.disabled(&graph, &missing), Some(DisabledReason::NotFound));

        let incomplete = FixAction::Delete {
            ids: vec![EntityId::relation(2)],
        };
        assert_eq!(
            ops.disabled(&graph, &incomplete),
            Some(DisabledReason::IncompleteRelation)
        );

        let ok = FixAction::Delete {
            ids: vec![EntityId::way(1)],
        };
        assert_eq!(ops.disabled(&graph, &ok), None);
    }

    #[test]
    fn test_delete_disabled_when_kind_disagrees_with_id() {
        let graph = Graph::from_entities(vec![Entity::Way(Way {
            id: EntityId::node(7),
            nodes: Vec::new(),
            tags: Tags::new(),
        })]);
        let fix = Fix::new(
            "Delete this feature",
            FixAction::Delete {
                ids: vec![EntityId::node(7)],
            },
        );

        assert_eq!(
            GraphOperations.disabled(&graph, &fix.action),
            Some(DisabledReason::NotEligible)
        );
        assert!(matches!(
            invoke_fix(&fix, &graph, &GraphOperations),
            Ok(FixOutcome::Skipped(DisabledReason::NotEligible))
        ));
    }

    #[test]
    fn test_continue_eligibility() {
        let graph = graph();
        let ops = GraphOperations;
        let from_end = FixAction::ContinueDrawing {
            way: EntityId::way(1),
            vertex: EntityId::node(2),
        };
        assert_eq!(ops.disabled(&graph, &from_end), None);
        assert!(ops.perform(&graph, &from_end).unwrap().is_none());

        let unknown = FixAction::ContinueDrawing {
            way: EntityId::way(1),
            vertex: EntityId::node(5),
        };
        assert_eq!(ops.disabled(&graph, &unknown), Some(DisabledReason::NotFound));
    }

    #[test]
    fn test_invoke_fix_skips_when_disabled() {
        let graph = graph();
        let fix = Fix::new(
            "Remove from relation",
            FixAction::DeleteMember {
                relation: EntityId::relation(1),
                index: 4,
            },
        );

        let outcome = invoke_fix(&fix, &graph, &GraphOperations).unwrap();
        assert!(matches!(
            outcome,
            FixOutcome::Skipped(DisabledReason::MemberMissing)
        ));
    }

    #[test]
    fn test_invoke_fix_applies_edit() {
        let graph = graph();
        let fix = Fix::new(
            "Set as outer",
            FixAction::ChangeMember {
                relation: EntityId::relation(1),
                member: Member::new(EntityId::way(1), "outer"),
                index: 0,
            },
        );

        let FixOutcome::Applied(next) = invoke_fix(&fix, &graph, &GraphOperations).unwrap() else {
            panic!("Expected an applied fix");
        };
        assert_eq!(
            next.relation(&EntityId::relation(1)).unwrap().members[0].role,
            "outer"
        );
        // the original snapshot is untouched
        assert_eq!(
            graph.relation(&EntityId::relation(1)).unwrap().members[0].role,
            ""
        );
    }

    #[test]
    fn test_second_invocation_is_a_no_op() {
        let graph = graph();
        let fix = Fix::new(
            "Delete this feature",
            FixAction::Delete {
                ids: vec![EntityId::way(1)],
            },
        );

        let FixOutcome::Applied(next) = invoke_fix(&fix, &graph, &GraphOperations).unwrap() else {
            panic!("Expected an applied fix");
        };
        let again = invoke_fix(&fix, &next, &GraphOperations).unwrap();
        assert!(matches!(again, FixOutcome::Skipped(DisabledReason::NotFound)));
    }
}
