//! Missing Role Rule
//!
//! Multipolygon members need a role. The check runs from both sides: a way
//! reports the memberships it has without a role, and a multipolygon reports
//! its members without one. Both sides produce the same issue id, so callers
//! validating both in one pass can dedupe on it.

use crate::graph::{Entity, Member, Relation};

use super::context::Context;
use super::engine::Rule;
use super::issue::{Fix, FixAction, Issue, IssueData};
use super::label::display_label;

pub const MISSING_ROLE: &str = "missing_role";

const REFERENCE: &str = "issues.missing_role.multipolygon.reference";

#[derive(Debug, Clone, Copy, Default)]
pub struct MissingRole;

impl Rule for MissingRole {
    fn kind(&self) -> &'static str {
        MISSING_ROLE
    }

    fn run(&self, entity: &Entity, ctx: &Context<'_>) -> Vec<Issue> {
        check_missing_role(entity, ctx)
    }
}

pub fn check_missing_role(entity: &Entity, ctx: &Context<'_>) -> Vec<Issue> {
    match entity {
        Entity::Way(way) => ctx
            .graph()
            .parent_relations(&way.id)
            .into_iter()
            .filter(|relation| relation.is_multipolygon())
            .filter_map(|relation| {
                let (index, member) = relation.member_by_id(&way.id)?;
                member
                    .is_missing_role()
                    .then(|| make_issue(entity, relation, member, index, ctx))
            })
            .collect(),
        Entity::Relation(relation) if relation.is_multipolygon() => relation
            .indexed_members()
            .filter(|(_, member)| member.is_missing_role())
            .filter_map(|(index, member)| {
                let target = ctx.has_entity(&member.id)?;
                Some(make_issue(target, relation, member, index, ctx))
            })
            .collect(),
        Entity::Relation(_) | Entity::Node(_) => Vec::new(),
    }
}

fn make_issue(
    target: &Entity,
    relation: &Relation,
    member: &Member,
    index: usize,
    ctx: &Context<'_>,
) -> Issue {
    let message = format!(
        "{} has no role within {}.",
        display_label(target),
        ctx.has_entity(&relation.id)
            .map(display_label)
            .unwrap_or_else(|| relation.id.to_string())
    );

    Issue::warning(MISSING_ROLE, message)
        .with_reference(REFERENCE)
        .with_entity_ids(vec![relation.id.clone(), target.id().clone()])
        .with_data(IssueData::Member {
            member: member.clone(),
            index,
        })
        .with_hash(index.to_string())
        .with_fixes(vec![
            set_role_fix("inner", relation, member, index),
            set_role_fix("outer", relation, member, index),
            Fix::new(
                "Remove from relation",
                FixAction::DeleteMember {
                    relation: relation.id.clone(),
                    index,
                },
            )
            .with_icon("operation-delete"),
        ])
        .at_version(ctx.graph().version())
}

fn set_role_fix(role: &str, relation: &Relation, member: &Member, index: usize) -> Fix {
    Fix::new(
        format!("Set as {}", role),
        FixAction::ChangeMember {
            relation: relation.id.clone(),
            member: Member {
                id: member.id.clone(),
                kind: member.kind,
                role: role.to_string(),
            },
            index,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntityId, Graph, Loc, Node, Tags, Way};
    use crate::tags::TagTable;

    fn graph(role: &str, relation_type: &str) -> Graph {
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
            node(3),
            Entity::Way(Way {
                id: EntityId::way(2),
                nodes: vec![EntityId::node(1), EntityId::node(2), EntityId::node(3), EntityId::node(1)],
                tags: Tags::new(),
            }),
            Entity::Relation(Relation {
                id: EntityId::relation(1),
                members: vec![
                    Member::new(EntityId::way(40), "outer"),
                    Member::new(EntityId::way(2), role),
                    Member::new(EntityId::way(41), ""),
                ],
                tags: Tags::from([("type".to_string(), relation_type.to_string())]),
            }),
        ])
    }

    fn run(graph: &Graph, id: EntityId) -> Vec<Issue> {
        let table = TagTable::embedded();
        let ctx = Context::new(graph, &table);
        check_missing_role(graph.has_entity(&id).unwrap(), &ctx)
    }

    #[test]
    fn test_symmetric_findings() {
        let graph = graph("", "multipolygon");
        let from_way = run(&graph, EntityId::way(2));
        let from_relation = run(&graph, EntityId::relation(1));

        assert_eq!(from_way.len(), 1);
        // w41 is not loaded and is skipped
        assert_eq!(from_relation.len(), 1);
        assert_eq!(from_way, from_relation);

        let issue = &from_way[0];
        assert_eq!(issue.entity_ids, vec![EntityId::relation(1), EntityId::way(2)]);
        assert_eq!(issue.hash.as_deref(), Some("1"));
        assert_eq!(
            issue.data,
            Some(IssueData::Member {
                member: Member::new(EntityId::way(2), ""),
                index: 1
            })
        );
    }

    #[test]
    fn test_fixes() {
        let graph = graph("  ", "multipolygon");
        let issues = run(&graph, EntityId::relation(1));
        let fixes = &issues[0].fixes;

        assert_eq!(fixes.len(), 3);
        assert_eq!(
            fixes[0].action,
            FixAction::ChangeMember {
                relation: EntityId::relation(1),
                member: Member::new(EntityId::way(2), "inner"),
                index: 1
            }
        );
        assert_eq!(fixes[1].title, "Set as outer");
        assert_eq!(
            fixes[2].action,
            FixAction::DeleteMember {
                relation: EntityId::relation(1),
                index: 1
            }
        );
    }

    #[test]
    fn test_role_present_or_not_multipolygon() {
        assert!(run(&graph("inner", "multipolygon"), EntityId::way(2)).is_empty());
        assert!(run(&graph("", "route"), EntityId::way(2)).is_empty());
        assert!(run(&graph("", "route"), EntityId::relation(1)).is_empty());
    }
}
