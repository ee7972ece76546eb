//! Disconnected Way Rule
//!
//! Flags routable highways that are cut off from the rest of the network, and
//! new roads that cannot reach it.

use crate::graph::{Entity, EntityId, Way};

use super::connectivity::Connectivity;
use super::context::Context;
use super::engine::Rule;
use super::issue::{Fix, FixAction, Issue};
use super::label::display_label;
use super::reachability::{is_new_road, is_new_road_unreachable};

pub const DISCONNECTED_WAY: &str = "disconnected_way";

const REFERENCE: &str = "issues.disconnected_way.highway.reference";
const REFERENCE_NEW_ROAD: &str = "issues.disconnected_way.highway.reference_new_road";

#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedWay;

impl Rule for DisconnectedWay {
    fn kind(&self) -> &'static str {
        DISCONNECTED_WAY
    }

    fn run(&self, entity: &Entity, ctx: &Context<'_>) -> Vec<Issue> {
        check_disconnected(entity, ctx)
    }
}

/// Issues for `entity` if it is a disconnected or unreachable highway
pub fn check_disconnected(entity: &Entity, ctx: &Context<'_>) -> Vec<Issue> {
    if !ctx.is_tagged_as_highway(entity) {
        return Vec::new();
    }

    let connectivity = Connectivity::new(ctx);
    let flagged = connectivity.is_disconnected_way(entity)
        || connectivity.is_disconnected_multipolygon(entity)
        || is_new_road_unreachable(ctx, entity);
    if !flagged {
        return Vec::new();
    }

    let id = entity.id();
    log::debug!("{} is disconnected", id);

    let mut fixes = match entity {
        Entity::Way(way) if !way.is_closed() => continue_fixes(way, ctx),
        Entity::Way(_) | Entity::Relation(_) | Entity::Node(_) => {
            vec![Fix::new("Connect this feature", FixAction::ConnectFeature)]
        }
    };

    let delete = FixAction::Delete {
        ids: vec![id.clone()],
    };
    if ctx.operations().disabled(ctx.graph(), &delete).is_none() {
        fixes.push(
            Fix::new("Delete this feature", delete)
                .with_icon("operation-delete")
                .with_entity_ids(vec![id.clone()]),
        );
    }

    let label = display_label(entity);
    let (message, reference) = if is_new_road(id) {
        (
            format!("{} is not reachable from the existing road network.", label),
            REFERENCE_NEW_ROAD,
        )
    } else {
        (
            format!("{} is disconnected from other roads and paths.", label),
            REFERENCE,
        )
    };

    vec![Issue::warning(DISCONNECTED_WAY, message)
        .with_reference(reference)
        .with_entity_ids(vec![id.clone()])
        .with_fixes(fixes)
        .at_version(ctx.graph().version())]
}

/// Continue-drawing fixes for both ends of an open way, skipping `noexit=yes` ends
fn continue_fixes(way: &Way, ctx: &Context<'_>) -> Vec<Fix> {
    let ends = [
        (way.first(), "Continue this line from its start", "operation-continue-left"),
        (way.last(), "Continue this line from its end", "operation-continue"),
    ];

    ends.into_iter()
        .filter_map(|(vertex, title, icon)| {
            let vertex = vertex?;
            if is_noexit(ctx, vertex) {
                return None;
            }
            Some(
                Fix::new(
                    title,
                    FixAction::ContinueDrawing {
                        way: way.id.clone(),
                        vertex: vertex.clone(),
                    },
                )
                .with_icon(icon)
                .with_entity_ids(vec![vertex.clone()]),
            )
        })
        .collect()
}

fn is_noexit(ctx: &Context<'_>, vertex: &EntityId) -> bool {
    ctx.has_entity(vertex)
        .is_some_and(|node| node.tag("noexit") == Some("yes"))
}
