//! Issues and Fixes
//!
//! The result type shared by every rule. Issues and fixes only ever hold
//! entity ids, never entities, so they stay meaningful descriptions after the
//! graph changes. They are stale once it does, and must be re-derived.

use serde::Serialize;
use std::fmt;

use crate::graph::{EntityId, Member};

/// Severity of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What a fix does, interpreted by the operation layer when invoked
#[derive(Debug, Clone, PartialEq)]
pub enum FixAction {
    /// Resume drawing `way` from its endpoint `vertex`
    ContinueDrawing { way: EntityId, vertex: EntityId },
    /// Let the user connect the feature by hand
    ConnectFeature,
    Delete { ids: Vec<EntityId> },
    /// Replace the member at `index` of `relation`
    ChangeMember {
        relation: EntityId,
        member: Member,
        index: usize,
    },
    /// Remove the member at `index` of `relation`
    DeleteMember { relation: EntityId, index: usize },
}

impl FixAction {
    /// Actions that only the editor UI can carry out
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            FixAction::ContinueDrawing { .. } | FixAction::ConnectFeature
        )
    }
}

/// A repair offered for an issue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_ids: Option<Vec<EntityId>>,
    #[serde(skip)]
    pub action: FixAction,
}

impl Fix {
    pub fn new(title: impl Into<String>, action: FixAction) -> Self {
        Self {
            title: title.into(),
            icon: None,
            entity_ids: None,
            action,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_entity_ids(mut self, ids: Vec<EntityId>) -> Self {
        self.entity_ids = Some(ids);
        self
    }
}

/// Extra data a rule attaches for its fixes and for callers
#[derive(Debug, Clone, PartialEq)]
pub enum IssueData {
    /// The relation member an issue is about, with its position
    Member { member: Member, index: usize },
}

/// A problem found by a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    /// Key of the longer explanation shown next to the issue
    #[serde(skip)]
    pub reference: Option<String>,
    pub entity_ids: Vec<EntityId>,
    #[serde(skip)]
    pub data: Option<IssueData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub fixes: Vec<Fix>,
    /// Version of the graph the issue was computed against
    #[serde(skip)]
    pub graph_version: u64,
}

impl Issue {
    pub fn new(kind: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            message: message.into(),
            reference: None,
            entity_ids: Vec::new(),
            data: None,
            hash: None,
            fixes: Vec::new(),
            graph_version: 0,
        }
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_entity_ids(mut self, ids: Vec<EntityId>) -> Self {
        self.entity_ids = ids;
        self
    }

    pub fn with_data(mut self, data: IssueData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_fixes(mut self, fixes: Vec<Fix>) -> Self {
        self.fixes = fixes;
        self
    }

    pub fn at_version(mut self, version: u64) -> Self {
        self.graph_version = version;
        self
    }

    /// Stable identity used to dedupe issues across runs and entities
    pub fn id(&self) -> String {
        let ids: Vec<String> = self.entity_ids.iter().map(ToString::to_string).collect();
        format!(
            "{}-{}-{}",
            self.kind,
            self.hash.as_deref().unwrap_or(""),
            ids.join(",")
        )
    }

    /// True if the issue was computed against a different snapshot
    pub fn is_stale(&self, graph_version: u64) -> bool {
        self.graph_version != graph_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_wire_shape() {
        let issue = Issue::warning("disconnected_way", "Road is disconnected")
            .with_reference("issues.disconnected_way.highway.reference")
            .with_entity_ids(vec![EntityId::way(1)])
            .with_fixes(vec![
                Fix::new("Connect this feature", FixAction::ConnectFeature),
                Fix::new(
                    "Delete this feature",
                    FixAction::Delete {
                        ids: vec![EntityId::way(1)],
                    },
                )
                .with_icon("operation-delete")
                .with_entity_ids(vec![EntityId::way(1)]),
            ]);

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "disconnected_way",
                "severity": "warning",
                "message": "Road is disconnected",
                "entityIds": ["w1"],
                "fixes": [
                    { "title": "Connect this feature" },
                    { "title": "Delete this feature", "icon": "operation-delete", "entityIds": ["w1"] }
                ]
            })
        );
    }

    #[test]
    fn test_issue_id_includes_hash() {
        let issue = Issue::warning("missing_role", "x")
            .with_entity_ids(vec![EntityId::relation(1), EntityId::way(2)])
            .with_hash("0");
        assert_eq!(issue.id(), "missing_role-0-r1,w2");
    }

    #[test]
    fn test_staleness() {
        let issue = Issue::warning("missing_role", "x").at_version(3);
        assert!(!issue.is_stale(3));
        assert!(issue.is_stale(4));
    }
}
