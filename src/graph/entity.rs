//! Entity Types
//!
//! Nodes, ways and relations, plus the typed identifiers that tie them together.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::error::GraphError;

/// Tag mapping (key -> value)
pub type Tags = BTreeMap<String, String>;

/// The three kinds of entity in a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node,
    Way,
    Relation,
}

impl EntityKind {
    fn prefix(self) -> char {
        match self {
            EntityKind::Node => 'n',
            EntityKind::Way => 'w',
            EntityKind::Relation => 'r',
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Way => write!(f, "way"),
            EntityKind::Relation => write!(f, "relation"),
        }
    }
}

/// Entity identifier such as `n12`, `w-3` or `r7`.
///
/// Negative numbers belong to entities created locally that have not been
/// uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    kind: EntityKind,
    number: i64,
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([nwr])(-?\d+)$").expect("entity id regex must compile"))
}

impl EntityId {
    pub fn new(kind: EntityKind, number: i64) -> Self {
        Self { kind, number }
    }

    pub fn node(number: i64) -> Self {
        Self::new(EntityKind::Node, number)
    }

    pub fn way(number: i64) -> Self {
        Self::new(EntityKind::Way, number)
    }

    pub fn relation(number: i64) -> Self {
        Self::new(EntityKind::Relation, number)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    /// True for entities that only exist locally
    pub fn is_new(&self) -> bool {
        self.number < 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

impl FromStr for EntityId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = id_re()
            .captures(s.trim())
            .ok_or_else(|| GraphError::InvalidId(s.to_string()))?;

        let kind = match &caps[1] {
            "n" => EntityKind::Node,
            "w" => EntityKind::Way,
            _ => EntityKind::Relation,
        };
        let number = caps[2]
            .parse()
            .map_err(|_| GraphError::InvalidId(s.to_string()))?;

        Ok(Self { kind, number })
    }
}

impl TryFrom<String> for EntityId {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// Geographic location in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loc {
    pub lon: f64,
    pub lat: f64,
}

impl Loc {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub loc: Loc,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: EntityId,
    pub nodes: Vec<EntityId>,
    #[serde(default)]
    pub tags: Tags,
}

/// Where a vertex sits on a way, as far as extending the way goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    Prefix,
    Suffix,
}

impl Way {
    pub fn first(&self) -> Option<&EntityId> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&EntityId> {
        self.nodes.last()
    }

    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.first() == self.last()
    }

    /// A way with no nodes was not fully loaded and is never analyzed
    pub fn is_incomplete(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ways with fewer than two distinct nodes cannot be drawn
    pub fn is_degenerate(&self) -> bool {
        let mut distinct: Vec<&EntityId> = self.nodes.iter().collect();
        distinct.sort();
        distinct.dedup();
        distinct.len() < 2
    }

    pub fn contains(&self, node: &EntityId) -> bool {
        self.nodes.contains(node)
    }

    /// Which end of an open way `node` is on
    pub fn affix(&self, node: &EntityId) -> Option<Affix> {
        if self.is_closed() {
            return None;
        }
        if self.first() == Some(node) {
            Some(Affix::Prefix)
        } else if self.last() == Some(node) {
            Some(Affix::Suffix)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn new(id: EntityId, role: impl Into<String>) -> Self {
        Self {
            kind: id.kind(),
            id,
            role: role.into(),
        }
    }

    /// Empty or whitespace-only roles count as missing
    pub fn is_missing_role(&self) -> bool {
        self.role.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: EntityId,
    pub members: Vec<Member>,
    #[serde(default)]
    pub tags: Tags,
}

impl Relation {
    pub fn is_multipolygon(&self) -> bool {
        self.tags.get("type").map(String::as_str) == Some("multipolygon")
    }

    pub fn is_ferry_route(&self) -> bool {
        self.tags.get("type").map(String::as_str) == Some("route")
            && self.tags.get("route").map(String::as_str) == Some("ferry")
    }

    /// Members paired with their position in the member list
    pub fn indexed_members(&self) -> impl Iterator<Item = (usize, &Member)> {
        self.members.iter().enumerate()
    }

    /// First member referencing `id`, with its index
    pub fn member_by_id(&self, id: &EntityId) -> Option<(usize, &Member)> {
        self.indexed_members().find(|(_, member)| &member.id == id)
    }
}

/// A graph entity
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Entity {
    pub fn id(&self) -> &EntityId {
        match self {
            Entity::Node(node) => &node.id,
            Entity::Way(way) => &way.id,
            Entity::Relation(relation) => &relation.id,
        }
    }

    /// Kind of the variant, which a well-formed entity shares with its id
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Node(_) => EntityKind::Node,
            Entity::Way(_) => EntityKind::Way,
            Entity::Relation(_) => EntityKind::Relation,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            Entity::Node(node) => &node.tags,
            Entity::Way(way) => &way.tags,
            Entity::Relation(relation) => &relation.tags,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags().get(key).map(String::as_str)
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entity::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_way(&self) -> Option<&Way> {
        match self {
            Entity::Way(way) => Some(way),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Entity::Relation(relation) => Some(relation),
            _ => None,
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Entity::Node(node)
    }
}

impl From<Way> for Entity {
    fn from(way: Way) -> Self {
        Entity::Way(way)
    }
}

impl From<Relation> for Entity {
    fn from(relation: Relation) -> Self {
        Entity::Relation(relation)
    }
}

/// True when the `entrance` tag marks a usable entrance
pub fn is_entrance(tags: &Tags) -> bool {
    tags.get("entrance").is_some_and(|value| value != "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ids() {
        let id: EntityId = "w-12".parse().unwrap();
        assert_eq!(id.kind(), EntityKind::Way);
        assert_eq!(id.number(), -12);
        assert!(id.is_new());
        assert_eq!(id.to_string(), "w-12");

        let id: EntityId = "r7".parse().unwrap();
        assert_eq!(id.kind(), EntityKind::Relation);
        assert!(!id.is_new());
    }

    #[test]
    fn test_invalid_entity_ids() {
        assert!("x1".parse::<EntityId>().is_err());
        assert!("w".parse::<EntityId>().is_err());
        assert!("n1a".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_way_shape() {
        let open = Way {
            id: EntityId::way(1),
            nodes: vec![EntityId::node(1), EntityId::node(2), EntityId::node(3)],
            tags: Tags::new(),
        };
        assert!(!open.is_closed());
        assert_eq!(open.affix(&EntityId::node(1)), Some(Affix::Prefix));
        assert_eq!(open.affix(&EntityId::node(3)), Some(Affix::Suffix));
        assert_eq!(open.affix(&EntityId::node(2)), None);

        let closed = Way {
            id: EntityId::way(2),
            nodes: vec![EntityId::node(1), EntityId::node(2), EntityId::node(1)],
            tags: Tags::new(),
        };
        assert!(closed.is_closed());
        assert_eq!(closed.affix(&EntityId::node(1)), None);
    }

    #[test]
    fn test_missing_role() {
        assert!(Member::new(EntityId::way(1), "").is_missing_role());
        assert!(Member::new(EntityId::way(1), "  \t").is_missing_role());
        assert!(!Member::new(EntityId::way(1), "outer").is_missing_role());
    }

    #[test]
    fn test_entrance_tag() {
        let mut tags = Tags::new();
        assert!(!is_entrance(&tags));
        tags.insert("entrance".to_string(), "no".to_string());
        assert!(!is_entrance(&tags));
        tags.insert("entrance".to_string(), "main".to_string());
        assert!(is_entrance(&tags));
    }
}
