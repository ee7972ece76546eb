//! Entity Graph
//!
//! Nodes, ways and relations held in immutable, versioned snapshots with
//! parent lookups, plus loading from JSON documents and data coverage.

pub mod actions;
pub mod coverage;
pub mod document;
pub mod entity;
pub mod error;
pub mod snapshot;

pub use coverage::{AllLoaded, Coverage, DataAvailability, Tile, TileCoverage};
pub use document::{GraphDocument, LoadedDocument};
pub use entity::{Affix, Entity, EntityId, EntityKind, Loc, Member, Node, Relation, Tags, Way};
pub use error::GraphError;
pub use snapshot::Graph;
