//! Graph Errors

use super::entity::EntityId;

/// Errors raised by graph lookups and document loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// The id is absent from the snapshot
    #[error("entity {0} not found")]
    NotFound(EntityId),

    /// The string is not a valid entity id
    #[error("invalid entity id '{0}'")]
    InvalidId(String),

    /// The entity exists but has another kind than expected
    #[error("entity {id} is not a {expected}")]
    WrongKind {
        id: EntityId,
        expected: super::entity::EntityKind,
    },

    /// The same id appears twice in a document
    #[error("duplicate entity {0}")]
    Duplicate(EntityId),

    /// A way references a node that is not in the document
    #[error("way {way} references missing node {node}")]
    MissingNode { way: EntityId, node: EntityId },
}
