//! Validation Context
//!
//! Everything a rule may consult: the graph snapshot, the data-coverage probe,
//! the highway table and the operation capabilities. All of it is borrowed
//! and read-only for the duration of a validation pass.

use crate::graph::{AllLoaded, DataAvailability, Entity, EntityId, Graph, GraphError, Loc};
use crate::operations::{GraphOperations, Operations};
use crate::tags::TagTable;

pub struct Context<'a> {
    graph: &'a Graph,
    tags: &'a TagTable,
    data: &'a dyn DataAvailability,
    operations: &'a dyn Operations,
}

impl<'a> Context<'a> {
    /// Context treating all data as loaded, with graph-backed operations
    pub fn new(graph: &'a Graph, tags: &'a TagTable) -> Self {
        Self {
            graph,
            tags,
            data: &AllLoaded,
            operations: &GraphOperations,
        }
    }

    pub fn with_data(mut self, data: &'a dyn DataAvailability) -> Self {
        self.data = data;
        self
    }

    pub fn with_operations(mut self, operations: &'a dyn Operations) -> Self {
        self.operations = operations;
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn has_entity(&self, id: &EntityId) -> Option<&'a Entity> {
        self.graph.has_entity(id)
    }

    pub fn entity(&self, id: &EntityId) -> Result<&'a Entity, GraphError> {
        self.graph.entity(id)
    }

    pub fn tags(&self) -> &'a TagTable {
        self.tags
    }

    pub fn operations(&self) -> &'a dyn Operations {
        self.operations
    }

    pub fn is_data_loaded(&self, loc: Loc) -> bool {
        self.data.is_data_loaded(loc)
    }

    pub fn is_tagged_as_highway(&self, entity: &Entity) -> bool {
        self.tags.is_tagged_as_highway(entity)
    }
}
