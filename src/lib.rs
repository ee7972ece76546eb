//! Topology Validation
//!
//! Checks an editable map graph for topology problems and proposes fixes.
//!
//! This library provides:
//! - An immutable, versioned graph of nodes, ways and relations
//! - Connectivity and reachability analysis for the road network
//! - Rules for disconnected highways and multipolygon members without a role
//! - Fix actions applied through a pluggable operation layer

pub mod config;
pub mod graph;
pub mod operations;
pub mod tags;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use graph::{Entity, EntityId, Graph, GraphDocument};
pub use operations::{invoke_fix, FixOutcome, GraphOperations, Operations};
pub use tags::TagTable;
pub use validation::{Context, Issue, Severity, ValidationResult, Validator};
