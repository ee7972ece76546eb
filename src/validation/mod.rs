//! Validation Engine
//!
//! Topology rules over a graph snapshot, the analyzers they share, and the
//! issue model they report with.

pub mod connectivity;
pub mod context;
pub mod disconnected_way;
pub mod engine;
pub mod issue;
pub mod label;
pub mod missing_role;
pub mod reachability;

pub use context::Context;
pub use disconnected_way::{check_disconnected, DisconnectedWay, DISCONNECTED_WAY};
pub use engine::{Rule, ValidationResult, Validator};
pub use issue::{Fix, FixAction, Issue, IssueData, Severity};
pub use label::display_label;
pub use missing_role::{check_missing_role, MissingRole, MISSING_ROLE};
