//! Validation Engine
//!
//! Rule registry and the passes that run rules over entities.

use std::collections::{BTreeSet, HashSet};

use crate::graph::EntityId;

use super::context::Context;
use super::disconnected_way::DisconnectedWay;
use super::issue::{Issue, Severity};
use super::missing_role::MissingRole;

/// A validation rule.
///
/// Rules are pure functions of the entity and the graph snapshot. They keep no
/// state between calls and never fail: anything they cannot judge yields no
/// issue.
pub trait Rule {
    /// Stable identifier, used as the issue type and for enabling rules
    fn kind(&self) -> &'static str;

    fn run(&self, entity: &crate::graph::Entity, ctx: &Context<'_>) -> Vec<Issue>;
}

/// Result of validating one or more entities
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub issues: Vec<Issue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Drop issues whose id was already seen, keeping the first
    pub fn dedupe(&mut self) {
        let mut seen = HashSet::new();
        self.issues.retain(|issue| seen.insert(issue.id()));
    }

    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Issues of one rule
    pub fn of_kind<'r>(&'r self, kind: &'r str) -> impl Iterator<Item = &'r Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// Registered rules and which of them are enabled
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
    disabled: BTreeSet<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl Validator {
    /// A validator with no rules
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled: BTreeSet::new(),
        }
    }

    /// A validator with every built-in rule registered
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.register(Box::new(DisconnectedWay));
        validator.register(Box::new(MissingRole));
        validator
    }

    /// Add a rule; a rule with the same kind is replaced
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.retain(|r| r.kind() != rule.kind());
        self.rules.push(rule);
    }

    pub fn rule_kinds(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.kind()).collect()
    }

    /// Disable a rule. Returns false if no such rule is registered.
    pub fn disable(&mut self, kind: &str) -> bool {
        if !self.rules.iter().any(|r| r.kind() == kind) {
            return false;
        }
        self.disabled.insert(kind.to_string());
        true
    }

    pub fn enable(&mut self, kind: &str) {
        self.disabled.remove(kind);
    }

    pub fn is_enabled(&self, kind: &str) -> bool {
        self.rules.iter().any(|r| r.kind() == kind) && !self.disabled.contains(kind)
    }

    fn enabled_rules(&self) -> impl Iterator<Item = &Box<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| !self.disabled.contains(r.kind()))
    }

    /// Run every enabled rule on one entity. Unknown ids yield no issues.
    pub fn validate_entity(&self, id: &EntityId, ctx: &Context<'_>) -> ValidationResult {
        let mut result = ValidationResult::new();

        let Some(entity) = ctx.has_entity(id) else {
            log::debug!("Skipping {}: not in graph version {}", id, ctx.graph().version());
            return result;
        };

        for rule in self.enabled_rules() {
            let issues = rule.run(entity, ctx);
            if !issues.is_empty() {
                log::debug!("{}: {} issue(s) from {}", id, issues.len(), rule.kind());
            }
            result.extend(issues);
        }

        result
    }

    /// Validate several entities; issues found from more than one of them are
    /// reported once
    pub fn validate_entities<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i EntityId>,
        ctx: &Context<'_>,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        for id in ids {
            result.extend(self.validate_entity(id, ctx).issues);
        }
        result.dedupe();
        result
    }

    /// Validate every entity in the graph, in id order
    pub fn validate_graph(&self, ctx: &Context<'_>) -> ValidationResult {
        let ids = ctx.graph().entity_ids();
        let result = self.validate_entities(&ids, ctx);
        log::info!(
            "Validated {} entities: {} issue(s)",
            ids.len(),
            result.len()
        );
        result
    }
}
