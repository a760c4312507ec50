//! Rule system: the `Rule` trait, rule metadata, and the registry.
//!
//! A rule is instantiated once per file through [`Rule::create`], which hands
//! back a [`RuleVisitor`] holding that file's per-pass caches. The linter then
//! feeds it every call expression in document order.

pub mod diagnostics;
pub mod execute_script;
pub mod suppression;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use execute_script::ExecuteScriptClosure;
pub use suppression::SuppressionChecker;

use mv3lint_core::config::RuleSeverity;
use serde::Serialize;

use crate::ast::{Ast, NodeId};
use crate::scope::ScopeGraph;

/// ESLint-style rule type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Problem,
    Suggestion,
    Layout,
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMeta {
    pub id: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub rule_type: RuleType,
    /// Severity in the recommended configuration.
    pub recommended: RuleSeverity,
}

/// Everything a rule may read while checking one file.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub ast: &'a Ast,
    pub graph: &'a dyn ScopeGraph,
    pub severity: RuleSeverity,
}

/// Trait that every rule must implement.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// Unique identifier for this rule.
    fn id(&self) -> &'static str {
        self.meta().id
    }

    /// Start a pass over one file.
    fn create<'a>(&self, ctx: RuleContext<'a>) -> Box<dyn RuleVisitor + 'a>;
}

/// Per-file rule state, driven by the linter.
pub trait RuleVisitor {
    /// Inspect one call expression. Called in document order.
    fn check_call(&mut self, call: NodeId) -> Vec<Diagnostic>;
}

/// Registered rules, in registration order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::recommended()
    }
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every rule the plugin ships.
    pub fn recommended() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ExecuteScriptClosure::new()));
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_registers_execute_script_rule() {
        let registry = RuleRegistry::recommended();
        assert_eq!(registry.ids(), vec!["mv3/no-execute-script-closure"]);
        let rule = registry.get("mv3/no-execute-script-closure").unwrap();
        assert_eq!(rule.meta().recommended, RuleSeverity::Error);
        assert_eq!(rule.meta().rule_type, RuleType::Problem);
        assert!(registry.get("mv3/unknown").is_none());
    }
}
