//! ScopeGraph trait: the read-only view analyses consume.

use super::types::{Reference, ReferenceId, Scope, ScopeId, Variable, VariableId};
use crate::ast::NodeId;

/// Read access to a built scope graph.
pub trait ScopeGraph: Send + Sync {
    fn global_scope(&self) -> ScopeId;

    /// Innermost scope enclosing `node`.
    fn scope_of(&self, node: NodeId) -> Option<ScopeId>;

    /// Scope introduced by `node` itself, if any.
    fn acquire(&self, node: NodeId) -> Option<ScopeId>;

    fn scope(&self, id: ScopeId) -> &Scope;

    fn variable(&self, id: VariableId) -> &Variable;

    fn reference(&self, id: ReferenceId) -> &Reference;

    /// Variable named `name` declared directly in `scope`.
    fn own_variable(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.scope(scope).set.get(name).copied()
    }

    fn upper(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).upper
    }

    /// Resolve `name` from `scope` outward, innermost first.
    fn lookup(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(var) = self.own_variable(id, name) {
                return Some(var);
            }
            current = self.upper(id);
        }
        None
    }
}
