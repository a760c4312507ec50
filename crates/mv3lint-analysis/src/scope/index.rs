//! ScopeIndex — memoized scope and name lookups for one analysis pass.

use mv3lint_core::types::collections::FxHashMap;

use super::graph::ScopeGraph;
use super::types::{ScopeId, VariableId};
use crate::ast::{Ast, NodeId};

/// Per-file lookup cache over a [`ScopeGraph`].
///
/// Results are pure functions of the graph, so the caches never need
/// invalidation while the index lives.
pub struct ScopeIndex<'a> {
    ast: &'a Ast,
    graph: &'a dyn ScopeGraph,
    scope_cache: FxHashMap<NodeId, Option<ScopeId>>,
    name_cache: FxHashMap<ScopeId, FxHashMap<String, Option<VariableId>>>,
    identifier_cache: FxHashMap<(NodeId, Option<ScopeId>), Option<VariableId>>,
}

impl<'a> ScopeIndex<'a> {
    pub fn new(ast: &'a Ast, graph: &'a dyn ScopeGraph) -> Self {
        Self {
            ast,
            graph,
            scope_cache: FxHashMap::default(),
            name_cache: FxHashMap::default(),
            identifier_cache: FxHashMap::default(),
        }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn graph(&self) -> &'a dyn ScopeGraph {
        self.graph
    }

    /// Innermost scope of `node`.
    pub fn scope_of(&mut self, node: NodeId) -> Option<ScopeId> {
        let graph = self.graph;
        *self
            .scope_cache
            .entry(node)
            .or_insert_with(|| graph.scope_of(node))
    }

    /// Innermost scope of `node`, or `fallback` when the node has none.
    pub fn scope_for_node(&mut self, node: NodeId, fallback: Option<ScopeId>) -> Option<ScopeId> {
        self.scope_of(node).or(fallback)
    }

    /// Walk outward from `scope` looking for a binding of `name`.
    pub fn resolve_variable(&mut self, scope: Option<ScopeId>, name: &str) -> Option<VariableId> {
        let scope = scope?;
        let graph = self.graph;
        let per_scope = self.name_cache.entry(scope).or_default();
        if let Some(&cached) = per_scope.get(name) {
            return cached;
        }
        let resolved = graph.lookup(scope, name);
        per_scope.insert(name.to_string(), resolved);
        resolved
    }

    /// Resolve an identifier node. The lookup starts at `fallback` when given,
    /// otherwise at the identifier's own scope. Non-identifiers resolve to nothing.
    pub fn resolve_identifier(
        &mut self,
        identifier: NodeId,
        fallback: Option<ScopeId>,
    ) -> Option<VariableId> {
        let ast = self.ast;
        let name = ast.kind(identifier).identifier_name()?;
        let key = (identifier, fallback);
        if let Some(&cached) = self.identifier_cache.get(&key) {
            return cached;
        }
        let scope = match fallback {
            Some(scope) => Some(scope),
            None => self.scope_of(identifier),
        };
        let resolved = self.resolve_variable(scope, name);
        self.identifier_cache.insert(key, resolved);
        resolved
    }

    pub fn is_imported(&self, var: VariableId) -> bool {
        self.graph.variable(var).is_imported()
    }
}
