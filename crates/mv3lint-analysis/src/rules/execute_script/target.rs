//! Alias and target resolution: does an expression denote
//! `chrome.scripting.executeScript` (or `browser.scripting.executeScript`)?
//!
//! Resolution runs as an explicit depth-first worklist of goals. Each goal asks
//! one predicate of one node:
//!
//! - `Host`: the `chrome` / `browser` namespace, or an alias of it.
//! - `Scripting`: `<host>.scripting`, an alias of it, or `const { scripting } = <host>`.
//! - `Container`: an object literal whose `executeScript` property is an execute
//!   reference, or an alias of such an object.
//! - `ExecuteRef`: `<scripting>.executeScript`, `<container>.executeScript`,
//!   `<execute ref>.bind(...)`, or a variable bound to any of these.
//!
//! A goal matches when any of the goals it expands into matches. Variables are
//! expanded at most once per predicate and search, which bounds the work and
//! breaks alias cycles.

use std::borrow::Cow;

use mv3lint_core::types::collections::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::ast::accessor::{member_property_name, property_key_name, unwrap_chain};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::scope::types::{Definition, DefinitionKind, VariableId};
use crate::scope::{ScopeId, ScopeIndex};

/// Namespaces that expose the `scripting` API.
pub const HOST_NAMESPACES: &[&str] = &["chrome", "browser"];

/// Objects `Reflect` may be read from.
const REFLECT_HOLDERS: &[&str] = &["globalThis", "window", "self"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Predicate {
    Host,
    Scripting,
    Container,
    ExecuteRef,
}

#[derive(Debug, Clone, Copy)]
struct Goal {
    predicate: Predicate,
    node: NodeId,
    scope: Option<ScopeId>,
    parent: Option<usize>,
    /// Variable this goal expanded, once it has been resolved.
    variable: Option<VariableId>,
}

/// State of one resolution call.
struct Search {
    goals: Vec<Goal>,
    stack: Vec<usize>,
    visited: FxHashSet<(Predicate, VariableId)>,
    /// Execute-reference variables expanded during this search.
    expanded_refs: Vec<VariableId>,
}

impl Search {
    fn new(predicate: Predicate, node: NodeId, scope: Option<ScopeId>) -> Self {
        let mut search = Self {
            goals: Vec::new(),
            stack: Vec::new(),
            visited: FxHashSet::default(),
            expanded_refs: Vec::new(),
        };
        search.push(predicate, node, scope, None);
        search
    }

    fn push(
        &mut self,
        predicate: Predicate,
        node: NodeId,
        scope: Option<ScopeId>,
        parent: Option<usize>,
    ) {
        let id = self.goals.len();
        self.goals.push(Goal {
            predicate,
            node,
            scope,
            parent,
            variable: None,
        });
        self.stack.push(id);
    }

    /// Mark `var` as expanded for `predicate`. Returns false on a revisit.
    fn mark(&mut self, predicate: Predicate, var: VariableId) -> bool {
        self.visited.insert((predicate, var))
    }

    /// Execute-reference variables along the chain of goals ending at `goal`.
    fn execute_path(&self, mut goal: usize) -> Vec<VariableId> {
        let mut path = Vec::new();
        loop {
            let g = &self.goals[goal];
            if g.predicate == Predicate::ExecuteRef {
                path.extend(g.variable);
            }
            match g.parent {
                Some(parent) => goal = parent,
                None => return path,
            }
        }
    }
}

/// The binding a destructuring declarator gives a local name.
struct PatternBinding<'a> {
    key: Option<Cow<'a, str>>,
    init: Option<NodeId>,
}

/// Resolves call targets for one file pass. Owns the cross-call cache of
/// execute-reference verdicts keyed by variable.
#[derive(Default)]
pub struct TargetResolver {
    ref_cache: FxHashMap<VariableId, bool>,
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `node` denotes the `executeScript` function.
    pub fn is_execute_reference(
        &mut self,
        index: &mut ScopeIndex<'_>,
        node: NodeId,
        scope: Option<ScopeId>,
    ) -> bool {
        let mut search = Search::new(Predicate::ExecuteRef, node, scope);
        let mut matched = None;
        while let Some(goal) = search.stack.pop() {
            if self.expand(index, &mut search, goal) {
                matched = Some(goal);
                break;
            }
        }

        match matched {
            Some(goal) => {
                for var in search.execute_path(goal) {
                    self.ref_cache.insert(var, true);
                }
                true
            }
            None => {
                for var in search.expanded_refs {
                    self.ref_cache.insert(var, false);
                }
                false
            }
        }
    }

    /// Number of cached execute-reference verdicts.
    pub fn cached(&self) -> usize {
        self.ref_cache.len()
    }

    /// Expand one goal. Returns true when the goal matches outright.
    fn expand(&mut self, index: &mut ScopeIndex<'_>, search: &mut Search, id: usize) -> bool {
        let ast = index.ast();
        let goal = search.goals[id];
        let node = unwrap_chain(ast, goal.node);
        trace!(predicate = ?goal.predicate, node = ast.kind(node).name(), "expand goal");

        match (goal.predicate, ast.kind(node)) {
            (Predicate::Host, NodeKind::Identifier { name })
                if HOST_NAMESPACES.contains(&name.as_str()) =>
            {
                true
            }
            (Predicate::Scripting, NodeKind::MemberExpression { object, .. }) => {
                if member_property_name(ast, node).as_deref() == Some("scripting") {
                    let scope = index.scope_for_node(*object, goal.scope);
                    search.push(Predicate::Host, *object, scope, Some(id));
                }
                false
            }
            (Predicate::Container, NodeKind::ObjectExpression { properties }) => {
                for &prop in properties.iter().rev() {
                    let NodeKind::Property {
                        value, computed, ..
                    } = ast.kind(prop)
                    else {
                        continue;
                    };
                    if !computed && property_key_name(ast, prop).as_deref() == Some("executeScript")
                    {
                        search.push(Predicate::ExecuteRef, *value, goal.scope, Some(id));
                    }
                }
                false
            }
            (Predicate::ExecuteRef, NodeKind::MemberExpression { object, .. }) => {
                if member_property_name(ast, node).as_deref() == Some("executeScript") {
                    let scope = index.scope_for_node(*object, goal.scope);
                    search.push(Predicate::Container, *object, scope, Some(id));
                    search.push(Predicate::Scripting, *object, scope, Some(id));
                }
                false
            }
            (Predicate::ExecuteRef, NodeKind::CallExpression { callee, .. }) => {
                let callee = unwrap_chain(ast, *callee);
                if let NodeKind::MemberExpression { object, .. } = ast.kind(callee) {
                    if member_property_name(ast, callee).as_deref() == Some("bind") {
                        search.push(Predicate::ExecuteRef, *object, goal.scope, Some(id));
                    }
                }
                false
            }
            (_, NodeKind::Identifier { .. }) => self.expand_identifier(index, search, id, node),
            _ => false,
        }
    }

    fn expand_identifier(
        &mut self,
        index: &mut ScopeIndex<'_>,
        search: &mut Search,
        id: usize,
        identifier: NodeId,
    ) -> bool {
        let ast = index.ast();
        let graph = index.graph();
        let goal = search.goals[id];
        let Some(var) = index.resolve_identifier(identifier, goal.scope) else {
            return false;
        };

        if goal.predicate == Predicate::ExecuteRef {
            if let Some(&cached) = self.ref_cache.get(&var) {
                trace!(var = var.index(), cached, "execute reference cache hit");
                return cached;
            }
        }
        if index.is_imported(var) || !search.mark(goal.predicate, var) {
            return false;
        }
        search.goals[id].variable = Some(var);
        if goal.predicate == Predicate::ExecuteRef {
            search.expanded_refs.push(var);
        }

        let variable = graph.variable(var);
        let defs: Vec<Definition> = variable
            .defs
            .iter()
            .filter(|d| d.kind == DefinitionKind::Variable)
            .copied()
            .collect();

        // Later pushes are explored first, so walk definitions in reverse.
        for def in defs.iter().rev() {
            let NodeKind::VariableDeclarator { id: target, init, .. } = ast.kind(def.node) else {
                continue;
            };

            if let Some(binding) = pattern_binding(ast, def.node, &variable.name) {
                if let Some(source) = binding.init {
                    let scope = index.scope_for_node(source, goal.scope);
                    match (goal.predicate, binding.key.as_deref()) {
                        (Predicate::Scripting, Some("scripting")) => {
                            search.push(Predicate::Host, source, scope, Some(id));
                        }
                        (Predicate::ExecuteRef, Some("executeScript")) => {
                            search.push(Predicate::Container, source, scope, Some(id));
                            search.push(Predicate::Scripting, source, scope, Some(id));
                        }
                        _ => {}
                    }
                }
            }

            let (NodeKind::Identifier { .. }, Some(init)) = (ast.kind(*target), *init) else {
                continue;
            };
            let scope = index.scope_for_node(init, goal.scope);
            match goal.predicate {
                Predicate::ExecuteRef => {
                    search.push(Predicate::Container, init, scope, Some(id));
                    search.push(Predicate::ExecuteRef, init, scope, Some(id));
                }
                predicate => search.push(predicate, init, scope, Some(id)),
            }
        }
        false
    }
}

/// For `const { key: name = fallback } = init`, the key and initializer that bind `name`.
fn pattern_binding<'a>(ast: &'a Ast, declarator: NodeId, name: &str) -> Option<PatternBinding<'a>> {
    let NodeKind::VariableDeclarator { id, init, .. } = ast.kind(declarator) else {
        return None;
    };
    let NodeKind::ObjectPattern { properties } = ast.kind(*id) else {
        return None;
    };

    properties.iter().copied().find_map(|prop| {
        let NodeKind::Property { value, .. } = ast.kind(prop) else {
            return None;
        };
        let local = match ast.kind(*value) {
            NodeKind::AssignmentPattern { left, .. } => *left,
            _ => *value,
        };
        if ast.kind(local).identifier_name() != Some(name) {
            return None;
        }
        Some(PatternBinding {
            key: property_key_name(ast, prop),
            init: *init,
        })
    })
}

/// `Reflect`, `globalThis.Reflect`, `window.Reflect`, or `self.Reflect`.
pub fn is_reflect_object(ast: &Ast, node: NodeId) -> bool {
    let expr = unwrap_chain(ast, node);
    match ast.kind(expr) {
        NodeKind::Identifier { name } => name == "Reflect",
        NodeKind::MemberExpression { object, .. } => {
            if member_property_name(ast, expr).as_deref() != Some("Reflect") {
                return false;
            }
            let base = unwrap_chain(ast, *object);
            ast.kind(base)
                .identifier_name()
                .is_some_and(|n| REFLECT_HOLDERS.contains(&n))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{Language, ParserManager};
    use crate::scope::{ScopeManager, ScopeOptions};

    fn parse(source: &str) -> Ast {
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), Language::JavaScript)
            .expect("parse");
        Ast::from_parse(&parsed, source)
    }

    /// Resolve the callee of the last call expression in `source`.
    fn last_callee_is_execute(source: &str) -> bool {
        let ast = parse(source);
        let scopes = ScopeManager::build(&ast, &ScopeOptions::default());
        let mut index = ScopeIndex::new(&ast, &scopes);
        let call = ast.call_expressions().last().expect("call");
        let NodeKind::CallExpression { callee, .. } = ast.kind(call) else {
            unreachable!()
        };
        let scope = index.scope_of(call);
        TargetResolver::new().is_execute_reference(&mut index, *callee, scope)
    }

    #[test]
    fn direct_member_chain() {
        assert!(last_callee_is_execute("chrome.scripting.executeScript({});"));
        assert!(last_callee_is_execute("browser.scripting.executeScript({});"));
        assert!(!last_callee_is_execute("other.scripting.executeScript({});"));
        assert!(!last_callee_is_execute("chrome.tabs.executeScript({});"));
    }

    #[test]
    fn aliases_and_destructuring() {
        assert!(last_callee_is_execute(
            "const s = chrome.scripting; const run = s.executeScript; run({});"
        ));
        assert!(last_callee_is_execute(
            "const { scripting } = chrome; scripting.executeScript({});"
        ));
        assert!(last_callee_is_execute(
            "const { executeScript: go = null } = chrome.scripting; go({});"
        ));
        assert!(last_callee_is_execute("const host = browser; host.scripting.executeScript({});"));
    }

    #[test]
    fn bound_and_wrapped() {
        assert!(last_callee_is_execute(
            "const run = chrome.scripting.executeScript.bind(chrome.scripting); run({});"
        ));
        assert!(last_callee_is_execute(
            "const api = { executeScript: chrome.scripting.executeScript }; api.executeScript({});"
        ));
        assert!(!last_callee_is_execute(
            "const api = { executeScript(config) { return config; } }; api.executeScript({});"
        ));
    }

    #[test]
    fn alias_cycle_terminates_without_match() {
        assert!(!last_callee_is_execute("var a = b; var b = a; a({});"));
    }

    #[test]
    fn imports_never_match() {
        assert!(!last_callee_is_execute(
            "import { executeScript } from './api.js'; executeScript({});"
        ));
    }

    #[test]
    fn cache_records_successful_path() {
        let source = "const a = chrome.scripting.executeScript; const b = a; b({}); b({});";
        let ast = parse(source);
        let scopes = ScopeManager::build(&ast, &ScopeOptions::default());
        let mut index = ScopeIndex::new(&ast, &scopes);
        let mut resolver = TargetResolver::new();
        for call in ast.call_expressions().collect::<Vec<_>>() {
            let NodeKind::CallExpression { callee, .. } = ast.kind(call) else {
                unreachable!()
            };
            let scope = index.scope_of(call);
            assert!(resolver.is_execute_reference(&mut index, *callee, scope));
        }
        assert_eq!(resolver.cached(), 2);
    }

    #[test]
    fn reflect_holders() {
        let ast = parse("Reflect; globalThis.Reflect; self['Reflect']; other.Reflect;");
        let statements: Vec<NodeId> = match ast.kind(ast.root()) {
            NodeKind::Program { body } => body.clone(),
            _ => unreachable!(),
        };
        let verdicts: Vec<bool> = statements
            .iter()
            .map(|&s| match ast.kind(s) {
                NodeKind::ExpressionStatement { expression } => {
                    is_reflect_object(&ast, *expression)
                }
                _ => false,
            })
            .collect();
        assert_eq!(verdicts, vec![true, true, true, false]);
    }
}
