//! Closure-capture detection and `args` consistency for the injected function.

use std::collections::VecDeque;

use mv3lint_core::types::collections::FxHashSet;

use crate::ast::accessor::{find_property, property_value, unwrap_chain};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::rules::DiagnosticKind;
use crate::scope::{ScopeId, ScopeIndex};

/// A variable read by the injected function but declared outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub identifier: NodeId,
    pub name: String,
}

/// A function with parameters needs `args: [...]` in the same options object.
/// Returns the finding and the node it is reported at.
pub fn check_arguments(
    ast: &Ast,
    config: NodeId,
    func_prop: NodeId,
    function: NodeId,
) -> Option<(DiagnosticKind, NodeId)> {
    let has_params = ast
        .kind(function)
        .as_function()
        .is_some_and(|f| !f.params.is_empty());
    if !has_params {
        return None;
    }

    let Some(args_prop) = find_property(ast, config, "args") else {
        return Some((DiagnosticKind::MissingArgs, func_prop));
    };
    let args_value = property_value(ast, args_prop)?;
    match ast.kind(unwrap_chain(ast, args_value)) {
        NodeKind::ArrayExpression { .. } => None,
        _ => Some((DiagnosticKind::InvalidArgs, args_value)),
    }
}

/// `root` and every scope nested under it, breadth-first.
pub fn collect_scope_tree(index: &ScopeIndex<'_>, root: ScopeId) -> Vec<ScopeId> {
    let graph = index.graph();
    let mut seen = FxHashSet::default();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(scope) = queue.pop_front() {
        if !seen.insert(scope) {
            continue;
        }
        order.push(scope);
        queue.extend(graph.scope(scope).child_scopes.iter().copied());
    }
    order
}

/// References inside `function` that resolve to declared variables living
/// outside its scope tree, one per distinct name, in scope-then-source order.
///
/// Ambient variables with no definitions (configured globals, `arguments`)
/// never count, nor do initializing writes and type-position references.
pub fn find_captures(index: &mut ScopeIndex<'_>, function: NodeId) -> Vec<Capture> {
    let graph = index.graph();
    let Some(function_scope) = graph.acquire(function) else {
        return Vec::new();
    };
    let scopes = collect_scope_tree(index, function_scope);
    let allowed: FxHashSet<ScopeId> = scopes.iter().copied().collect();

    let mut reported: FxHashSet<&str> = FxHashSet::default();
    let mut captures = Vec::new();
    for &scope in &scopes {
        for &reference_id in &graph.scope(scope).references {
            let reference = graph.reference(reference_id);
            if reference.type_only || reference.init {
                continue;
            }
            let Some(var) = reference.resolved else {
                continue;
            };
            let variable = graph.variable(var);
            if variable.defs.is_empty() || allowed.contains(&variable.scope) {
                continue;
            }
            if !reported.insert(reference.name.as_str()) {
                continue;
            }
            captures.push(Capture {
                identifier: reference.identifier,
                name: reference.name.clone(),
            });
        }
    }
    captures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{Language, ParserManager};
    use crate::scope::{ScopeManager, ScopeOptions};

    fn captures(source: &str, language: Language) -> Vec<String> {
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), language)
            .expect("parse");
        let ast = Ast::from_parse(&parsed, source);
        let options = ScopeOptions {
            globals: vec!["window".to_string()],
            ..ScopeOptions::default()
        };
        let scopes = ScopeManager::build(&ast, &options);
        let mut index = ScopeIndex::new(&ast, &scopes);
        let function = ast
            .pre_order(ast.root())
            .find(|&id| {
                matches!(
                    ast.kind(id).name(),
                    "FunctionDeclaration" | "FunctionExpression"
                )
            })
            .expect("function");
        find_captures(&mut index, function)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn outer_names_reported_once_each() {
        let source =
            "const A = 1; let B = 2;\nfunction f(x) { const y = A + x; return () => A + B + y; }";
        assert_eq!(captures(source, Language::JavaScript), vec!["A", "B"]);
    }

    #[test]
    fn globals_and_locals_are_allowed() {
        let source =
            "function f() { const href = window.location.href; arguments; return { href }; }";
        assert!(captures(source, Language::JavaScript).is_empty());
    }

    #[test]
    fn named_expression_self_reference_is_outside() {
        let source = "const run = function again(n) { return n ? again(n - 1) : 0; };";
        assert_eq!(captures(source, Language::JavaScript), vec!["again"]);
    }

    #[test]
    fn type_positions_are_ignored() {
        let source =
            "type Cfg = { x: number };\nconst K = 1;\nfunction f(c: Cfg): Cfg { return c; }";
        assert!(captures(source, Language::TypeScript).is_empty());
    }

    #[test]
    fn args_consistency() {
        let source = "chrome.scripting.executeScript({ func: (a) => a, args: payload });";
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), Language::JavaScript)
            .expect("parse");
        let ast = Ast::from_parse(&parsed, source);
        let config = ast
            .pre_order(ast.root())
            .find(|&id| matches!(ast.kind(id), NodeKind::ObjectExpression { .. }))
            .expect("config");
        let func_prop = find_property(&ast, config, "func").expect("func");
        let function = property_value(&ast, func_prop).expect("value");
        let (kind, at) = check_arguments(&ast, config, func_prop, function).expect("finding");
        assert_eq!(kind, DiagnosticKind::InvalidArgs);
        assert_eq!(ast.text(at), "payload");
    }
}
