//! Invocation config extraction: which argument of a confirmed call carries the
//! `executeScript` options object.
//!
//! | callee form                               | options source                 |
//! |-------------------------------------------|--------------------------------|
//! | `ref(cfg)`                                | 1st argument                   |
//! | `ref.call(thisArg, cfg)`                  | 2nd argument                   |
//! | `ref.apply(thisArg, [cfg])`               | 1st element of the array       |
//! | `Reflect.apply(ref, thisArg, [cfg])`      | 1st element of the array       |
//!
//! An `apply` whose argument list is not an array literal, or starts with a
//! hole or a spread, is dynamic.

use crate::ast::accessor::{member_property_name, unwrap_chain};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::scope::ScopeIndex;

use super::target::{is_reflect_object, TargetResolver};

/// Property names a candidate member callee may end in.
const CANDIDATE_PROPERTIES: &[&str] = &[
    "executeScript",
    "scripting",
    "call",
    "apply",
    "bind",
    "Reflect",
];

/// Outcome of matching a call expression against the injection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Not an `executeScript` call.
    NoMatch,
    /// Confirmed call; the options node, if the call passed one.
    Static(Option<NodeId>),
    /// Confirmed call whose options cannot be located statically.
    Dynamic,
}

/// Cheap syntactic pre-filter on the callee.
pub fn is_candidate_shape(ast: &Ast, callee: NodeId) -> bool {
    let callee = unwrap_chain(ast, callee);
    match ast.kind(callee) {
        NodeKind::Identifier { .. } => true,
        NodeKind::MemberExpression { .. } => member_property_name(ast, callee)
            .is_some_and(|name| CANDIDATE_PROPERTIES.contains(&name.as_ref())),
        _ => false,
    }
}

/// Argument-count pre-filter. Direct calls take at most one argument;
/// `.call` / `.apply` need a receiver plus options.
pub fn is_arity_compatible(ast: &Ast, call: NodeId) -> bool {
    let NodeKind::CallExpression {
        callee, arguments, ..
    } = ast.kind(call)
    else {
        return false;
    };
    let callee = unwrap_chain(ast, *callee);
    match ast.kind(callee) {
        NodeKind::Identifier { .. } => arguments.len() <= 1,
        NodeKind::MemberExpression { .. } => match member_property_name(ast, callee).as_deref() {
            Some("executeScript") => arguments.len() <= 1,
            Some("call") | Some("apply") => arguments.len() >= 2,
            _ => true,
        },
        _ => false,
    }
}

/// Decide whether `call` invokes `executeScript` and where its options are.
pub fn resolve_invocation(
    resolver: &mut TargetResolver,
    index: &mut ScopeIndex<'_>,
    call: NodeId,
) -> Invocation {
    let ast = index.ast();
    let NodeKind::CallExpression {
        callee, arguments, ..
    } = ast.kind(call)
    else {
        return Invocation::NoMatch;
    };
    let call_scope = index.scope_of(call);
    let callee = unwrap_chain(ast, *callee);

    if resolver.is_execute_reference(index, callee, call_scope) {
        return Invocation::Static(arguments.first().copied());
    }

    let NodeKind::MemberExpression { object, .. } = ast.kind(callee) else {
        return Invocation::NoMatch;
    };
    let invoke = member_property_name(ast, callee);
    let is_apply = match invoke.as_deref() {
        Some("call") => false,
        Some("apply") => true,
        _ => return Invocation::NoMatch,
    };

    let via_reflect = is_apply && is_reflect_object(ast, *object);
    let target = if via_reflect {
        match arguments.first() {
            Some(&target) => target,
            None => return Invocation::NoMatch,
        }
    } else {
        *object
    };

    if !resolver.is_execute_reference(index, target, call_scope) {
        return Invocation::NoMatch;
    }

    if !is_apply {
        return Invocation::Static(arguments.get(1).copied());
    }

    let container = if via_reflect {
        arguments.get(2)
    } else {
        arguments.get(1)
    };
    let Some(&container) = container else {
        return Invocation::Dynamic;
    };
    let NodeKind::ArrayExpression { elements } = ast.kind(unwrap_chain(ast, container)) else {
        return Invocation::Dynamic;
    };
    match elements.first() {
        Some(Some(first)) if !matches!(ast.kind(*first), NodeKind::SpreadElement { .. }) => {
            Invocation::Static(Some(*first))
        }
        _ => Invocation::Dynamic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{Language, ParserManager};
    use crate::scope::{ScopeManager, ScopeOptions};

    fn invocation(source: &str) -> (Ast, Invocation) {
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), Language::JavaScript)
            .expect("parse");
        let ast = Ast::from_parse(&parsed, source);
        let scopes = ScopeManager::build(&ast, &ScopeOptions::default());
        let call = ast.call_expressions().next().expect("call");
        let result = {
            let mut index = ScopeIndex::new(&ast, &scopes);
            resolve_invocation(&mut TargetResolver::new(), &mut index, call)
        };
        (ast, result)
    }

    fn static_text(source: &str) -> Option<String> {
        let (ast, result) = invocation(source);
        match result {
            Invocation::Static(Some(node)) => Some(ast.text(node).to_string()),
            _ => None,
        }
    }

    #[test]
    fn direct_call_and_call_forms() {
        assert_eq!(
            static_text("chrome.scripting.executeScript({ a: 1 });").as_deref(),
            Some("{ a: 1 }")
        );
        assert_eq!(
            static_text("chrome.scripting.executeScript.call(chrome.scripting, { b: 2 });")
                .as_deref(),
            Some("{ b: 2 }")
        );
    }

    #[test]
    fn apply_forms() {
        assert_eq!(
            static_text("chrome.scripting.executeScript.apply(chrome.scripting, [{ c: 3 }]);")
                .as_deref(),
            Some("{ c: 3 }")
        );
        assert_eq!(
            static_text(
                "Reflect.apply(chrome.scripting.executeScript, chrome.scripting, [{ d: 4 }]);"
            )
            .as_deref(),
            Some("{ d: 4 }")
        );
    }

    #[test]
    fn dynamic_apply_arguments() {
        for source in [
            "chrome.scripting.executeScript.apply(chrome.scripting, list);",
            "chrome.scripting.executeScript.apply(chrome.scripting, []);",
            "chrome.scripting.executeScript.apply(chrome.scripting, [, {}]);",
            "chrome.scripting.executeScript.apply(chrome.scripting, [...list]);",
            "Reflect.apply(chrome.scripting.executeScript, chrome.scripting, list);",
        ] {
            assert_eq!(invocation(source).1, Invocation::Dynamic, "{source}");
        }
    }

    #[test]
    fn unrelated_calls_do_not_match() {
        assert_eq!(invocation("console.log({});").1, Invocation::NoMatch);
        assert_eq!(invocation("fn.call(null, {});").1, Invocation::NoMatch);
    }

    #[test]
    fn shape_and_arity_filters() {
        let source = "a.executeScript(x, y); b.call(x); c(); d.foo(1, 2, 3);";
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), Language::JavaScript)
            .expect("parse");
        let ast = Ast::from_parse(&parsed, source);
        let calls: Vec<NodeId> = ast.call_expressions().collect();
        let arity: Vec<bool> = calls.iter().map(|&c| is_arity_compatible(&ast, c)).collect();
        assert_eq!(arity, vec![false, false, true, true]);
        let shape: Vec<bool> = calls
            .iter()
            .map(|&c| match ast.kind(c) {
                NodeKind::CallExpression { callee, .. } => is_candidate_shape(&ast, *callee),
                _ => false,
            })
            .collect();
        assert_eq!(shape, vec![true, true, true, false]);
    }
}
