//! Parser front end and syntax tree lowering tests (LOW-01 through LOW-12).

use std::path::Path;

use mv3lint_analysis::ast::{LiteralValue, NodeKind};
use mv3lint_analysis::parsers::{parse_source, Language, ParserManager};
use mv3lint_analysis::Ast;
use mv3lint_core::errors::{Mv3ErrorCode, ParseError};

fn lower(source: &str, language: Language) -> Ast {
    let parsed = parse_source(language, source).expect("parse");
    Ast::from_parse(&parsed, source)
}

fn kinds_of(ast: &Ast) -> Vec<&'static str> {
    ast.pre_order(ast.root()).map(|id| ast.kind(id).name()).collect()
}

/// LOW-01: Extensions route to the right grammar; unknown extensions fail.
#[test]
fn test_language_routing() {
    let manager = ParserManager::new();
    let js = manager.parse(b"let a = 1;", Path::new("a.mjs")).expect("js");
    assert_eq!(js.language, Language::JavaScript);
    let tsx = manager
        .parse(b"const v = <div>{x}</div>;", Path::new("a.tsx"))
        .expect("tsx");
    assert_eq!(tsx.language, Language::Tsx);
    assert!(!tsx.has_errors);

    let err = manager.parse(b"x", Path::new("a.py")).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedLanguage { .. }));
    assert_eq!(err.error_code(), "UNSUPPORTED_LANGUAGE");
    assert!(!manager.supports(Path::new("README.md")));
    assert!(manager.supports(Path::new("bg.cts")));
}

/// LOW-02: Syntax errors are counted and a tree is still produced.
#[test]
fn test_error_tolerance() {
    let parsed = parse_source(Language::JavaScript, "const = ;\nfoo(").expect("parse");
    assert!(parsed.has_errors);
    assert!(parsed.error_count > 0);
    assert_eq!(parsed.error_ranges.len() as u32, parsed.error_count);
    let ast = Ast::from_parse(&parsed, "const = ;\nfoo(");
    assert!(!ast.is_empty());
}

/// LOW-03: Optional chains are wrapped in a single ChainExpression.
#[test]
fn test_optional_chain_wrapper() {
    let ast = lower("chrome?.scripting?.executeScript?.({});", Language::JavaScript);
    let kinds = kinds_of(&ast);
    assert_eq!(kinds.iter().filter(|k| **k == "ChainExpression").count(), 1);
    let call = ast.call_expressions().next().expect("call");
    let NodeKind::CallExpression { optional, .. } = ast.kind(call) else {
        unreachable!()
    };
    assert!(*optional);
}

/// LOW-04: Array holes are kept as empty slots.
#[test]
fn test_array_holes() {
    let ast = lower("[, a, , b];", Language::JavaScript);
    let array = ast
        .pre_order(ast.root())
        .find(|&id| matches!(ast.kind(id), NodeKind::ArrayExpression { .. }))
        .expect("array");
    let NodeKind::ArrayExpression { elements } = ast.kind(array) else {
        unreachable!()
    };
    let present: Vec<bool> = elements.iter().map(Option::is_some).collect();
    assert_eq!(present, vec![false, true, false, true]);
}

/// LOW-05: String and template literals are cooked.
#[test]
fn test_cooked_literals() {
    let ast = lower(r#"a['executeScript']; b[`scripting`];"#, Language::JavaScript);
    let strings: Vec<String> = ast
        .pre_order(ast.root())
        .filter_map(|id| match ast.kind(id) {
            NodeKind::Literal {
                value: LiteralValue::String(s),
            } => Some(s.clone()),
            NodeKind::TemplateLiteral { quasis, .. } => quasis.first().cloned(),
            _ => None,
        })
        .collect();
    assert_eq!(strings, vec!["executeScript".to_string(), "scripting".to_string()]);
}

/// LOW-06: Parent links point back up the tree.
#[test]
fn test_parent_links() {
    let ast = lower("function f(a) { return a; }", Language::JavaScript);
    for id in ast.pre_order(ast.root()) {
        for child in ast.children(id) {
            assert_eq!(ast.parent(child), Some(id));
        }
    }
    assert_eq!(ast.parent(ast.root()), None);
}

/// LOW-07: Call expressions are listed in document order.
#[test]
fn test_call_expressions_document_order() {
    let source = "first(second(), () => third());\nfourth();";
    let ast = lower(source, Language::JavaScript);
    let callees: Vec<&str> = ast
        .call_expressions()
        .map(|call| match ast.kind(call) {
            NodeKind::CallExpression { callee, .. } => ast.text(*callee),
            _ => "",
        })
        .collect();
    assert_eq!(callees, vec!["first", "second", "third", "fourth"]);
}

/// LOW-08: TypeScript expression wrappers keep their inner expression.
#[test]
fn test_typescript_wrappers() {
    let ast = lower(
        "const run = (chrome.scripting.executeScript as Function)!;",
        Language::TypeScript,
    );
    let kinds = kinds_of(&ast);
    assert!(kinds.contains(&"TsTypeWrapper"));
    assert!(kinds.contains(&"MemberExpression"));
}

/// LOW-09: Object literal shapes: shorthand, methods, spreads, computed keys.
#[test]
fn test_object_literal_shapes() {
    let ast = lower(
        "({ a, b() {}, ...rest, [k]: 1, 'c': 2 });",
        Language::JavaScript,
    );
    let object = ast
        .pre_order(ast.root())
        .find(|&id| matches!(ast.kind(id), NodeKind::ObjectExpression { .. }))
        .expect("object");
    let NodeKind::ObjectExpression { properties } = ast.kind(object) else {
        unreachable!()
    };
    let shapes: Vec<(&str, bool, bool, bool)> = properties
        .iter()
        .map(|&p| match ast.kind(p) {
            NodeKind::Property {
                shorthand,
                method,
                computed,
                ..
            } => ("Property", *shorthand, *method, *computed),
            other => (other.name(), false, false, false),
        })
        .collect();
    assert_eq!(
        shapes,
        vec![
            ("Property", true, false, false),
            ("Property", false, true, false),
            ("SpreadElement", false, false, false),
            ("Property", false, false, true),
            ("Property", false, false, false),
        ]
    );
}

/// LOW-10: Destructuring declarations lower to patterns with defaults.
#[test]
fn test_destructuring_patterns() {
    let ast = lower(
        "const { executeScript: run = fallback, ...others } = chrome.scripting;",
        Language::JavaScript,
    );
    let kinds = kinds_of(&ast);
    for expected in ["ObjectPattern", "AssignmentPattern", "RestElement"] {
        assert!(kinds.contains(&expected), "missing {expected}");
    }
}

/// LOW-11: `export * from` lowers to an export-all with its cooked source.
#[test]
fn test_export_all() {
    let ast = lower("export * from './m';\nexport { a } from \"./n\";", Language::JavaScript);
    let sources: Vec<(&str, &str)> = ast
        .pre_order(ast.root())
        .filter_map(|id| match ast.kind(id) {
            NodeKind::ExportAllDeclaration { source } => Some(("all", source.as_str())),
            NodeKind::ExportNamedDeclaration {
                source: Some(source),
                ..
            } => Some(("named", source.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec![("all", "./m"), ("named", "./n")]);
}

/// LOW-12: TypeScript namespaces, import-equals, and bodiless signatures.
#[test]
fn test_typescript_declaration_forms() {
    let ast = lower(
        "namespace Outer.Inner { export const x = 1; }\n\
         import fs = require('fs');\n\
         import alias = Outer.Inner;\n\
         declare function ping(v: Payload): void;\n",
        Language::TypeScript,
    );
    let mut namespaces = Vec::new();
    let mut imports = Vec::new();
    let mut signatures = Vec::new();
    for id in ast.pre_order(ast.root()) {
        match ast.kind(id) {
            NodeKind::TsModuleDeclaration { id: Some(name), body } => {
                namespaces.push((ast.text(*name), body.len()));
            }
            NodeKind::TsImportEquals {
                id: local,
                source,
                reference,
            } => imports.push((
                ast.text(*local),
                source.clone(),
                reference.map(|r| ast.text(r)),
            )),
            NodeKind::TsDeclareFunction { id: name, annotation } => {
                signatures.push((ast.text(*name), annotation.is_some()));
            }
            _ => {}
        }
    }
    assert_eq!(namespaces, vec![("Outer", 1)]);
    assert_eq!(
        imports,
        vec![
            ("fs", Some("fs".to_string()), None),
            ("alias", None, Some("Outer")),
        ]
    );
    assert_eq!(signatures, vec![("ping", true)]);
}
