//! Scope graph tests (SCP-01 through SCP-13).

use mv3lint_analysis::parsers::{Language, ParserManager};
use mv3lint_analysis::scope::{
    DefinitionKind, ReferenceFlag, ScopeGraph, ScopeKind, ScopeManager, ScopeOptions,
};
use mv3lint_analysis::Ast;
use mv3lint_core::config::SourceType;

fn build_with(source: &str, language: Language, options: ScopeOptions) -> (Ast, ScopeManager) {
    let parsed = ParserManager::new()
        .parse_as(source.as_bytes(), language)
        .expect("parse");
    let ast = Ast::from_parse(&parsed, source);
    let scopes = ScopeManager::build(&ast, &options);
    (ast, scopes)
}

fn build(source: &str) -> (Ast, ScopeManager) {
    build_with(source, Language::JavaScript, ScopeOptions::default())
}

/// Kind of the scope declaring `name`, looked up from the innermost scope of
/// the last identifier spelled `name`.
fn declaring_scope_kind(ast: &Ast, scopes: &ScopeManager, name: &str) -> Option<ScopeKind> {
    let use_site = ast
        .pre_order(ast.root())
        .filter(|&id| ast.kind(id).identifier_name() == Some(name))
        .last()?;
    let from = scopes.scope_of(use_site)?;
    let var = scopes.lookup(from, name)?;
    Some(scopes.scope(scopes.variable(var).scope).kind)
}

/// SCP-01: Module source type puts top-level bindings in a module scope.
#[test]
fn test_module_scope() {
    let (ast, scopes) = build("const a = 1; function f() {} a;");
    let global = scopes.global_scope();
    assert_eq!(scopes.scope(global).kind, ScopeKind::Global);
    assert_eq!(declaring_scope_kind(&ast, &scopes, "a"), Some(ScopeKind::Module));
    assert_eq!(declaring_scope_kind(&ast, &scopes, "f"), Some(ScopeKind::Module));
}

/// SCP-02: Script source type puts top-level bindings in the global scope.
#[test]
fn test_script_scope() {
    let options = ScopeOptions {
        source_type: SourceType::Script,
        ..ScopeOptions::default()
    };
    let (ast, scopes) = build_with("const a = 1; a;", Language::JavaScript, options);
    assert_eq!(declaring_scope_kind(&ast, &scopes, "a"), Some(ScopeKind::Global));
}

/// SCP-03: `var` hoists to the enclosing function scope; `let` stays in its block.
#[test]
fn test_var_hoisting_and_block_scoping() {
    let (ast, scopes) = build("function f() { { var v = 1; let l = 2; l; } v; }");
    assert_eq!(declaring_scope_kind(&ast, &scopes, "v"), Some(ScopeKind::Function));
    assert_eq!(declaring_scope_kind(&ast, &scopes, "l"), Some(ScopeKind::Block));
}

/// SCP-04: References resolve to hoisted declarations that appear later.
#[test]
fn test_forward_references_resolve() {
    let (_, scopes) = build("g(); function g() {}");
    let reference = scopes
        .references()
        .map(|(_, r)| r)
        .find(|r| r.name == "g")
        .expect("reference");
    let var = reference.resolved.expect("resolved");
    assert_eq!(scopes.variable(var).defs[0].kind, DefinitionKind::FunctionName);
}

/// SCP-05: Undeclared names stay unresolved.
#[test]
fn test_unresolved_reference() {
    let (_, scopes) = build("missing + 1;");
    let reference = scopes.references().map(|(_, r)| r).next().expect("reference");
    assert_eq!(reference.name, "missing");
    assert!(reference.resolved.is_none());
}

/// SCP-06: Configured globals are variables without definitions.
#[test]
fn test_configured_globals() {
    let options = ScopeOptions {
        globals: vec!["chrome".to_string()],
        ..ScopeOptions::default()
    };
    let (_, scopes) = build_with("chrome.runtime;", Language::JavaScript, options);
    let reference = scopes.references().map(|(_, r)| r).next().expect("reference");
    let var = reference.resolved.expect("resolved");
    assert!(scopes.variable(var).defs.is_empty());
    assert_eq!(scopes.variable(var).scope, scopes.global_scope());
}

/// SCP-07: Declarator initializers produce `init` writes; assignments do not.
#[test]
fn test_init_and_write_flags() {
    let (_, scopes) = build("let x = 1; x = 2; x += 3;");
    let flags: Vec<(ReferenceFlag, bool)> = scopes
        .references()
        .map(|(_, r)| (r.flag, r.init))
        .collect();
    assert_eq!(
        flags,
        vec![
            (ReferenceFlag::Write, true),
            (ReferenceFlag::Write, false),
            (ReferenceFlag::ReadWrite, false),
        ]
    );
}

/// SCP-08: Named function expressions get their own name scope.
#[test]
fn test_function_expression_name_scope() {
    let (ast, scopes) = build("const outer = function inner() { return inner; };");
    assert_eq!(
        declaring_scope_kind(&ast, &scopes, "inner"),
        Some(ScopeKind::FunctionExpressionName)
    );
}

/// SCP-09: Catch parameters live in the catch scope; `arguments` is implicit.
#[test]
fn test_catch_and_arguments() {
    let (ast, scopes) = build("function f() { try {} catch (err) { err; } return arguments; }");
    assert_eq!(declaring_scope_kind(&ast, &scopes, "err"), Some(ScopeKind::Catch));
    let arguments = scopes
        .references()
        .map(|(_, r)| r)
        .find(|r| r.name == "arguments")
        .expect("arguments");
    let var = arguments.resolved.expect("resolved");
    assert!(scopes.variable(var).defs.is_empty());
    assert_eq!(scopes.scope(scopes.variable(var).scope).kind, ScopeKind::Function);
}

/// SCP-10: Import bindings are marked as imported.
#[test]
fn test_import_bindings() {
    let (_, scopes) = build("import def, { a as b } from './m.js'; import * as ns from './n.js';");
    let imported: Vec<&str> = scopes
        .variables()
        .filter(|(_, v)| v.is_imported())
        .map(|(_, v)| v.name.as_str())
        .collect();
    assert_eq!(imported.len(), 3);
    for name in ["def", "b", "ns"] {
        assert!(imported.contains(&name), "missing {name}");
    }
}

/// SCP-11: Class names are bound both outside and inside the class.
#[test]
fn test_class_scopes() {
    let (_, scopes) = build("class A { m() { return A; } }");
    let class_scopes = scopes
        .scopes()
        .filter(|(_, s)| s.kind == ScopeKind::Class)
        .count();
    assert_eq!(class_scopes, 1);
    let defs: Vec<DefinitionKind> = scopes
        .variables()
        .filter(|(_, v)| v.name == "A")
        .flat_map(|(_, v)| v.defs.iter().map(|d| d.kind))
        .collect();
    assert_eq!(defs, vec![DefinitionKind::ClassName, DefinitionKind::ClassName]);
}

/// SCP-12: TypeScript type positions produce type-only references.
#[test]
fn test_type_only_references() {
    let (_, scopes) = build_with(
        "interface Shape { w: number }\nconst s: Shape = make();\n",
        Language::TypeScript,
        ScopeOptions::default(),
    );
    let shape_refs: Vec<bool> = scopes
        .references()
        .map(|(_, r)| r)
        .filter(|r| r.name == "Shape")
        .map(|r| r.type_only)
        .collect();
    assert_eq!(shape_refs, vec![true]);
    let make = scopes
        .references()
        .map(|(_, r)| r)
        .find(|r| r.name == "make")
        .expect("make");
    assert!(!make.type_only);
}

/// SCP-13: Namespaces, import-equals, and ambient functions declare bindings.
#[test]
fn test_typescript_declaration_bindings() {
    let (ast, scopes) = build_with(
        "namespace N { const inner = 1; }\n\
         import K = require('k');\n\
         declare function g(): void;\n",
        Language::TypeScript,
        ScopeOptions::default(),
    );
    let def_of = |name: &str| {
        scopes
            .variables()
            .find(|(_, v)| v.name == name)
            .map(|(_, v)| (v.defs[0].kind, scopes.scope(v.scope).kind))
    };
    assert_eq!(
        def_of("N"),
        Some((DefinitionKind::NamespaceName, ScopeKind::Module))
    );
    assert_eq!(
        def_of("K"),
        Some((DefinitionKind::ImportBinding, ScopeKind::Module))
    );
    assert_eq!(
        def_of("g"),
        Some((DefinitionKind::FunctionName, ScopeKind::Module))
    );
    assert_eq!(
        declaring_scope_kind(&ast, &scopes, "inner"),
        Some(ScopeKind::TsModule)
    );

    let namespace = ast
        .pre_order(ast.root())
        .find(|&id| ast.kind(id).name() == "TsModuleDeclaration")
        .expect("namespace");
    let acquired = scopes.acquire(namespace).expect("namespace scope");
    assert_eq!(scopes.scope(acquired).kind, ScopeKind::TsModule);
}
