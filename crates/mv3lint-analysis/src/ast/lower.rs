//! Lowering from the tree-sitter concrete tree to the arena [`Ast`].
//!
//! The lowering is total: any construct without a dedicated [`NodeKind`]
//! becomes `Unsupported` with its children lowered, and missing required
//! fields in error-recovered trees become empty `Unsupported` placeholders.

use tree_sitter::{Node as TsNode, Tree};

use super::{
    ensure_stack, Ast, Class, Function, LiteralValue, Node, NodeId, NodeKind, PropertyKind, Span,
    TypeDeclarationKind, VariableKind,
};
use crate::parsers::types::Range;
use crate::parsers::Language;

/// Lower a parsed tree into an [`Ast`].
pub fn lower_tree(tree: &Tree, source: &str, language: Language) -> Ast {
    let mut lowerer = Lowerer {
        source,
        nodes: Vec::new(),
    };
    let root = lowerer.lower_program(tree.root_node());
    Ast::from_nodes(lowerer.nodes, root, source.to_string(), language)
}

fn named<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !c.is_extra() && c.kind() != "comment")
        .collect()
}

fn all_children<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).filter(|c| !c.is_extra()).collect()
}

fn first_named<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    named(node).into_iter().next()
}

/// Whether `node` has a direct anonymous child token spelled `token`.
fn has_token(node: TsNode<'_>, token: &str) -> bool {
    all_children(node)
        .iter()
        .any(|c| !c.is_named() && c.kind() == token)
}

fn is_optional_link(node: TsNode<'_>) -> bool {
    node.child_by_field_name("optional_chain").is_some()
        || all_children(node)
            .iter()
            .any(|c| c.kind() == "optional_chain" || c.kind() == "?.")
}

/// Whether a member/call chain contains an optional link anywhere along its spine.
fn chain_has_optional(mut node: TsNode<'_>) -> bool {
    loop {
        let next = match node.kind() {
            "member_expression" | "subscript_expression" => {
                if is_optional_link(node) {
                    return true;
                }
                node.child_by_field_name("object")
            }
            "call_expression" => {
                if is_optional_link(node) {
                    return true;
                }
                node.child_by_field_name("function")
            }
            _ => return false,
        };
        match next {
            Some(n) => node = n,
            None => return false,
        }
    }
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind.ends_with("_declaration")
        || matches!(
            kind,
            "statement_block" | "internal_module" | "module" | "function_signature" | "import_alias"
        )
}

/// Leftmost identifier of a dotted name such as `A.B.C`.
fn leftmost_identifier<'t>(mut node: TsNode<'t>) -> Option<TsNode<'t>> {
    loop {
        match node.kind() {
            "identifier" => return Some(node),
            "nested_identifier" | "member_expression" => node = node.child_by_field_name("object")?,
            _ => return None,
        }
    }
}

fn is_type_kind(kind: &str) -> bool {
    kind.ends_with("_type")
        || matches!(
            kind,
            "type_annotation"
                | "type_arguments"
                | "type_identifier"
                | "nested_type_identifier"
                | "type_query"
                | "implements_clause"
                | "predefined_type"
                | "opting_type_annotation"
                | "omitting_type_annotation"
                | "asserts_annotation"
                | "type_predicate_annotation"
        )
}

struct Lowerer<'s> {
    source: &'s str,
    nodes: Vec<Node>,
}

impl<'s> Lowerer<'s> {
    fn push(&mut self, kind: NodeKind, ts: TsNode<'_>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span: Span {
                start: ts.start_byte() as u32,
                end: ts.end_byte() as u32,
            },
            range: Range::from_ts_node(&ts),
            parent: None,
        });
        id
    }

    fn text(&self, ts: TsNode<'_>) -> &'s str {
        self.slice(ts.start_byte(), ts.end_byte())
    }

    fn slice(&self, start: usize, end: usize) -> &'s str {
        self.source.get(start..end).unwrap_or("")
    }

    fn missing(&mut self, ts: TsNode<'_>) -> NodeId {
        self.push(
            NodeKind::Unsupported {
                ts_kind: "MISSING".to_string(),
                children: Vec::new(),
            },
            ts,
        )
    }

    fn push_identifier(&mut self, ts: TsNode<'_>) -> NodeId {
        let name = self.text(ts).to_string();
        self.push(NodeKind::Identifier { name }, ts)
    }

    fn expr_field(&mut self, ts: TsNode<'_>, field: &str) -> NodeId {
        match ts.child_by_field_name(field) {
            Some(child) => self.lower_expression(child),
            None => self.missing(ts),
        }
    }

    fn stmt_field(&mut self, ts: TsNode<'_>, field: &str) -> NodeId {
        match ts.child_by_field_name(field) {
            Some(child) => self.lower_statement(child),
            None => self.missing(ts),
        }
    }

    fn first_expr(&mut self, ts: TsNode<'_>) -> NodeId {
        match first_named(ts) {
            Some(child) => self.lower_expression(child),
            None => self.missing(ts),
        }
    }

    fn lower_program(&mut self, ts: TsNode<'_>) -> NodeId {
        let body = self.lower_statements(ts);
        self.push(NodeKind::Program { body }, ts)
    }

    fn lower_statements(&mut self, ts: TsNode<'_>) -> Vec<NodeId> {
        named(ts)
            .into_iter()
            .filter(|c| c.kind() != "hash_bang_line")
            .map(|c| self.lower_statement(c))
            .collect()
    }

    fn lower_any(&mut self, ts: TsNode<'_>) -> NodeId {
        if is_statement_kind(ts.kind()) {
            self.lower_statement(ts)
        } else {
            self.lower_expression(ts)
        }
    }

    fn lower_unsupported(&mut self, ts: TsNode<'_>) -> NodeId {
        let children = named(ts)
            .into_iter()
            .map(|c| self.lower_any(c))
            .collect();
        self.push(
            NodeKind::Unsupported {
                ts_kind: ts.kind().to_string(),
                children,
            },
            ts,
        )
    }

    // ---- statements ----

    fn lower_statement(&mut self, ts: TsNode<'_>) -> NodeId {
        ensure_stack(|| self.lower_statement_node(ts))
    }

    fn lower_statement_node(&mut self, ts: TsNode<'_>) -> NodeId {
        let kind = match ts.kind() {
            "expression_statement" => match first_named(ts) {
                Some(e) => NodeKind::ExpressionStatement {
                    expression: self.lower_expression(e),
                },
                None => NodeKind::EmptyStatement,
            },
            "statement_block" => NodeKind::BlockStatement {
                body: self.lower_statements(ts),
            },
            "empty_statement" => NodeKind::EmptyStatement,
            "debugger_statement" => NodeKind::DebuggerStatement,
            "return_statement" => NodeKind::ReturnStatement {
                argument: first_named(ts).map(|e| self.lower_expression(e)),
            },
            "throw_statement" => NodeKind::ThrowStatement {
                argument: self.first_expr(ts),
            },
            "if_statement" => {
                let test = self.expr_field(ts, "condition");
                let consequent = self.stmt_field(ts, "consequence");
                let alternate = ts
                    .child_by_field_name("alternative")
                    .and_then(first_named)
                    .map(|s| self.lower_statement(s));
                NodeKind::IfStatement {
                    test,
                    consequent,
                    alternate,
                }
            }
            "switch_statement" => self.lower_switch(ts),
            "while_statement" => NodeKind::WhileStatement {
                test: self.expr_field(ts, "condition"),
                body: self.stmt_field(ts, "body"),
            },
            "do_statement" => NodeKind::DoWhileStatement {
                body: self.stmt_field(ts, "body"),
                test: self.expr_field(ts, "condition"),
            },
            "for_statement" => {
                let init = ts
                    .child_by_field_name("initializer")
                    .and_then(|n| self.lower_for_part(n));
                let test = ts
                    .child_by_field_name("condition")
                    .and_then(|n| self.lower_for_part(n));
                let update = ts
                    .child_by_field_name("increment")
                    .map(|n| self.lower_expression(n));
                let body = self.stmt_field(ts, "body");
                NodeKind::ForStatement {
                    init,
                    test,
                    update,
                    body,
                }
            }
            "for_in_statement" => self.lower_for_in(ts),
            "labeled_statement" => NodeKind::LabeledStatement {
                label: ts
                    .child_by_field_name("label")
                    .map(|l| self.text(l).to_string())
                    .unwrap_or_default(),
                body: self.stmt_field(ts, "body"),
            },
            "break_statement" => NodeKind::BreakStatement {
                label: ts
                    .child_by_field_name("label")
                    .map(|l| self.text(l).to_string()),
            },
            "continue_statement" => NodeKind::ContinueStatement {
                label: ts
                    .child_by_field_name("label")
                    .map(|l| self.text(l).to_string()),
            },
            "with_statement" => NodeKind::WithStatement {
                object: self.expr_field(ts, "object"),
                body: self.stmt_field(ts, "body"),
            },
            "try_statement" => {
                let block = self.stmt_field(ts, "body");
                let handler = ts
                    .child_by_field_name("handler")
                    .map(|h| self.lower_catch(h));
                let finalizer = ts
                    .child_by_field_name("finalizer")
                    .and_then(|f| f.child_by_field_name("body"))
                    .map(|b| self.lower_statement(b));
                NodeKind::TryStatement {
                    block,
                    handler,
                    finalizer,
                }
            }
            "lexical_declaration" | "variable_declaration" => self.lower_variable_declaration(ts),
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration(self.lower_function(ts))
            }
            "class_declaration" | "abstract_class_declaration" => {
                NodeKind::ClassDeclaration(self.lower_class(ts))
            }
            "import_statement" => self.lower_import(ts),
            "export_statement" => self.lower_export(ts),
            "interface_declaration" => {
                self.lower_type_declaration(ts, TypeDeclarationKind::Interface)
            }
            "type_alias_declaration" => {
                self.lower_type_declaration(ts, TypeDeclarationKind::TypeAlias)
            }
            "enum_declaration" => self.lower_type_declaration(ts, TypeDeclarationKind::Enum),
            "internal_module" | "module" => self.lower_ts_module(ts),
            "function_signature" => self.lower_declare_function(ts),
            "import_alias" => self.lower_import_alias(ts),
            "ambient_declaration" => {
                return match first_named(ts) {
                    Some(inner) => self.lower_any(inner),
                    None => self.missing(ts),
                };
            }
            _ => return self.lower_unsupported(ts),
        };
        self.push(kind, ts)
    }

    fn lower_switch(&mut self, ts: TsNode<'_>) -> NodeKind {
        let discriminant = self.expr_field(ts, "value");
        let mut cases = Vec::new();
        if let Some(body) = ts.child_by_field_name("body") {
            for case in named(body) {
                let test_ts = case.child_by_field_name("value");
                let test = test_ts.map(|t| self.lower_expression(t));
                let consequent = named(case)
                    .into_iter()
                    .filter(|c| Some(c.id()) != test_ts.map(|t| t.id()))
                    .map(|c| self.lower_statement(c))
                    .collect();
                cases.push(self.push(NodeKind::SwitchCase { test, consequent }, case));
            }
        }
        NodeKind::SwitchStatement {
            discriminant,
            cases,
        }
    }

    fn lower_for_part(&mut self, ts: TsNode<'_>) -> Option<NodeId> {
        match ts.kind() {
            "lexical_declaration" | "variable_declaration" => Some(self.lower_statement(ts)),
            "empty_statement" | ";" => None,
            "expression_statement" => first_named(ts).map(|e| self.lower_expression(e)),
            _ => Some(self.lower_expression(ts)),
        }
    }

    fn lower_for_in(&mut self, ts: TsNode<'_>) -> NodeKind {
        let declared = ts.child_by_field_name("kind").map(|k| match self.text(k) {
            "const" => VariableKind::Const,
            "let" => VariableKind::Let,
            _ => VariableKind::Var,
        });
        let left = match (declared, ts.child_by_field_name("left")) {
            (Some(kind), Some(l)) => {
                let id = self.lower_pattern(l);
                let declarator = self.push(
                    NodeKind::VariableDeclarator {
                        id,
                        init: None,
                        type_annotation: None,
                    },
                    l,
                );
                self.push(
                    NodeKind::VariableDeclaration {
                        kind,
                        declarations: vec![declarator],
                    },
                    l,
                )
            }
            (None, Some(l)) => self.lower_pattern(l),
            (_, None) => self.missing(ts),
        };
        let right = self.expr_field(ts, "right");
        let body = self.stmt_field(ts, "body");
        let is_of = ts
            .child_by_field_name("operator")
            .map(|op| op.kind() == "of")
            .unwrap_or_else(|| has_token(ts, "of"));
        if is_of {
            NodeKind::ForOfStatement {
                left,
                right,
                body,
                is_await: has_token(ts, "await"),
            }
        } else {
            NodeKind::ForInStatement { left, right, body }
        }
    }

    fn lower_catch(&mut self, ts: TsNode<'_>) -> NodeId {
        let param = ts
            .child_by_field_name("parameter")
            .map(|p| self.lower_pattern(p));
        let body = self.stmt_field(ts, "body");
        self.push(NodeKind::CatchClause { param, body }, ts)
    }

    fn lower_variable_declaration(&mut self, ts: TsNode<'_>) -> NodeKind {
        let kind = if ts.kind() == "variable_declaration" {
            VariableKind::Var
        } else if ts
            .child_by_field_name("kind")
            .map(|k| self.text(k) == "const")
            .unwrap_or_else(|| has_token(ts, "const"))
        {
            VariableKind::Const
        } else {
            VariableKind::Let
        };
        let declarations = named(ts)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .map(|d| {
                let id = match d.child_by_field_name("name") {
                    Some(n) => self.lower_pattern(n),
                    None => self.missing(d),
                };
                let type_annotation = d
                    .child_by_field_name("type")
                    .and_then(|t| self.lower_type_refs(t));
                let init = d
                    .child_by_field_name("value")
                    .map(|v| self.lower_expression(v));
                self.push(
                    NodeKind::VariableDeclarator {
                        id,
                        init,
                        type_annotation,
                    },
                    d,
                )
            })
            .collect();
        NodeKind::VariableDeclaration { kind, declarations }
    }

    fn lower_import(&mut self, ts: TsNode<'_>) -> NodeKind {
        if let Some(clause) = named(ts)
            .into_iter()
            .find(|c| c.kind() == "import_require_clause")
        {
            return self.lower_import_require(clause);
        }
        let source = ts
            .child_by_field_name("source")
            .map(|s| cook_escapes(strip_quotes(self.text(s))))
            .unwrap_or_default();
        let type_only = has_token(ts, "type");
        let mut specifiers = Vec::new();
        for clause in named(ts).into_iter().filter(|c| c.kind() == "import_clause") {
            for part in named(clause) {
                match part.kind() {
                    "identifier" => {
                        let local = self.push_identifier(part);
                        let specifier = self.push(NodeKind::ImportDefaultSpecifier { local }, part);
                        specifiers.push(specifier);
                    }
                    "namespace_import" => {
                        let name = named(part).into_iter().find(|n| n.kind() == "identifier");
                        if let Some(name) = name {
                            let local = self.push_identifier(name);
                            let specifier =
                                self.push(NodeKind::ImportNamespaceSpecifier { local }, part);
                            specifiers.push(specifier);
                        }
                    }
                    "named_imports" => {
                        for spec in named(part)
                            .into_iter()
                            .filter(|s| s.kind() == "import_specifier")
                        {
                            let name = spec.child_by_field_name("name");
                            let Some(local_ts) = spec.child_by_field_name("alias").or(name) else {
                                continue;
                            };
                            let imported = name
                                .map(|n| self.module_export_name(n))
                                .unwrap_or_default();
                            let local = self.push_identifier(local_ts);
                            let specifier =
                                self.push(NodeKind::ImportSpecifier { local, imported }, spec);
                            specifiers.push(specifier);
                        }
                    }
                    _ => {}
                }
            }
        }
        NodeKind::ImportDeclaration {
            specifiers,
            source,
            type_only,
        }
    }

    /// `import K = require('k')`.
    fn lower_import_require(&mut self, clause: TsNode<'_>) -> NodeKind {
        let id = match named(clause).into_iter().find(|c| c.kind() == "identifier") {
            Some(name) => self.push_identifier(name),
            None => self.missing(clause),
        };
        let source = clause
            .child_by_field_name("source")
            .map(|s| cook_escapes(strip_quotes(self.text(s))));
        NodeKind::TsImportEquals {
            id,
            source,
            reference: None,
        }
    }

    /// `import K = N.x`.
    fn lower_import_alias(&mut self, ts: TsNode<'_>) -> NodeKind {
        let parts = named(ts);
        let id = match parts.first() {
            Some(&name) => self.push_identifier(name),
            None => self.missing(ts),
        };
        let reference = parts
            .get(1)
            .and_then(|&target| leftmost_identifier(target))
            .map(|n| self.push_identifier(n));
        NodeKind::TsImportEquals {
            id,
            source: None,
            reference,
        }
    }

    fn module_export_name(&self, ts: TsNode<'_>) -> String {
        if ts.kind() == "string" {
            cook_escapes(strip_quotes(self.text(ts)))
        } else {
            self.text(ts).to_string()
        }
    }

    fn lower_export(&mut self, ts: TsNode<'_>) -> NodeKind {
        let is_default = has_token(ts, "default");
        if let Some(decl) = ts.child_by_field_name("declaration") {
            let declaration = self.lower_statement(decl);
            return if is_default {
                NodeKind::ExportDefaultDeclaration { declaration }
            } else {
                NodeKind::ExportNamedDeclaration {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                    source: None,
                }
            };
        }
        if let Some(value) = ts.child_by_field_name("value") {
            return NodeKind::ExportDefaultDeclaration {
                declaration: self.lower_expression(value),
            };
        }

        let source = ts
            .child_by_field_name("source")
            .map(|s| cook_escapes(strip_quotes(self.text(s))));
        let clause = named(ts)
            .into_iter()
            .find(|c| c.kind() == "export_clause");
        let Some(clause) = clause else {
            if has_token(ts, "*") {
                if let Some(source) = source {
                    return NodeKind::ExportAllDeclaration { source };
                }
            }
            return NodeKind::ExportNamedDeclaration {
                declaration: None,
                specifiers: Vec::new(),
                source,
            };
        };

        let mut specifiers = Vec::new();
        for spec in named(clause)
            .into_iter()
            .filter(|s| s.kind() == "export_specifier")
        {
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let exported = spec
                .child_by_field_name("alias")
                .map(|a| self.module_export_name(a))
                .unwrap_or_else(|| self.module_export_name(name));
            let local = self.push_identifier(name);
            specifiers.push(self.push(NodeKind::ExportSpecifier { local, exported }, spec));
        }
        NodeKind::ExportNamedDeclaration {
            declaration: None,
            specifiers,
            source,
        }
    }

    fn lower_type_declaration(&mut self, ts: TsNode<'_>, kind: TypeDeclarationKind) -> NodeKind {
        let name = ts.child_by_field_name("name");
        let id = match name {
            Some(n) => self.push_identifier(n),
            None => self.missing(ts),
        };
        let annotation = match kind {
            TypeDeclarationKind::Enum => None,
            TypeDeclarationKind::Interface | TypeDeclarationKind::TypeAlias => {
                let mut references = Vec::new();
                for child in named(ts) {
                    if Some(child.id()) == name.map(|n| n.id()) || child.kind() == "type_parameters"
                    {
                        continue;
                    }
                    self.collect_type_refs(child, &mut references);
                }
                (!references.is_empty())
                    .then(|| self.push(NodeKind::TypeAnnotation { references }, ts))
            }
        };
        NodeKind::TypeDeclaration {
            id,
            kind,
            annotation,
        }
    }

    fn lower_ts_module(&mut self, ts: TsNode<'_>) -> NodeKind {
        let id = ts
            .child_by_field_name("name")
            .and_then(leftmost_identifier)
            .map(|n| self.push_identifier(n));
        let body = ts
            .child_by_field_name("body")
            .map(|b| self.lower_statements(b))
            .unwrap_or_default();
        NodeKind::TsModuleDeclaration { id, body }
    }

    // ---- functions and classes ----

    fn lower_declare_function(&mut self, ts: TsNode<'_>) -> NodeKind {
        let id = match ts.child_by_field_name("name") {
            Some(n) => self.push_identifier(n),
            None => self.missing(ts),
        };
        let mut references = Vec::new();
        for field in ["parameters", "return_type"] {
            if let Some(part) = ts.child_by_field_name(field) {
                self.collect_type_refs(part, &mut references);
            }
        }
        let annotation = (!references.is_empty())
            .then(|| self.push(NodeKind::TypeAnnotation { references }, ts));
        NodeKind::TsDeclareFunction { id, annotation }
    }

    fn lower_function(&mut self, ts: TsNode<'_>) -> Function {
        let id = ts
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.push_identifier(n));

        let mut type_annotations = Vec::new();
        let mut params = Vec::new();
        if let Some(p) = ts.child_by_field_name("parameter") {
            params.push(self.lower_pattern(p));
        }
        if let Some(list) = ts.child_by_field_name("parameters") {
            for p in named(list) {
                if let Some(param) = self.lower_param(p, &mut type_annotations) {
                    params.push(param);
                }
            }
        }
        if let Some(rt) = ts.child_by_field_name("return_type") {
            type_annotations.extend(self.lower_type_refs(rt));
        }

        let (body, expression) = match ts.child_by_field_name("body") {
            Some(b) if b.kind() == "statement_block" => (self.lower_statement(b), false),
            Some(b) => (self.lower_expression(b), true),
            None => (
                self.push(NodeKind::BlockStatement { body: Vec::new() }, ts),
                false,
            ),
        };

        Function {
            id,
            params,
            body,
            is_async: has_token(ts, "async"),
            is_generator: ts.kind().contains("generator") || has_token(ts, "*"),
            expression,
            type_annotations,
        }
    }

    fn lower_param(&mut self, p: TsNode<'_>, types: &mut Vec<NodeId>) -> Option<NodeId> {
        match p.kind() {
            "required_parameter" | "optional_parameter" => {
                if let Some(t) = p.child_by_field_name("type") {
                    types.extend(self.lower_type_refs(t));
                }
                let pattern_ts = p.child_by_field_name("pattern")?;
                if pattern_ts.kind() == "this" {
                    return None;
                }
                let pattern = self.lower_pattern(pattern_ts);
                match p.child_by_field_name("value") {
                    Some(v) => {
                        let right = self.lower_expression(v);
                        Some(self.push(
                            NodeKind::AssignmentPattern {
                                left: pattern,
                                right,
                            },
                            p,
                        ))
                    }
                    None => Some(pattern),
                }
            }
            _ => Some(self.lower_pattern(p)),
        }
    }

    fn lower_class(&mut self, ts: TsNode<'_>) -> Class {
        let id = ts
            .child_by_field_name("name")
            .map(|n| self.push_identifier(n));
        let mut super_class = None;
        let mut type_annotations = Vec::new();
        for heritage in named(ts)
            .into_iter()
            .filter(|c| c.kind() == "class_heritage")
        {
            for clause in named(heritage) {
                match clause.kind() {
                    "extends_clause" => {
                        if let Some(v) = clause
                            .child_by_field_name("value")
                            .or_else(|| first_named(clause))
                        {
                            super_class = Some(self.lower_expression(v));
                        }
                    }
                    "implements_clause" => type_annotations.extend(self.lower_type_refs(clause)),
                    _ => super_class = Some(self.lower_expression(clause)),
                }
            }
        }
        let body = ts
            .child_by_field_name("body")
            .map(|b| {
                named(b)
                    .into_iter()
                    .filter_map(|m| self.lower_class_member(m))
                    .collect()
            })
            .unwrap_or_default();
        Class {
            id,
            super_class,
            body,
            type_annotations,
        }
    }

    fn accessor_kind(m: TsNode<'_>) -> PropertyKind {
        if has_token(m, "get") {
            PropertyKind::Get
        } else if has_token(m, "set") {
            PropertyKind::Set
        } else {
            PropertyKind::Init
        }
    }

    fn lower_class_member(&mut self, m: TsNode<'_>) -> Option<NodeId> {
        match m.kind() {
            "method_definition" => {
                let (key, computed) = self.lower_property_key(m.child_by_field_name("name")?);
                let function = self.lower_function(m);
                let value = self.push(NodeKind::FunctionExpression(function), m);
                Some(self.push(
                    NodeKind::MethodDefinition {
                        key,
                        value,
                        kind: Self::accessor_kind(m),
                        computed,
                        is_static: has_token(m, "static"),
                    },
                    m,
                ))
            }
            "field_definition" | "public_field_definition" => {
                let name = m
                    .child_by_field_name("property")
                    .or_else(|| m.child_by_field_name("name"))?;
                let (key, computed) = self.lower_property_key(name);
                let type_annotation = m
                    .child_by_field_name("type")
                    .and_then(|t| self.lower_type_refs(t));
                let value = m
                    .child_by_field_name("value")
                    .map(|v| self.lower_expression(v));
                Some(self.push(
                    NodeKind::PropertyDefinition {
                        key,
                        value,
                        computed,
                        is_static: has_token(m, "static"),
                        type_annotation,
                    },
                    m,
                ))
            }
            "class_static_block" => {
                let body = m
                    .child_by_field_name("body")
                    .map(|b| self.lower_statements(b))
                    .unwrap_or_default();
                Some(self.push(NodeKind::StaticBlock { body }, m))
            }
            _ => None,
        }
    }

    fn lower_property_key(&mut self, ts: TsNode<'_>) -> (NodeId, bool) {
        match ts.kind() {
            "computed_property_name" => (self.first_expr(ts), true),
            "property_identifier"
            | "identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "type_identifier" => (self.push_identifier(ts), false),
            "private_property_identifier" => (self.lower_private_name(ts), false),
            "string" => (self.lower_string(ts), false),
            "number" => (self.lower_number(ts), false),
            _ => (self.lower_expression(ts), false),
        }
    }

    fn lower_private_name(&mut self, ts: TsNode<'_>) -> NodeId {
        let name = self.text(ts).trim_start_matches('#').to_string();
        self.push(NodeKind::PrivateName { name }, ts)
    }

    // ---- objects, arrays, patterns ----

    fn lower_object(&mut self, ts: TsNode<'_>) -> NodeId {
        let mut properties = Vec::new();
        for child in named(ts) {
            let prop = match child.kind() {
                "pair" => {
                    let (key, computed) = match child.child_by_field_name("key") {
                        Some(k) => self.lower_property_key(k),
                        None => (self.missing(child), false),
                    };
                    let value = self.expr_field(child, "value");
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed,
                            shorthand: false,
                            method: false,
                        },
                        child,
                    )
                }
                "shorthand_property_identifier" => {
                    let key = self.push_identifier(child);
                    let value = self.push_identifier(child);
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed: false,
                            shorthand: true,
                            method: false,
                        },
                        child,
                    )
                }
                "method_definition" => {
                    let (key, computed) = match child.child_by_field_name("name") {
                        Some(n) => self.lower_property_key(n),
                        None => (self.missing(child), false),
                    };
                    let kind = Self::accessor_kind(child);
                    let function = self.lower_function(child);
                    let value = self.push(NodeKind::FunctionExpression(function), child);
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind,
                            computed,
                            shorthand: false,
                            method: kind == PropertyKind::Init,
                        },
                        child,
                    )
                }
                _ => self.lower_expression(child),
            };
            properties.push(prop);
        }
        self.push(NodeKind::ObjectExpression { properties }, ts)
    }

    fn lower_object_pattern(&mut self, ts: TsNode<'_>) -> NodeId {
        let mut properties = Vec::new();
        for child in named(ts) {
            let prop = match child.kind() {
                "pair_pattern" => {
                    let (key, computed) = match child.child_by_field_name("key") {
                        Some(k) => self.lower_property_key(k),
                        None => (self.missing(child), false),
                    };
                    let value = match child.child_by_field_name("value") {
                        Some(v) => self.lower_pattern(v),
                        None => self.missing(child),
                    };
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed,
                            shorthand: false,
                            method: false,
                        },
                        child,
                    )
                }
                "shorthand_property_identifier_pattern" => {
                    let key = self.push_identifier(child);
                    let value = self.push_identifier(child);
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed: false,
                            shorthand: true,
                            method: false,
                        },
                        child,
                    )
                }
                "object_assignment_pattern" => {
                    let left_ts = child.child_by_field_name("left");
                    let (key, left) = match left_ts {
                        Some(l) if matches!(
                            l.kind(),
                            "shorthand_property_identifier_pattern" | "identifier"
                        ) =>
                        {
                            (self.push_identifier(l), self.push_identifier(l))
                        }
                        Some(l) => (self.missing(l), self.lower_pattern(l)),
                        None => (self.missing(child), self.missing(child)),
                    };
                    let right = self.expr_field(child, "right");
                    let value = self.push(NodeKind::AssignmentPattern { left, right }, child);
                    self.push(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed: false,
                            shorthand: true,
                            method: false,
                        },
                        child,
                    )
                }
                _ => self.lower_pattern(child),
            };
            properties.push(prop);
        }
        self.push(NodeKind::ObjectPattern { properties }, ts)
    }

    /// Array elements in order; a `None` entry marks a hole between commas.
    fn lower_elements(&mut self, ts: TsNode<'_>, pattern: bool) -> Vec<Option<NodeId>> {
        let mut elements = Vec::new();
        let mut pending = true;
        for child in all_children(ts) {
            match child.kind() {
                "[" | "]" | "comment" => {}
                "," => {
                    if pending {
                        elements.push(None);
                    }
                    pending = true;
                }
                _ => {
                    let id = if pattern {
                        self.lower_pattern(child)
                    } else {
                        self.lower_expression(child)
                    };
                    elements.push(Some(id));
                    pending = false;
                }
            }
        }
        elements
    }

    fn lower_pattern(&mut self, ts: TsNode<'_>) -> NodeId {
        ensure_stack(|| self.lower_pattern_node(ts))
    }

    fn lower_pattern_node(&mut self, ts: TsNode<'_>) -> NodeId {
        match ts.kind() {
            "identifier" | "shorthand_property_identifier_pattern" | "undefined" => {
                self.push_identifier(ts)
            }
            "object_pattern" => self.lower_object_pattern(ts),
            "array_pattern" => {
                let elements = self.lower_elements(ts, true);
                self.push(NodeKind::ArrayPattern { elements }, ts)
            }
            "assignment_pattern" => {
                let left = match ts.child_by_field_name("left") {
                    Some(l) => self.lower_pattern(l),
                    None => self.missing(ts),
                };
                let right = self.expr_field(ts, "right");
                self.push(NodeKind::AssignmentPattern { left, right }, ts)
            }
            "rest_pattern" => {
                let argument = match first_named(ts) {
                    Some(a) => self.lower_pattern(a),
                    None => self.missing(ts),
                };
                self.push(NodeKind::RestElement { argument }, ts)
            }
            "parenthesized_expression" => match first_named(ts) {
                Some(inner) => self.lower_pattern(inner),
                None => self.missing(ts),
            },
            _ => self.lower_expression(ts),
        }
    }

    // ---- expressions ----

    fn lower_expression(&mut self, ts: TsNode<'_>) -> NodeId {
        ensure_stack(|| self.lower_expression_node(ts))
    }

    fn lower_expression_node(&mut self, ts: TsNode<'_>) -> NodeId {
        let kind = match ts.kind() {
            "member_expression" | "subscript_expression" | "call_expression"
                if chain_has_optional(ts) =>
            {
                let expression = self.lower_chain_element(ts);
                NodeKind::ChainExpression { expression }
            }
            "member_expression" | "subscript_expression" | "call_expression" => {
                return self.lower_chain_element(ts)
            }
            "identifier" | "undefined" => return self.push_identifier(ts),
            "this" => NodeKind::ThisExpression,
            "super" => NodeKind::Super,
            "number" => return self.lower_number(ts),
            "string" => return self.lower_string(ts),
            "template_string" => return self.lower_template(ts),
            "regex" => NodeKind::Literal {
                value: LiteralValue::RegExp {
                    pattern: ts
                        .child_by_field_name("pattern")
                        .map(|p| self.text(p).to_string())
                        .unwrap_or_default(),
                    flags: ts
                        .child_by_field_name("flags")
                        .map(|f| self.text(f).to_string())
                        .unwrap_or_default(),
                },
            },
            "true" => NodeKind::Literal {
                value: LiteralValue::Boolean(true),
            },
            "false" => NodeKind::Literal {
                value: LiteralValue::Boolean(false),
            },
            "null" => NodeKind::Literal {
                value: LiteralValue::Null,
            },
            "object" => return self.lower_object(ts),
            "object_pattern" | "array_pattern" | "assignment_pattern" | "rest_pattern" => {
                return self.lower_pattern(ts)
            }
            "array" => NodeKind::ArrayExpression {
                elements: self.lower_elements(ts, false),
            },
            "function_expression" | "function" | "generator_function" => {
                NodeKind::FunctionExpression(self.lower_function(ts))
            }
            "arrow_function" => NodeKind::ArrowFunctionExpression(self.lower_function(ts)),
            "class" => NodeKind::ClassExpression(self.lower_class(ts)),
            "new_expression" => NodeKind::NewExpression {
                callee: self.expr_field(ts, "constructor"),
                arguments: ts
                    .child_by_field_name("arguments")
                    .map(|a| self.lower_arguments(a))
                    .unwrap_or_default(),
            },
            "assignment_expression" | "augmented_assignment_expression" => {
                let operator = ts
                    .child_by_field_name("operator")
                    .map(|op| op.kind().to_string())
                    .unwrap_or_else(|| "=".to_string());
                let left = match ts.child_by_field_name("left") {
                    Some(l) => self.lower_pattern(l),
                    None => self.missing(ts),
                };
                let right = self.expr_field(ts, "right");
                NodeKind::AssignmentExpression {
                    operator,
                    left,
                    right,
                }
            }
            "unary_expression" => NodeKind::UnaryExpression {
                operator: ts
                    .child_by_field_name("operator")
                    .map(|op| op.kind().to_string())
                    .unwrap_or_default(),
                argument: self.expr_field(ts, "argument"),
            },
            "update_expression" => {
                let operator_ts = ts.child_by_field_name("operator");
                let argument_ts = ts.child_by_field_name("argument");
                let prefix = match (operator_ts, argument_ts) {
                    (Some(op), Some(arg)) => op.start_byte() < arg.start_byte(),
                    _ => false,
                };
                NodeKind::UpdateExpression {
                    operator: operator_ts.map(|op| op.kind().to_string()).unwrap_or_default(),
                    argument: self.expr_field(ts, "argument"),
                    prefix,
                }
            }
            "binary_expression" => {
                let operator = ts
                    .child_by_field_name("operator")
                    .map(|op| op.kind().to_string())
                    .unwrap_or_default();
                let left = self.expr_field(ts, "left");
                let right = self.expr_field(ts, "right");
                if matches!(operator.as_str(), "&&" | "||" | "??") {
                    NodeKind::LogicalExpression {
                        operator,
                        left,
                        right,
                    }
                } else {
                    NodeKind::BinaryExpression {
                        operator,
                        left,
                        right,
                    }
                }
            }
            "ternary_expression" => NodeKind::ConditionalExpression {
                test: self.expr_field(ts, "condition"),
                consequent: self.expr_field(ts, "consequence"),
                alternate: self.expr_field(ts, "alternative"),
            },
            "sequence_expression" => {
                let mut expressions = Vec::new();
                self.flatten_sequence(ts, &mut expressions);
                NodeKind::SequenceExpression { expressions }
            }
            "parenthesized_expression" => {
                return match named(ts)
                    .into_iter()
                    .find(|c| c.kind() != "type_annotation")
                {
                    Some(inner) => self.lower_expression(inner),
                    None => self.missing(ts),
                };
            }
            "await_expression" => NodeKind::AwaitExpression {
                argument: self.first_expr(ts),
            },
            "yield_expression" => NodeKind::YieldExpression {
                argument: first_named(ts).map(|a| self.lower_expression(a)),
                delegate: has_token(ts, "*"),
            },
            "spread_element" => NodeKind::SpreadElement {
                argument: self.first_expr(ts),
            },
            "meta_property" => {
                let text = self.text(ts);
                let (meta, property) = text.split_once('.').unwrap_or((text, ""));
                NodeKind::MetaProperty {
                    meta: meta.trim().to_string(),
                    property: property.trim().to_string(),
                }
            }
            "as_expression" | "satisfies_expression" | "non_null_expression" | "type_assertion" => {
                let kids = named(ts);
                let (expr_ts, type_ts) = if ts.kind() == "type_assertion" {
                    (kids.get(1).copied(), kids.first().copied())
                } else {
                    (kids.first().copied(), kids.get(1).copied())
                };
                let expression = match expr_ts {
                    Some(e) => self.lower_expression(e),
                    None => self.missing(ts),
                };
                let annotation = type_ts.and_then(|t| self.lower_type_refs(t));
                NodeKind::TsTypeWrapper {
                    expression,
                    annotation,
                }
            }
            "private_property_identifier" => return self.lower_private_name(ts),
            "property_identifier"
            | "shorthand_property_identifier"
            | "statement_identifier"
            | "type_parameters" => NodeKind::Unsupported {
                ts_kind: ts.kind().to_string(),
                children: Vec::new(),
            },
            kind if kind.starts_with("jsx_") => {
                let mut children = Vec::new();
                self.collect_jsx(ts, &mut children);
                NodeKind::Unsupported {
                    ts_kind: kind.to_string(),
                    children,
                }
            }
            kind if is_type_kind(kind) => {
                return match self.lower_type_refs(ts) {
                    Some(annotation) => annotation,
                    None => self.missing(ts),
                };
            }
            "internal_module" => return self.lower_statement(ts),
            _ => return self.lower_unsupported(ts),
        };
        self.push(kind, ts)
    }

    /// Lower one link of a member/call chain without adding a `ChainExpression` wrapper.
    fn lower_chain_element(&mut self, ts: TsNode<'_>) -> NodeId {
        ensure_stack(|| self.lower_chain_link(ts))
    }

    fn lower_chain_link(&mut self, ts: TsNode<'_>) -> NodeId {
        let kind = match ts.kind() {
            "member_expression" => {
                let object = match ts.child_by_field_name("object") {
                    Some(o) => self.lower_chain_element(o),
                    None => self.missing(ts),
                };
                let property = match ts.child_by_field_name("property") {
                    Some(p) if p.kind() == "private_property_identifier" => {
                        self.lower_private_name(p)
                    }
                    Some(p) => self.push_identifier(p),
                    None => self.missing(ts),
                };
                NodeKind::MemberExpression {
                    object,
                    property,
                    computed: false,
                    optional: is_optional_link(ts),
                }
            }
            "subscript_expression" => {
                let object = match ts.child_by_field_name("object") {
                    Some(o) => self.lower_chain_element(o),
                    None => self.missing(ts),
                };
                let property = self.expr_field(ts, "index");
                NodeKind::MemberExpression {
                    object,
                    property,
                    computed: true,
                    optional: is_optional_link(ts),
                }
            }
            "call_expression" => self.lower_call(ts),
            _ => return self.lower_expression(ts),
        };
        self.push(kind, ts)
    }

    fn lower_call(&mut self, ts: TsNode<'_>) -> NodeKind {
        let function = ts.child_by_field_name("function");
        let arguments = ts.child_by_field_name("arguments");

        if let Some(template) = arguments.filter(|a| a.kind() == "template_string") {
            let tag = match function {
                Some(f) => self.lower_chain_element(f),
                None => self.missing(ts),
            };
            let quasi = self.lower_template(template);
            return NodeKind::TaggedTemplateExpression { tag, quasi };
        }
        if function.map(|f| f.kind()) == Some("import") {
            let source = arguments
                .and_then(first_named)
                .map(|s| self.lower_expression(s));
            return NodeKind::ImportExpression { source };
        }

        let callee = match function {
            Some(f) => self.lower_chain_element(f),
            None => self.missing(ts),
        };
        let arguments = arguments
            .map(|a| self.lower_arguments(a))
            .unwrap_or_default();
        NodeKind::CallExpression {
            callee,
            arguments,
            optional: is_optional_link(ts),
        }
    }

    fn lower_arguments(&mut self, ts: TsNode<'_>) -> Vec<NodeId> {
        named(ts)
            .into_iter()
            .map(|a| self.lower_expression(a))
            .collect()
    }

    fn flatten_sequence(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        ensure_stack(|| self.flatten_sequence_node(ts, out))
    }

    fn flatten_sequence_node(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        for child in named(ts) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, out);
            } else {
                out.push(self.lower_expression(child));
            }
        }
    }

    fn collect_jsx(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        ensure_stack(|| self.collect_jsx_node(ts, out))
    }

    fn collect_jsx_node(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        for child in named(ts) {
            match child.kind() {
                "jsx_expression" => {
                    for inner in named(child) {
                        out.push(self.lower_expression(inner));
                    }
                }
                kind if kind.starts_with("jsx_") => self.collect_jsx(child, out),
                _ => {}
            }
        }
    }

    // ---- literals ----

    fn lower_string(&mut self, ts: TsNode<'_>) -> NodeId {
        let value = cook_escapes(strip_quotes(self.text(ts)));
        self.push(
            NodeKind::Literal {
                value: LiteralValue::String(value),
            },
            ts,
        )
    }

    fn lower_number(&mut self, ts: TsNode<'_>) -> NodeId {
        let value = parse_number(self.text(ts));
        self.push(NodeKind::Literal { value }, ts)
    }

    fn lower_template(&mut self, ts: TsNode<'_>) -> NodeId {
        let end = ts.end_byte().saturating_sub(1);
        let mut cursor = ts.start_byte() + 1;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        for child in named(ts) {
            if child.kind() != "template_substitution" {
                continue;
            }
            quasis.push(cook_escapes(self.slice(cursor, child.start_byte())));
            let expression = self.first_expr(child);
            expressions.push(expression);
            cursor = child.end_byte();
        }
        quasis.push(cook_escapes(self.slice(cursor, end.max(cursor))));
        self.push(
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            },
            ts,
        )
    }

    // ---- type positions ----

    /// Collect identifier references from a type position into a `TypeAnnotation`.
    fn lower_type_refs(&mut self, ts: TsNode<'_>) -> Option<NodeId> {
        let mut references = Vec::new();
        self.collect_type_refs(ts, &mut references);
        (!references.is_empty()).then(|| self.push(NodeKind::TypeAnnotation { references }, ts))
    }

    fn collect_type_refs(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        ensure_stack(|| self.collect_type_refs_node(ts, out))
    }

    fn collect_type_refs_node(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        match ts.kind() {
            "type_identifier" => out.push(self.push_identifier(ts)),
            "nested_type_identifier" => {
                if let Some(module) = ts.child_by_field_name("module") {
                    self.collect_leftmost(module, out);
                }
            }
            "type_query" => {
                if let Some(target) = first_named(ts) {
                    self.collect_leftmost(target, out);
                }
            }
            "type_parameter" => {
                for field in ["constraint", "value"] {
                    if let Some(child) = ts.child_by_field_name(field) {
                        self.collect_type_refs(child, out);
                    }
                }
            }
            "property_identifier" | "identifier" => {}
            _ => {
                for child in named(ts) {
                    self.collect_type_refs(child, out);
                }
            }
        }
    }

    fn collect_leftmost(&mut self, ts: TsNode<'_>, out: &mut Vec<NodeId>) {
        match ts.kind() {
            "identifier" | "type_identifier" => out.push(self.push_identifier(ts)),
            _ => {
                if let Some(first) = first_named(ts) {
                    self.collect_leftmost(first, out);
                }
            }
        }
    }
}

fn strip_quotes(raw: &str) -> &str {
    if raw.len() < 2 {
        return "";
    }
    raw.get(1..raw.len() - 1).unwrap_or("")
}

fn push_code_point(out: &mut String, code: Option<u32>) {
    out.push(code.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
}

/// Decode JavaScript string escapes into the cooked value.
pub(crate) fn cook_escapes(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            break;
        };
        match esc {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, u32::from_str_radix(&hex, 16).ok());
            }
            'u' => {
                let code = if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    u32::from_str_radix(&hex, 16).ok()
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    u32::from_str_radix(&hex, 16).ok()
                };
                if let Some(high) = code.filter(|c| (0xD800..=0xDBFF).contains(c)) {
                    let mut look = chars.clone();
                    if look.next() == Some('\\') && look.next() == Some('u') {
                        let hex: String = look.by_ref().take(4).collect();
                        if let Some(low) = u32::from_str_radix(&hex, 16)
                            .ok()
                            .filter(|c| (0xDC00..=0xDFFF).contains(c))
                        {
                            let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            push_code_point(&mut out, Some(combined));
                            chars = look;
                            continue;
                        }
                    }
                }
                push_code_point(&mut out, code);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    out
}

/// Parse a numeric literal's source text.
pub(crate) fn parse_number(raw: &str) -> LiteralValue {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    if let Some(digits) = cleaned.strip_suffix('n') {
        return LiteralValue::BigInt(digits.to_string());
    }
    let lower = cleaned.to_ascii_lowercase();
    let radix = |digits: &str, radix: u32| {
        u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
    };
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        radix(hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        radix(oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        radix(bin, 2)
    } else if lower.len() > 1
        && lower.starts_with('0')
        && lower.bytes().all(|b| b.is_ascii_digit())
    {
        if lower.bytes().all(|b| b < b'8') {
            radix(&lower[1..], 8)
        } else {
            lower.parse::<f64>().ok()
        }
    } else {
        lower.parse::<f64>().ok()
    };
    LiteralValue::Number(value.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooks_common_escapes() {
        assert_eq!(cook_escapes(r"a\nb"), "a\nb");
        assert_eq!(cook_escapes(r"\x41B\u{43}"), "ABC");
        assert_eq!(cook_escapes(r"\uD83D\uDE00"), "\u{1F600}");
        assert_eq!(cook_escapes(r"it\'s"), "it's");
        assert_eq!(cook_escapes("line\\\ncontinued"), "linecontinued");
        assert_eq!(cook_escapes("plain"), "plain");
    }

    #[test]
    fn parses_numeric_forms() {
        assert_eq!(parse_number("42"), LiteralValue::Number(42.0));
        assert_eq!(parse_number("0x1F"), LiteralValue::Number(31.0));
        assert_eq!(parse_number("0b101"), LiteralValue::Number(5.0));
        assert_eq!(parse_number("0o17"), LiteralValue::Number(15.0));
        assert_eq!(parse_number("017"), LiteralValue::Number(15.0));
        assert_eq!(parse_number("1_000"), LiteralValue::Number(1000.0));
        assert_eq!(parse_number("1.5e3"), LiteralValue::Number(1500.0));
        assert_eq!(parse_number("10n"), LiteralValue::BigInt("10".to_string()));
    }
}
