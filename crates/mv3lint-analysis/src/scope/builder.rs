//! ScopeManager — builds the scope graph for one file.
//!
//! Declarations are recorded while walking; references are resolved once the
//! walk is complete, so hoisted bindings are visible regardless of order.

use mv3lint_core::config::{LintConfig, SourceType};
use mv3lint_core::types::collections::{FxHashMap, SmallVec2};
use smallvec::smallvec;

use super::graph::ScopeGraph;
use super::types::{
    Definition, DefinitionKind, Reference, ReferenceFlag, ReferenceId, Scope, ScopeId, ScopeKind,
    Variable, VariableId,
};
use crate::ast::accessor::is_type_only_reference;
use crate::ast::{ensure_stack, Ast, Class, Function, NodeId, NodeKind, VariableKind};

/// Inputs to scope analysis that do not come from the source text.
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    pub source_type: SourceType,
    /// Names declared as ambient globals. They get a variable without definitions.
    pub globals: Vec<String>,
}

impl ScopeOptions {
    pub fn from_config(config: &LintConfig) -> Self {
        Self {
            source_type: config.effective_source_type(),
            globals: config.globals.clone(),
        }
    }
}

/// A built scope graph: scopes, variables, and references for one [`Ast`].
#[derive(Debug, Clone)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    references: Vec<Reference>,
    node_scopes: FxHashMap<NodeId, ScopeId>,
    innermost: Vec<ScopeId>,
    global: ScopeId,
}

impl ScopeManager {
    pub fn build(ast: &Ast, options: &ScopeOptions) -> Self {
        let mut builder = ScopeBuilder::new(ast, options.source_type);
        builder.visit_program(ast.root(), &options.globals);
        builder.resolve_references();
        let manager = builder.finish();
        tracing::trace!(
            scopes = manager.scopes.len(),
            variables = manager.variables.len(),
            references = manager.references.len(),
            "scope analysis complete"
        );
        manager
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId(i as u32), s))
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId(i as u32), v))
    }

    pub fn references(&self) -> impl Iterator<Item = (ReferenceId, &Reference)> {
        self.references
            .iter()
            .enumerate()
            .map(|(i, r)| (ReferenceId(i as u32), r))
    }
}

impl ScopeGraph for ScopeManager {
    fn global_scope(&self) -> ScopeId {
        self.global
    }

    fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.innermost.get(node.index()).copied()
    }

    fn acquire(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id.index()]
    }
}

struct ScopeBuilder<'a> {
    ast: &'a Ast,
    source_type: SourceType,
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    references: Vec<Reference>,
    node_scopes: FxHashMap<NodeId, ScopeId>,
    current: ScopeId,
}

impl<'a> ScopeBuilder<'a> {
    fn new(ast: &'a Ast, source_type: SourceType) -> Self {
        Self {
            ast,
            source_type,
            scopes: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
            node_scopes: FxHashMap::default(),
            current: ScopeId(0),
        }
    }

    fn finish(self) -> ScopeManager {
        let global = ScopeId(0);
        let mut innermost = vec![global; self.ast.len()];
        let mut stack = vec![(self.ast.root(), global)];
        while let Some((node, outer)) = stack.pop() {
            let scope = self.node_scopes.get(&node).copied().unwrap_or(outer);
            innermost[node.index()] = scope;
            stack.extend(self.ast.children(node).map(|child| (child, scope)));
        }
        ScopeManager {
            scopes: self.scopes,
            variables: self.variables,
            references: self.references,
            node_scopes: self.node_scopes,
            innermost,
            global,
        }
    }

    // ---- scope stack ----

    fn push_scope(&mut self, kind: ScopeKind, block: NodeId, upper: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            block,
            upper,
            child_scopes: Vec::new(),
            variables: Vec::new(),
            set: FxHashMap::default(),
            references: Vec::new(),
        });
        if let Some(parent) = upper {
            self.scopes[parent.index()].child_scopes.push(id);
        }
        id
    }

    fn enter_scope(&mut self, kind: ScopeKind, block: NodeId) -> ScopeId {
        let id = self.push_scope(kind, block, Some(self.current));
        if kind != ScopeKind::FunctionExpressionName {
            self.node_scopes.insert(block, id);
        }
        self.current = id;
        id
    }

    fn leave_scope(&mut self) {
        if let Some(upper) = self.scopes[self.current.index()].upper {
            self.current = upper;
        }
    }

    fn find_hoisting_scope(&self) -> ScopeId {
        let mut scope = self.current;
        loop {
            let data = &self.scopes[scope.index()];
            if data.kind.is_var_scope() {
                return scope;
            }
            match data.upper {
                Some(upper) => scope = upper,
                None => return scope,
            }
        }
    }

    // ---- declarations and references ----

    fn declare_symbol(&mut self, scope: ScopeId, name_node: NodeId, def: Definition) {
        let ast = self.ast;
        let Some(name) = ast.kind(name_node).identifier_name() else {
            return;
        };
        if let Some(&var) = self.scopes[scope.index()].set.get(name) {
            self.variables[var.index()].defs.push(def);
            return;
        }
        self.new_variable(scope, name, smallvec![def]);
    }

    fn declare_implicit(&mut self, scope: ScopeId, name: &str) {
        if !self.scopes[scope.index()].set.contains_key(name) {
            self.new_variable(scope, name, SmallVec2::new());
        }
    }

    fn new_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        defs: SmallVec2<Definition>,
    ) -> VariableId {
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(Variable {
            name: name.to_string(),
            scope,
            defs,
            references: Vec::new(),
        });
        let data = &mut self.scopes[scope.index()];
        data.variables.push(id);
        data.set.insert(name.to_string(), id);
        id
    }

    fn add_reference(&mut self, identifier: NodeId, flag: ReferenceFlag, init: bool) {
        let ast = self.ast;
        let type_only = is_type_only_reference(ast, identifier);
        let Some(name) = ast.kind(identifier).identifier_name() else {
            return;
        };
        let id = ReferenceId(self.references.len() as u32);
        self.references.push(Reference {
            identifier,
            name: name.to_string(),
            from: self.current,
            resolved: None,
            flag,
            init,
            type_only,
        });
        self.scopes[self.current.index()].references.push(id);
    }

    /// Declare every identifier bound by `pattern` in `target`.
    /// `write` carries the `init` flag of the write reference each binding gets, if any.
    fn declare_pattern(
        &mut self,
        pattern: NodeId,
        target: ScopeId,
        kind: DefinitionKind,
        def_node: NodeId,
        parent: Option<NodeId>,
        write: Option<bool>,
    ) {
        ensure_stack(|| self.declare_pattern_node(pattern, target, kind, def_node, parent, write))
    }

    fn declare_pattern_node(
        &mut self,
        pattern: NodeId,
        target: ScopeId,
        kind: DefinitionKind,
        def_node: NodeId,
        parent: Option<NodeId>,
        write: Option<bool>,
    ) {
        let ast = self.ast;
        match ast.kind(pattern) {
            NodeKind::Identifier { .. } => {
                self.declare_symbol(
                    target,
                    pattern,
                    Definition {
                        kind,
                        name: pattern,
                        node: def_node,
                        parent,
                    },
                );
                if let Some(init) = write {
                    self.add_reference(pattern, ReferenceFlag::Write, init);
                }
            }
            NodeKind::ObjectPattern { properties } => {
                for &prop in properties {
                    match ast.kind(prop) {
                        NodeKind::Property {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            if *computed {
                                self.visit(*key);
                            }
                            self.declare_pattern(*value, target, kind, def_node, parent, write);
                        }
                        _ => self.declare_pattern(prop, target, kind, def_node, parent, write),
                    }
                }
            }
            NodeKind::ArrayPattern { elements } => {
                for &element in elements.iter().flatten() {
                    self.declare_pattern(element, target, kind, def_node, parent, write);
                }
            }
            NodeKind::AssignmentPattern { left, right } => {
                let write = if kind == DefinitionKind::Parameter {
                    Some(true)
                } else {
                    write
                };
                self.declare_pattern(*left, target, kind, def_node, parent, write);
                self.visit(*right);
            }
            NodeKind::RestElement { argument } => {
                self.declare_pattern(*argument, target, kind, def_node, parent, write);
            }
            _ => self.visit(pattern),
        }
    }

    /// Record writes for the left-hand side of an assignment or `for-in/of` head.
    fn visit_assignment_target(&mut self, target: NodeId, flag: ReferenceFlag) {
        ensure_stack(|| self.visit_assignment_target_node(target, flag))
    }

    fn visit_assignment_target_node(&mut self, target: NodeId, flag: ReferenceFlag) {
        let ast = self.ast;
        match ast.kind(target) {
            NodeKind::Identifier { .. } => self.add_reference(target, flag, false),
            NodeKind::ObjectPattern { properties } => {
                for &prop in properties {
                    match ast.kind(prop) {
                        NodeKind::Property {
                            key,
                            value,
                            computed,
                            ..
                        } => {
                            if *computed {
                                self.visit(*key);
                            }
                            self.visit_assignment_target(*value, ReferenceFlag::Write);
                        }
                        _ => self.visit_assignment_target(prop, ReferenceFlag::Write),
                    }
                }
            }
            NodeKind::ArrayPattern { elements } => {
                for &element in elements.iter().flatten() {
                    self.visit_assignment_target(element, ReferenceFlag::Write);
                }
            }
            NodeKind::AssignmentPattern { left, right } => {
                self.visit_assignment_target(*left, ReferenceFlag::Write);
                self.visit(*right);
            }
            NodeKind::RestElement { argument } => {
                self.visit_assignment_target(*argument, ReferenceFlag::Write)
            }
            NodeKind::TsTypeWrapper {
                expression,
                annotation,
            } => {
                self.visit_assignment_target(*expression, flag);
                if let Some(annotation) = annotation {
                    self.visit(*annotation);
                }
            }
            _ => self.visit(target),
        }
    }

    // ---- traversal ----

    fn visit_program(&mut self, root: NodeId, globals: &[String]) {
        let global = self.push_scope(ScopeKind::Global, root, None);
        self.current = global;
        for name in globals {
            self.declare_implicit(global, name);
        }
        if self.source_type == SourceType::Module {
            self.enter_scope(ScopeKind::Module, root);
        } else {
            self.node_scopes.insert(root, global);
        }
        if let NodeKind::Program { body } = self.ast.kind(root) {
            self.visit_all(body);
        }
    }

    fn visit_all(&mut self, nodes: &[NodeId]) {
        for &node in nodes {
            self.visit(node);
        }
    }

    fn visit(&mut self, node: NodeId) {
        ensure_stack(|| self.visit_node(node))
    }

    fn visit_node(&mut self, node: NodeId) {
        let ast = self.ast;
        match ast.kind(node) {
            NodeKind::Identifier { .. } => {
                self.add_reference(node, ReferenceFlag::Read, false)
            }
            NodeKind::FunctionDeclaration(f) => {
                if let Some(id) = f.id {
                    let scope = self.current;
                    self.declare_symbol(
                        scope,
                        id,
                        Definition {
                            kind: DefinitionKind::FunctionName,
                            name: id,
                            node,
                            parent: None,
                        },
                    );
                }
                self.visit_function(node, f);
            }
            NodeKind::FunctionExpression(f) | NodeKind::ArrowFunctionExpression(f) => {
                self.visit_function(node, f)
            }
            NodeKind::ClassDeclaration(c) => {
                if let Some(id) = c.id {
                    let scope = self.current;
                    self.declare_symbol(
                        scope,
                        id,
                        Definition {
                            kind: DefinitionKind::ClassName,
                            name: id,
                            node,
                            parent: None,
                        },
                    );
                }
                self.visit_class(node, c);
            }
            NodeKind::ClassExpression(c) => self.visit_class(node, c),
            NodeKind::VariableDeclaration { kind, declarations } => {
                self.visit_variable_declaration(node, *kind, declarations)
            }
            NodeKind::BlockStatement { body } => {
                self.enter_scope(ScopeKind::Block, node);
                self.visit_all(body);
                self.leave_scope();
            }
            NodeKind::StaticBlock { body } => {
                self.enter_scope(ScopeKind::ClassStaticBlock, node);
                self.visit_all(body);
                self.leave_scope();
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let lexical = init.is_some_and(|i| {
                    matches!(
                        ast.kind(i),
                        NodeKind::VariableDeclaration { kind, .. } if kind.is_lexical()
                    )
                });
                if lexical {
                    self.enter_scope(ScopeKind::For, node);
                }
                for part in [*init, *test, *update].into_iter().flatten() {
                    self.visit(part);
                }
                self.visit(*body);
                if lexical {
                    self.leave_scope();
                }
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement {
                left, right, body, ..
            } => self.visit_for_in(node, *left, *right, *body),
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.visit(*discriminant);
                self.enter_scope(ScopeKind::Switch, node);
                self.visit_all(cases);
                self.leave_scope();
            }
            NodeKind::CatchClause { param, body } => {
                let scope = self.enter_scope(ScopeKind::Catch, node);
                if let Some(param) = param {
                    self.declare_pattern(
                        *param,
                        scope,
                        DefinitionKind::CatchClause,
                        node,
                        None,
                        None,
                    );
                }
                self.visit(*body);
                self.leave_scope();
            }
            NodeKind::WithStatement { object, body } => {
                self.visit(*object);
                self.enter_scope(ScopeKind::With, node);
                self.visit(*body);
                self.leave_scope();
            }
            NodeKind::ImportDeclaration { specifiers, .. } => {
                let scope = self.current;
                for &spec in specifiers {
                    let local = match ast.kind(spec) {
                        NodeKind::ImportSpecifier { local, .. }
                        | NodeKind::ImportDefaultSpecifier { local }
                        | NodeKind::ImportNamespaceSpecifier { local } => *local,
                        _ => continue,
                    };
                    self.declare_symbol(
                        scope,
                        local,
                        Definition {
                            kind: DefinitionKind::ImportBinding,
                            name: local,
                            node: spec,
                            parent: Some(node),
                        },
                    );
                }
            }
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                if let Some(declaration) = declaration {
                    self.visit(*declaration);
                }
                if source.is_none() {
                    for &spec in specifiers {
                        if let NodeKind::ExportSpecifier { local, .. } = ast.kind(spec) {
                            self.add_reference(*local, ReferenceFlag::Read, false);
                        }
                    }
                }
            }
            NodeKind::TypeDeclaration { id, annotation, .. } => {
                let scope = self.current;
                self.declare_symbol(
                    scope,
                    *id,
                    Definition {
                        kind: DefinitionKind::TypeName,
                        name: *id,
                        node,
                        parent: None,
                    },
                );
                if let Some(annotation) = annotation {
                    self.visit(*annotation);
                }
            }
            NodeKind::TsModuleDeclaration { id, body } => {
                if let Some(id) = id {
                    let scope = self.current;
                    self.declare_symbol(
                        scope,
                        *id,
                        Definition {
                            kind: DefinitionKind::NamespaceName,
                            name: *id,
                            node,
                            parent: None,
                        },
                    );
                }
                self.enter_scope(ScopeKind::TsModule, node);
                self.visit_all(body);
                self.leave_scope();
            }
            NodeKind::TsImportEquals { id, reference, .. } => {
                let scope = self.current;
                self.declare_symbol(
                    scope,
                    *id,
                    Definition {
                        kind: DefinitionKind::ImportBinding,
                        name: *id,
                        node,
                        parent: None,
                    },
                );
                if let Some(reference) = reference {
                    self.add_reference(*reference, ReferenceFlag::Read, false);
                }
            }
            NodeKind::TsDeclareFunction { id, annotation } => {
                let scope = self.current;
                self.declare_symbol(
                    scope,
                    *id,
                    Definition {
                        kind: DefinitionKind::FunctionName,
                        name: *id,
                        node,
                        parent: None,
                    },
                );
                if let Some(annotation) = annotation {
                    self.visit(*annotation);
                }
            }
            NodeKind::TypeAnnotation { references } => {
                for &reference in references {
                    self.add_reference(reference, ReferenceFlag::Read, false);
                }
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                self.visit(*object);
                if *computed {
                    self.visit(*property);
                }
            }
            NodeKind::Property {
                key,
                value,
                computed,
                ..
            }
            | NodeKind::MethodDefinition {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.visit(*key);
                }
                self.visit(*value);
            }
            NodeKind::PropertyDefinition {
                key,
                value,
                computed,
                type_annotation,
                ..
            } => {
                if *computed {
                    self.visit(*key);
                }
                for part in [*type_annotation, *value].into_iter().flatten() {
                    self.visit(part);
                }
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                let flag = if operator == "=" {
                    ReferenceFlag::Write
                } else {
                    ReferenceFlag::ReadWrite
                };
                self.visit_assignment_target(*left, flag);
                self.visit(*right);
            }
            NodeKind::UpdateExpression { argument, .. } => {
                self.visit_assignment_target(*argument, ReferenceFlag::ReadWrite)
            }
            NodeKind::ObjectPattern { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::AssignmentPattern { .. }
            | NodeKind::RestElement { .. } => {
                self.visit_assignment_target(node, ReferenceFlag::Write)
            }
            NodeKind::ImportSpecifier { .. }
            | NodeKind::ImportDefaultSpecifier { .. }
            | NodeKind::ImportNamespaceSpecifier { .. }
            | NodeKind::ExportSpecifier { .. }
            | NodeKind::ExportAllDeclaration { .. }
            | NodeKind::PrivateName { .. }
            | NodeKind::MetaProperty { .. } => {}
            _ => {
                for child in ast.children(node) {
                    self.visit(child);
                }
            }
        }
    }

    fn visit_function(&mut self, node: NodeId, f: &'a Function) {
        let ast = self.ast;
        let named_expression = matches!(ast.kind(node), NodeKind::FunctionExpression(_))
            && f.id.is_some();
        if named_expression {
            let scope = self.enter_scope(ScopeKind::FunctionExpressionName, node);
            if let Some(id) = f.id {
                self.declare_symbol(
                    scope,
                    id,
                    Definition {
                        kind: DefinitionKind::FunctionName,
                        name: id,
                        node,
                        parent: None,
                    },
                );
            }
        }

        let scope = self.enter_scope(ScopeKind::Function, node);
        if !matches!(ast.kind(node), NodeKind::ArrowFunctionExpression(_)) {
            self.declare_implicit(scope, "arguments");
        }
        for &param in &f.params {
            self.declare_pattern(param, scope, DefinitionKind::Parameter, node, None, None);
        }
        self.visit_all(&f.type_annotations);
        match ast.kind(f.body) {
            NodeKind::BlockStatement { body } => self.visit_all(body),
            _ => self.visit(f.body),
        }
        self.leave_scope();

        if named_expression {
            self.leave_scope();
        }
    }

    fn visit_class(&mut self, node: NodeId, c: &'a Class) {
        let scope = self.enter_scope(ScopeKind::Class, node);
        if let Some(id) = c.id {
            self.declare_symbol(
                scope,
                id,
                Definition {
                    kind: DefinitionKind::ClassName,
                    name: id,
                    node,
                    parent: None,
                },
            );
        }
        if let Some(super_class) = c.super_class {
            self.visit(super_class);
        }
        self.visit_all(&c.type_annotations);
        self.visit_all(&c.body);
        self.leave_scope();
    }

    fn visit_variable_declaration(
        &mut self,
        node: NodeId,
        kind: VariableKind,
        declarations: &'a [NodeId],
    ) {
        let ast = self.ast;
        let target = if kind.is_lexical() {
            self.current
        } else {
            self.find_hoisting_scope()
        };
        for &decl in declarations {
            let NodeKind::VariableDeclarator {
                id,
                init,
                type_annotation,
            } = ast.kind(decl)
            else {
                self.visit(decl);
                continue;
            };
            let write = init.map(|_| true);
            self.declare_pattern(*id, target, DefinitionKind::Variable, decl, Some(node), write);
            if let Some(annotation) = type_annotation {
                self.visit(*annotation);
            }
            if let Some(init) = init {
                self.visit(*init);
            }
        }
    }

    fn visit_for_in(&mut self, node: NodeId, left: NodeId, right: NodeId, body: NodeId) {
        let ast = self.ast;
        match ast.kind(left) {
            NodeKind::VariableDeclaration { kind, declarations } => {
                if kind.is_lexical() {
                    self.enter_scope(ScopeKind::For, node);
                }
                let target = if kind.is_lexical() {
                    self.current
                } else {
                    self.find_hoisting_scope()
                };
                for &decl in declarations {
                    if let NodeKind::VariableDeclarator { id, .. } = ast.kind(decl) {
                        self.declare_pattern(
                            *id,
                            target,
                            DefinitionKind::Variable,
                            decl,
                            Some(left),
                            Some(true),
                        );
                    }
                }
                self.visit(right);
                self.visit(body);
                if kind.is_lexical() {
                    self.leave_scope();
                }
            }
            _ => {
                self.visit_assignment_target(left, ReferenceFlag::Write);
                self.visit(right);
                self.visit(body);
            }
        }
    }

    // ---- resolution ----

    fn resolve_references(&mut self) {
        for index in 0..self.references.len() {
            let resolved = {
                let reference = &self.references[index];
                self.lookup(reference.from, &reference.name)
            };
            let Some(var) = resolved.filter(|&v| self.statically_resolvable(v)) else {
                continue;
            };
            self.references[index].resolved = Some(var);
            self.variables[var.index()]
                .references
                .push(ReferenceId(index as u32));
        }
    }

    fn lookup(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.index()];
            if let Some(&var) = data.set.get(name) {
                return Some(var);
            }
            current = data.upper;
        }
        None
    }

    /// In script code the global scope is dynamic: only `let`/`const`/class
    /// bindings there resolve statically. Ambient globals always resolve.
    fn statically_resolvable(&self, var: VariableId) -> bool {
        let variable = &self.variables[var.index()];
        if self.source_type != SourceType::Script
            || self.scopes[variable.scope.index()].kind != ScopeKind::Global
            || variable.defs.is_empty()
        {
            return true;
        }
        variable.defs.iter().all(|def| match def.kind {
            DefinitionKind::ClassName => true,
            DefinitionKind::Variable => def.parent.is_some_and(|p| {
                matches!(
                    self.ast.kind(p),
                    NodeKind::VariableDeclaration { kind, .. } if kind.is_lexical()
                )
            }),
            _ => false,
        })
    }
}
