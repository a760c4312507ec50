//! Child enumeration and pre-order traversal.

use smallvec::SmallVec;

use super::{Ast, Class, Function, NodeId, NodeKind};

pub type Children = smallvec::IntoIter<[NodeId; 4]>;

fn push_function(out: &mut SmallVec<[NodeId; 4]>, f: &Function) {
    out.extend(f.id);
    out.extend(f.params.iter().copied());
    out.extend(f.type_annotations.iter().copied());
    out.push(f.body);
}

fn push_class(out: &mut SmallVec<[NodeId; 4]>, c: &Class) {
    out.extend(c.id);
    out.extend(c.super_class);
    out.extend(c.type_annotations.iter().copied());
    out.extend(c.body.iter().copied());
}

pub(super) fn children_of(kind: &NodeKind) -> Children {
    let mut out: SmallVec<[NodeId; 4]> = SmallVec::new();
    match kind {
        NodeKind::Program { body }
        | NodeKind::BlockStatement { body }
        | NodeKind::StaticBlock { body } => out.extend(body.iter().copied()),
        NodeKind::ExpressionStatement { expression } => out.push(*expression),
        NodeKind::ReturnStatement { argument } => out.extend(*argument),
        NodeKind::ThrowStatement { argument }
        | NodeKind::SpreadElement { argument }
        | NodeKind::RestElement { argument }
        | NodeKind::AwaitExpression { argument }
        | NodeKind::UnaryExpression { argument, .. }
        | NodeKind::UpdateExpression { argument, .. } => out.push(*argument),
        NodeKind::YieldExpression { argument, .. } => out.extend(*argument),
        NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            out.push(*test);
            out.push(*consequent);
            out.extend(*alternate);
        }
        NodeKind::SwitchStatement {
            discriminant,
            cases,
        } => {
            out.push(*discriminant);
            out.extend(cases.iter().copied());
        }
        NodeKind::SwitchCase { test, consequent } => {
            out.extend(*test);
            out.extend(consequent.iter().copied());
        }
        NodeKind::WhileStatement { test, body } => {
            out.push(*test);
            out.push(*body);
        }
        NodeKind::DoWhileStatement { body, test } => {
            out.push(*body);
            out.push(*test);
        }
        NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        } => {
            out.extend(*init);
            out.extend(*test);
            out.extend(*update);
            out.push(*body);
        }
        NodeKind::ForInStatement { left, right, body }
        | NodeKind::ForOfStatement {
            left, right, body, ..
        } => {
            out.push(*left);
            out.push(*right);
            out.push(*body);
        }
        NodeKind::LabeledStatement { body, .. } => out.push(*body),
        NodeKind::WithStatement { object, body } => {
            out.push(*object);
            out.push(*body);
        }
        NodeKind::TryStatement {
            block,
            handler,
            finalizer,
        } => {
            out.push(*block);
            out.extend(*handler);
            out.extend(*finalizer);
        }
        NodeKind::CatchClause { param, body } => {
            out.extend(*param);
            out.push(*body);
        }
        NodeKind::VariableDeclaration { declarations, .. } => {
            out.extend(declarations.iter().copied())
        }
        NodeKind::VariableDeclarator {
            id,
            init,
            type_annotation,
        } => {
            out.push(*id);
            out.extend(*type_annotation);
            out.extend(*init);
        }
        NodeKind::FunctionDeclaration(f)
        | NodeKind::FunctionExpression(f)
        | NodeKind::ArrowFunctionExpression(f) => push_function(&mut out, f),
        NodeKind::ClassDeclaration(c) | NodeKind::ClassExpression(c) => push_class(&mut out, c),
        NodeKind::ImportDeclaration { specifiers, .. } => out.extend(specifiers.iter().copied()),
        NodeKind::ImportSpecifier { local, .. }
        | NodeKind::ImportDefaultSpecifier { local }
        | NodeKind::ImportNamespaceSpecifier { local }
        | NodeKind::ExportSpecifier { local, .. } => out.push(*local),
        NodeKind::ExportNamedDeclaration {
            declaration,
            specifiers,
            ..
        } => {
            out.extend(*declaration);
            out.extend(specifiers.iter().copied());
        }
        NodeKind::ExportDefaultDeclaration { declaration } => out.push(*declaration),
        NodeKind::TypeDeclaration { id, annotation, .. } => {
            out.push(*id);
            out.extend(*annotation);
        }
        NodeKind::TsModuleDeclaration { id, body } => {
            out.extend(*id);
            out.extend(body.iter().copied());
        }
        NodeKind::TsImportEquals { id, reference, .. } => {
            out.push(*id);
            out.extend(*reference);
        }
        NodeKind::TsDeclareFunction { id, annotation } => {
            out.push(*id);
            out.extend(*annotation);
        }
        NodeKind::TemplateLiteral { expressions, .. } => out.extend(expressions.iter().copied()),
        NodeKind::TaggedTemplateExpression { tag, quasi } => {
            out.push(*tag);
            out.push(*quasi);
        }
        NodeKind::ArrayExpression { elements } | NodeKind::ArrayPattern { elements } => {
            out.extend(elements.iter().flatten().copied())
        }
        NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
            out.extend(properties.iter().copied())
        }
        NodeKind::Property { key, value, .. } | NodeKind::MethodDefinition { key, value, .. } => {
            out.push(*key);
            out.push(*value);
        }
        NodeKind::PropertyDefinition {
            key,
            value,
            type_annotation,
            ..
        } => {
            out.push(*key);
            out.extend(*type_annotation);
            out.extend(*value);
        }
        NodeKind::BinaryExpression { left, right, .. }
        | NodeKind::LogicalExpression { left, right, .. }
        | NodeKind::AssignmentExpression { left, right, .. }
        | NodeKind::AssignmentPattern { left, right } => {
            out.push(*left);
            out.push(*right);
        }
        NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            out.push(*test);
            out.push(*consequent);
            out.push(*alternate);
        }
        NodeKind::CallExpression {
            callee, arguments, ..
        }
        | NodeKind::NewExpression { callee, arguments } => {
            out.push(*callee);
            out.extend(arguments.iter().copied());
        }
        NodeKind::MemberExpression {
            object, property, ..
        } => {
            out.push(*object);
            out.push(*property);
        }
        NodeKind::ChainExpression { expression } => out.push(*expression),
        NodeKind::SequenceExpression { expressions } => out.extend(expressions.iter().copied()),
        NodeKind::ImportExpression { source } => out.extend(*source),
        NodeKind::TsTypeWrapper {
            expression,
            annotation,
        } => {
            out.push(*expression);
            out.extend(*annotation);
        }
        NodeKind::TypeAnnotation { references } => out.extend(references.iter().copied()),
        NodeKind::Unsupported { children, .. } => out.extend(children.iter().copied()),
        NodeKind::EmptyStatement
        | NodeKind::DebuggerStatement
        | NodeKind::BreakStatement { .. }
        | NodeKind::ContinueStatement { .. }
        | NodeKind::ExportAllDeclaration { .. }
        | NodeKind::Identifier { .. }
        | NodeKind::PrivateName { .. }
        | NodeKind::Literal { .. }
        | NodeKind::ThisExpression
        | NodeKind::Super
        | NodeKind::MetaProperty { .. } => {}
    }
    out.into_iter()
}

/// Depth-first pre-order iterator over node ids.
pub struct PreOrder<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl<'a> PreOrder<'a> {
    pub(super) fn new(ast: &'a Ast, start: NodeId) -> Self {
        Self {
            ast,
            stack: vec![start],
        }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children: SmallVec<[NodeId; 4]> = self.ast.children(id).collect();
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}
