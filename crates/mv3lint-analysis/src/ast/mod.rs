//! Arena-backed syntax tree, shaped after ESTree.
//!
//! Nodes live in a flat `Vec<Node>` and refer to each other by [`NodeId`].
//! Every node records its parent, its byte span, and its line/column range,
//! so analyses can walk up as well as down without borrowing the tree twice.

pub mod accessor;
pub mod lower;
mod visit;

use serde::Serialize;

use crate::parsers::types::Range;
use crate::parsers::{Language, ParseResult};

pub use visit::{Children, PreOrder};

/// Remaining stack below which recursive passes move onto a fresh segment.
const STACK_RED_ZONE: usize = 256 * 1024;
/// Size of each segment allocated once the red zone is reached.
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Run one level of a recursive tree pass, growing the stack on demand.
/// Recursion depth follows the input: long `+` chains, deep parentheses.
pub(crate) fn ensure_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// Index of a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte offsets into the source text, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub range: Range,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    BigInt(String),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    /// `let`/`const` bind in the enclosing block; `var` in the enclosing function.
    pub fn is_lexical(self) -> bool {
        !matches!(self, VariableKind::Var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclarationKind {
    Interface,
    TypeAlias,
    Enum,
}

/// Shared payload of function declarations, expressions, and arrows.
#[derive(Debug, Clone)]
pub struct Function {
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub body: NodeId,
    pub is_async: bool,
    pub is_generator: bool,
    /// Arrow function with an expression body.
    pub expression: bool,
    pub type_annotations: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Class {
    pub id: Option<NodeId>,
    pub super_class: Option<NodeId>,
    pub body: Vec<NodeId>,
    pub type_annotations: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Program {
        body: Vec<NodeId>,
    },

    // Statements
    ExpressionStatement {
        expression: NodeId,
    },
    BlockStatement {
        body: Vec<NodeId>,
    },
    EmptyStatement,
    DebuggerStatement,
    ReturnStatement {
        argument: Option<NodeId>,
    },
    ThrowStatement {
        argument: NodeId,
    },
    IfStatement {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    SwitchStatement {
        discriminant: NodeId,
        cases: Vec<NodeId>,
    },
    SwitchCase {
        test: Option<NodeId>,
        consequent: Vec<NodeId>,
    },
    WhileStatement {
        test: NodeId,
        body: NodeId,
    },
    DoWhileStatement {
        body: NodeId,
        test: NodeId,
    },
    ForStatement {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForInStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
    },
    ForOfStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
        is_await: bool,
    },
    LabeledStatement {
        label: String,
        body: NodeId,
    },
    BreakStatement {
        label: Option<String>,
    },
    ContinueStatement {
        label: Option<String>,
    },
    WithStatement {
        object: NodeId,
        body: NodeId,
    },
    TryStatement {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    CatchClause {
        param: Option<NodeId>,
        body: NodeId,
    },

    // Declarations
    VariableDeclaration {
        kind: VariableKind,
        declarations: Vec<NodeId>,
    },
    VariableDeclarator {
        id: NodeId,
        init: Option<NodeId>,
        type_annotation: Option<NodeId>,
    },
    FunctionDeclaration(Function),
    ClassDeclaration(Class),
    ImportDeclaration {
        specifiers: Vec<NodeId>,
        source: String,
        type_only: bool,
    },
    ImportSpecifier {
        local: NodeId,
        imported: String,
    },
    ImportDefaultSpecifier {
        local: NodeId,
    },
    ImportNamespaceSpecifier {
        local: NodeId,
    },
    ExportNamedDeclaration {
        declaration: Option<NodeId>,
        specifiers: Vec<NodeId>,
        source: Option<String>,
    },
    ExportSpecifier {
        local: NodeId,
        exported: String,
    },
    ExportDefaultDeclaration {
        declaration: NodeId,
    },
    ExportAllDeclaration {
        source: String,
    },
    /// TypeScript `interface`, `type` alias, or `enum`.
    TypeDeclaration {
        id: NodeId,
        kind: TypeDeclarationKind,
        annotation: Option<NodeId>,
    },
    /// TypeScript `namespace A.B { ... }` or `module A { ... }`. `id` is the
    /// leftmost name segment; string-named ambient modules have none.
    TsModuleDeclaration {
        id: Option<NodeId>,
        body: Vec<NodeId>,
    },
    /// TypeScript `import K = require('k')` (`source`) or `import K = N.x`
    /// (`reference` is the leftmost identifier of the entity name).
    TsImportEquals {
        id: NodeId,
        source: Option<String>,
        reference: Option<NodeId>,
    },
    /// Function signature without a body: `declare function f(): T;` and overloads.
    TsDeclareFunction {
        id: NodeId,
        annotation: Option<NodeId>,
    },

    // Expressions
    Identifier {
        name: String,
    },
    PrivateName {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
    TemplateLiteral {
        /// Cooked text of each quasi; always one more than `expressions`.
        quasis: Vec<String>,
        expressions: Vec<NodeId>,
    },
    TaggedTemplateExpression {
        tag: NodeId,
        quasi: NodeId,
    },
    ThisExpression,
    Super,
    ArrayExpression {
        /// `None` marks a hole (`[, a]`).
        elements: Vec<Option<NodeId>>,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        shorthand: bool,
        method: bool,
    },
    SpreadElement {
        argument: NodeId,
    },
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    ClassExpression(Class),
    MethodDefinition {
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        computed: bool,
        is_static: bool,
    },
    PropertyDefinition {
        key: NodeId,
        value: Option<NodeId>,
        computed: bool,
        is_static: bool,
        type_annotation: Option<NodeId>,
    },
    StaticBlock {
        body: Vec<NodeId>,
    },
    UnaryExpression {
        operator: String,
        argument: NodeId,
    },
    UpdateExpression {
        operator: String,
        argument: NodeId,
        prefix: bool,
    },
    BinaryExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    LogicalExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    AssignmentExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpression {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    CallExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
        optional: bool,
    },
    NewExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpression {
        object: NodeId,
        property: NodeId,
        computed: bool,
        optional: bool,
    },
    /// Wraps an optional chain (`a?.b.c()`); the inner expression carries the links.
    ChainExpression {
        expression: NodeId,
    },
    SequenceExpression {
        expressions: Vec<NodeId>,
    },
    AwaitExpression {
        argument: NodeId,
    },
    YieldExpression {
        argument: Option<NodeId>,
        delegate: bool,
    },
    MetaProperty {
        meta: String,
        property: String,
    },
    ImportExpression {
        source: Option<NodeId>,
    },
    /// TypeScript `as`, `satisfies`, `!`, and `<T>x` wrappers around a runtime expression.
    TsTypeWrapper {
        expression: NodeId,
        annotation: Option<NodeId>,
    },

    // Patterns
    ObjectPattern {
        properties: Vec<NodeId>,
    },
    ArrayPattern {
        elements: Vec<Option<NodeId>>,
    },
    AssignmentPattern {
        left: NodeId,
        right: NodeId,
    },
    RestElement {
        argument: NodeId,
    },

    /// Identifiers referenced from a type position. Each entry is an `Identifier` node.
    TypeAnnotation {
        references: Vec<NodeId>,
    },

    /// Syntax without a dedicated kind (JSX, error recovery, TS-only statements).
    /// Children are still lowered so references inside them stay visible.
    Unsupported {
        ts_kind: String,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// ESTree-style name of the kind, for logs and debugging.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::DebuggerStatement => "DebuggerStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::ForOfStatement { .. } => "ForOfStatement",
            NodeKind::LabeledStatement { .. } => "LabeledStatement",
            NodeKind::BreakStatement { .. } => "BreakStatement",
            NodeKind::ContinueStatement { .. } => "ContinueStatement",
            NodeKind::WithStatement { .. } => "WithStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::ImportSpecifier { .. } => "ImportSpecifier",
            NodeKind::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            NodeKind::ImportNamespaceSpecifier { .. } => "ImportNamespaceSpecifier",
            NodeKind::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            NodeKind::ExportSpecifier { .. } => "ExportSpecifier",
            NodeKind::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            NodeKind::ExportAllDeclaration { .. } => "ExportAllDeclaration",
            NodeKind::TypeDeclaration { .. } => "TypeDeclaration",
            NodeKind::TsModuleDeclaration { .. } => "TsModuleDeclaration",
            NodeKind::TsImportEquals { .. } => "TsImportEquals",
            NodeKind::TsDeclareFunction { .. } => "TsDeclareFunction",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::PrivateName { .. } => "PrivateName",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::Super => "Super",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::ClassExpression(_) => "ClassExpression",
            NodeKind::MethodDefinition { .. } => "MethodDefinition",
            NodeKind::PropertyDefinition { .. } => "PropertyDefinition",
            NodeKind::StaticBlock { .. } => "StaticBlock",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::ChainExpression { .. } => "ChainExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::AwaitExpression { .. } => "AwaitExpression",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::MetaProperty { .. } => "MetaProperty",
            NodeKind::ImportExpression { .. } => "ImportExpression",
            NodeKind::TsTypeWrapper { .. } => "TsTypeWrapper",
            NodeKind::ObjectPattern { .. } => "ObjectPattern",
            NodeKind::ArrayPattern { .. } => "ArrayPattern",
            NodeKind::AssignmentPattern { .. } => "AssignmentPattern",
            NodeKind::RestElement { .. } => "RestElement",
            NodeKind::TypeAnnotation { .. } => "TypeAnnotation",
            NodeKind::Unsupported { .. } => "Unsupported",
        }
    }

    /// The function payload, for the three function-like kinds.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            NodeKind::FunctionDeclaration(f)
            | NodeKind::FunctionExpression(f)
            | NodeKind::ArrowFunctionExpression(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            NodeKind::ClassDeclaration(c) | NodeKind::ClassExpression(c) => Some(c),
            _ => None,
        }
    }

    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }
}

/// A lowered source file.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    source: String,
    language: Language,
}

impl Ast {
    /// Lower a parsed file into the arena tree.
    pub fn from_parse(parse: &ParseResult, source: &str) -> Self {
        lower::lower_tree(&parse.tree, source, parse.language)
    }

    /// Lower a raw tree-sitter tree produced for `language`.
    pub fn from_tree(tree: &tree_sitter::Tree, source: &str, language: Language) -> Self {
        lower::lower_tree(tree, source, language)
    }

    /// Assemble a tree from pre-built nodes and fill in parent links.
    pub(crate) fn from_nodes(
        nodes: Vec<Node>,
        root: NodeId,
        source: String,
        language: Language,
    ) -> Self {
        let mut ast = Self {
            nodes,
            root,
            source,
            language,
        };
        ast.link_parents();
        ast
    }

    fn link_parents(&mut self) {
        for index in 0..self.nodes.len() {
            let id = NodeId::new(index);
            let children: Vec<NodeId> = self.children(id).collect();
            for child in children {
                self.nodes[child.index()].parent = Some(id);
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn range(&self, id: NodeId) -> Range {
        self.nodes[id.index()].range
    }

    /// Zero-based column of byte `offset` in UTF-16 code units, the unit
    /// ESLint and editors report. Tree-sitter columns count bytes.
    pub fn utf16_column(&self, offset: u32) -> u32 {
        let prefix = self.source.get(..offset as usize).unwrap_or(self.source.as_str());
        let line_start = prefix.rfind('\n').map_or(0, |newline| newline + 1);
        prefix
            .get(line_start..)
            .map_or(0, |line| line.encode_utf16().count() as u32)
    }

    /// Source text covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.nodes[id.index()].span;
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    /// Direct children in source order.
    pub fn children(&self, id: NodeId) -> Children {
        visit::children_of(self.kind(id))
    }

    /// Depth-first pre-order walk starting at `id` (inclusive).
    pub fn pre_order(&self, id: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, id)
    }

    /// All `CallExpression` nodes in document order.
    pub fn call_expressions(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pre_order(self.root)
            .filter(|&id| matches!(self.kind(id), NodeKind::CallExpression { .. }))
    }

    /// First node of the given ESTree kind name whose source text equals `text`.
    /// Intended for tests and tooling that need to point at a node.
    pub fn find_by_text(&self, kind: &str, text: &str) -> Option<NodeId> {
        self.pre_order(self.root)
            .find(|&id| self.kind(id).name() == kind && self.text(id) == text)
    }
}
