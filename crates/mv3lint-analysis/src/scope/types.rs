//! Scope graph data model.

use serde::Serialize;

use crate::ast::NodeId;
use mv3lint_core::types::collections::{FxHashMap, SmallVec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VariableId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReferenceId(pub(crate) u32);

macro_rules! index_id {
    ($($ty:ident),*) => {$(
        impl $ty {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    )*};
}

index_id!(ScopeId, VariableId, ReferenceId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    /// Holds the name of a named function expression, between the outer scope
    /// and the function's own scope.
    FunctionExpressionName,
    Block,
    For,
    Switch,
    Catch,
    Class,
    ClassStaticBlock,
    With,
    /// Body of a TypeScript `namespace` / `module` declaration.
    TsModule,
}

impl ScopeKind {
    /// Scopes that capture `var` declarations.
    pub fn is_var_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::ClassStaticBlock
                | ScopeKind::TsModule
        )
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Node that introduced the scope.
    pub block: NodeId,
    pub upper: Option<ScopeId>,
    pub child_scopes: Vec<ScopeId>,
    pub variables: Vec<VariableId>,
    pub set: FxHashMap<String, VariableId>,
    /// References that occur directly in this scope, in source order.
    pub references: Vec<ReferenceId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionKind {
    FunctionName,
    ClassName,
    Variable,
    Parameter,
    CatchClause,
    ImportBinding,
    TypeName,
    NamespaceName,
}

/// One syntactic site that binds a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// The binding identifier.
    pub name: NodeId,
    /// The declaring node: the function, class, declarator, import specifier, catch clause,
    /// or TypeScript declaration.
    pub node: NodeId,
    /// Enclosing declaration for declarators and import specifiers.
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    /// Empty for implicit bindings (`arguments`, configured globals).
    pub defs: SmallVec2<Definition>,
    pub references: Vec<ReferenceId>,
}

impl Variable {
    pub fn is_imported(&self) -> bool {
        self.defs
            .iter()
            .any(|d| d.kind == DefinitionKind::ImportBinding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceFlag {
    Read,
    Write,
    ReadWrite,
}

/// One occurrence of an identifier in expression (or type) position.
#[derive(Debug, Clone)]
pub struct Reference {
    pub identifier: NodeId,
    pub name: String,
    /// Scope the reference occurs in.
    pub from: ScopeId,
    pub resolved: Option<VariableId>,
    pub flag: ReferenceFlag,
    /// Write performed by the binding's own initializer (`const x = 1`).
    pub init: bool,
    pub type_only: bool,
}

impl Reference {
    pub fn is_read(&self) -> bool {
        matches!(self.flag, ReferenceFlag::Read | ReferenceFlag::ReadWrite)
    }

    pub fn is_write(&self) -> bool {
        matches!(self.flag, ReferenceFlag::Write | ReferenceFlag::ReadWrite)
    }
}
