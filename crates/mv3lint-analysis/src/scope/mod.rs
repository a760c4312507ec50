//! Lexical scope analysis.
//!
//! [`ScopeManager::build`] walks an [`Ast`](crate::ast::Ast) once and produces
//! the scope tree, the variables each scope declares, and every identifier
//! reference with its resolution. Consumers read it through [`ScopeGraph`]
//! and memoize lookups with [`ScopeIndex`].

pub mod builder;
pub mod graph;
pub mod index;
pub mod types;

pub use builder::{ScopeManager, ScopeOptions};
pub use graph::ScopeGraph;
pub use index::ScopeIndex;
pub use types::{
    Definition, DefinitionKind, Reference, ReferenceFlag, ReferenceId, Scope, ScopeId, ScopeKind,
    Variable, VariableId,
};
