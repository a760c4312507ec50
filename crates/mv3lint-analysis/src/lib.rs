//! mv3lint-analysis: static analysis for Manifest V3 script injection.
//!
//! Pipeline per file:
//! - Parsers: tree-sitter JavaScript / TypeScript front end
//! - AST: lowering of the concrete tree into an arena-backed ESTree-shaped tree
//! - Scope: lexical scope graph (scopes, variables, definitions, references)
//! - Rules: `mv3/no-execute-script-closure` and the rule registry
//! - Linter: orchestration, suppression, and reporting

pub mod ast;
pub mod linter;
pub mod parsers;
pub mod rules;
pub mod scope;

pub use ast::{Ast, Node, NodeId, NodeKind};
pub use linter::{LintReport, Linter};
pub use parsers::{Language, ParseResult, ParserManager};
pub use rules::{Diagnostic, DiagnosticKind, RuleRegistry};
pub use scope::{ScopeGraph, ScopeManager, ScopeOptions};
