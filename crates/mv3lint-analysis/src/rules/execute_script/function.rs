//! Locating the function value passed as `func`.

use crate::ast::accessor::{is_function_like, unwrap_chain};
use crate::ast::{NodeId, NodeKind};
use crate::scope::types::DefinitionKind;
use crate::scope::ScopeIndex;

/// Why a `func` value could not be traced to a local function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionError {
    /// The value is bound to an import.
    Imported,
    /// No binding, no function-valued definition, or not a function-shaped value.
    Unresolved,
}

/// Resolve the injected function from the `func` property value.
pub fn resolve_injected_function(
    index: &mut ScopeIndex<'_>,
    value: NodeId,
) -> Result<NodeId, FunctionError> {
    let ast = index.ast();
    let value = unwrap_chain(ast, value);
    if is_function_like(ast, value) {
        return Ok(value);
    }
    if !matches!(ast.kind(value), NodeKind::Identifier { .. }) {
        return Err(FunctionError::Unresolved);
    }

    let var = index
        .resolve_identifier(value, None)
        .ok_or(FunctionError::Unresolved)?;
    if index.is_imported(var) {
        return Err(FunctionError::Imported);
    }

    index
        .graph()
        .variable(var)
        .defs
        .iter()
        .find_map(|def| match def.kind {
            DefinitionKind::FunctionName if is_function_like(ast, def.node) => Some(def.node),
            DefinitionKind::Variable => match ast.kind(def.node) {
                NodeKind::VariableDeclarator {
                    init: Some(init), ..
                } if is_function_like(ast, *init) => Some(*init),
                _ => None,
            },
            _ => None,
        })
        .ok_or(FunctionError::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::parsers::{Language, ParserManager};
    use crate::scope::{ScopeManager, ScopeOptions};

    fn resolve(source: &str, name: &str) -> Result<String, FunctionError> {
        let parsed = ParserManager::new()
            .parse_as(source.as_bytes(), Language::JavaScript)
            .expect("parse");
        let ast = Ast::from_parse(&parsed, source);
        let scopes = ScopeManager::build(&ast, &ScopeOptions::default());
        let mut index = ScopeIndex::new(&ast, &scopes);
        let use_site = ast
            .pre_order(ast.root())
            .filter(|&id| ast.kind(id).identifier_name() == Some(name))
            .last()
            .expect("identifier");
        resolve_injected_function(&mut index, use_site).map(|f| ast.kind(f).name().to_string())
    }

    #[test]
    fn declarations_and_function_initializers() {
        assert_eq!(
            resolve("function f() {} use(f);", "f").as_deref(),
            Ok("FunctionDeclaration")
        );
        assert_eq!(
            resolve("const f = () => 1; use(f);", "f").as_deref(),
            Ok("ArrowFunctionExpression")
        );
        assert_eq!(
            resolve("let f = function () {}; use(f);", "f").as_deref(),
            Ok("FunctionExpression")
        );
    }

    #[test]
    fn failures() {
        assert_eq!(
            resolve("import { f } from './m.js'; use(f);", "f"),
            Err(FunctionError::Imported)
        );
        assert_eq!(resolve("const f = make(); use(f);", "f"), Err(FunctionError::Unresolved));
        assert_eq!(resolve("use(f);", "f"), Err(FunctionError::Unresolved));
        assert_eq!(
            resolve("function g(f) { use(f); }", "f"),
            Err(FunctionError::Unresolved)
        );
    }
}
