//! TypeScript parser, covering both the plain and the TSX grammar.

use crate::parsers::language_detect::Language;
use crate::parsers::traits::LanguageParser;

#[derive(Debug, Default)]
pub struct TypeScriptParser;

impl LanguageParser for TypeScriptParser {
    fn languages(&self) -> &'static [Language] {
        &[Language::TypeScript, Language::Tsx]
    }

    fn grammar(&self, language: Language) -> tree_sitter::Language {
        match language {
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}
