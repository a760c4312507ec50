//! JavaScript parser. JSX is part of the grammar, so `.jsx` needs no dialect of its own.

use crate::parsers::language_detect::Language;
use crate::parsers::traits::LanguageParser;

#[derive(Debug, Default)]
pub struct JavaScriptParser;

impl LanguageParser for JavaScriptParser {
    fn languages(&self) -> &'static [Language] {
        &[Language::JavaScript]
    }

    fn grammar(&self, _language: Language) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }
}
