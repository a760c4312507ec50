//! The seam between a grammar crate and the shared parse driver.

use std::path::Path;

use mv3lint_core::errors::ParseError;

use super::language_detect::Language;
use super::languages::parse_with_language;
use super::types::ParseResult;

/// One grammar family. Implementations name the dialects they cover and the
/// tree-sitter grammar for each; error counting and timing live in the driver.
pub trait LanguageParser: Send + Sync {
    /// Dialects produced by this family, e.g. TypeScript and TSX.
    fn languages(&self) -> &'static [Language];

    /// Grammar for one of [`languages`](Self::languages).
    fn grammar(&self, language: Language) -> tree_sitter::Language;

    fn handles(&self, language: Language) -> bool {
        self.languages().contains(&language)
    }

    /// Parse `source` as `language`. Syntax errors are counted, never fatal.
    fn parse(
        &self,
        source: &[u8],
        path: &Path,
        language: Language,
    ) -> Result<ParseResult, ParseError> {
        parse_with_language(source, path, language, self.grammar(language))
    }
}
