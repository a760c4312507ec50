//! ParserManager — routes a file to the parser for its extension.

use std::path::{Path, PathBuf};

use mv3lint_core::errors::ParseError;

use super::languages::javascript::JavaScriptParser;
use super::languages::typescript::TypeScriptParser;
use super::language_detect::Language;
use super::traits::LanguageParser;
use super::types::ParseResult;

pub struct ParserManager {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl Default for ParserManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserManager {
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(JavaScriptParser), Box::new(TypeScriptParser)],
        }
    }

    /// Parse a file, choosing the grammar from its extension.
    pub fn parse(&self, source: &[u8], path: &Path) -> Result<ParseResult, ParseError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let language =
            Language::from_extension(Some(ext)).ok_or_else(|| ParseError::UnsupportedLanguage {
                extension: ext.to_string(),
            })?;
        self.parse_with(source, path, language, ext)
    }

    /// Parse source text directly as `language`, ignoring any path.
    pub fn parse_as(&self, source: &[u8], language: Language) -> Result<ParseResult, ParseError> {
        let ext = language.extensions().first().copied().unwrap_or("js");
        let path = PathBuf::from(format!("input.{ext}"));
        self.parse_with(source, &path, language, ext)
    }

    fn parse_with(
        &self,
        source: &[u8],
        path: &Path,
        language: Language,
        ext: &str,
    ) -> Result<ParseResult, ParseError> {
        let parser = self
            .parsers
            .iter()
            .find(|p| p.handles(language))
            .ok_or_else(|| ParseError::UnsupportedLanguage {
                extension: ext.to_string(),
            })?;
        parser.parse(source, path, language)
    }

    /// Whether a path has an extension this manager can parse.
    pub fn supports(&self, path: &Path) -> bool {
        Language::from_path(path).is_some()
    }
}

/// Parse `source` as `language` with a fresh manager.
pub fn parse_source(language: Language, source: &str) -> Result<ParseResult, ParseError> {
    ParserManager::new().parse_as(source.as_bytes(), language)
}
