//! Per-language parsers and the shared tree-sitter driver.

pub mod javascript;
pub mod typescript;

use std::path::Path;
use std::time::Instant;

use mv3lint_core::errors::ParseError;
use tree_sitter::Parser;

use super::error_tolerant::count_errors;
use super::language_detect::Language;
use super::types::ParseResult;

/// Parse `source` with the given grammar. A fresh `Parser` is built per call
/// because tree-sitter parsers are not shareable across threads.
pub fn parse_with_language(
    source: &[u8],
    path: &Path,
    language: Language,
    ts_language: tree_sitter::Language,
) -> Result<ParseResult, ParseError> {
    let start = Instant::now();

    let mut parser = Parser::new();
    parser
        .set_language(&ts_language)
        .map_err(|e| ParseError::GrammarLoad {
            language: language.name().to_string(),
            message: e.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
        path: path.to_path_buf(),
    })?;

    let (error_count, error_ranges) = count_errors(tree.root_node());

    Ok(ParseResult {
        file: path.display().to_string(),
        language,
        tree,
        parse_time_us: start.elapsed().as_micros() as u64,
        error_count,
        has_errors: error_count > 0,
        error_ranges,
    })
}
