//! ParseResult and source-position types.

use serde::{Deserialize, Serialize};

use super::language_detect::Language;

/// Output of a language parser: the concrete tree plus error bookkeeping.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub file: String,
    pub language: Language,
    pub tree: tree_sitter::Tree,
    pub parse_time_us: u64,
    pub error_count: u32,
    pub error_ranges: Vec<Range>,
    pub has_errors: bool,
}

/// Zero-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn from_ts_node(node: &tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: Position {
                line: start.row as u32,
                column: start.column as u32,
            },
            end: Position {
                line: end.row as u32,
                column: end.column as u32,
            },
        }
    }
}
