//! Tree-sitter parser subsystem: JavaScript and TypeScript grammars.

pub mod error_tolerant;
pub mod language_detect;
pub mod languages;
pub mod manager;
pub mod traits;
pub mod types;

pub use language_detect::Language;
pub use manager::{parse_source, ParserManager};
pub use types::{ParseResult, Position, Range};
