//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, Mv3ErrorCode};

/// Errors that can occur while turning source text into a syntax tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load grammar for {language}: {message}")]
    GrammarLoad { language: String, message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("Unsupported file extension: {extension}")]
    UnsupportedLanguage { extension: String },
}

impl Mv3ErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            Self::GrammarLoad { .. } => error_code::GRAMMAR_ERROR,
            Self::NoTree { .. } => error_code::PARSE_ERROR,
        }
    }
}
