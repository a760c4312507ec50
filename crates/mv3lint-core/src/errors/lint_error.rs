//! Top-level error for a lint run.

use super::error_code::Mv3ErrorCode;
use super::{ConfigError, ParseError};

/// Errors surfaced by `Linter` entry points.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Mv3ErrorCode for LintError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
