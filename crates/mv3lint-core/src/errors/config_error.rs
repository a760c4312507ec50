//! Errors raised while loading `mv3lint.toml` or checking it against the rule set.

use std::io;
use std::path::PathBuf;

use super::error_code::{self, Mv3ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `origin` is the file path, or `<string>` for inline TOML.
    #[error("malformed TOML in {origin}: {message}")]
    Toml { origin: String, message: String },

    #[error("`{name}` in `globals` is not an identifier")]
    InvalidGlobal { name: String },

    #[error("unknown rule `{rule}` (known: {})", .known.join(", "))]
    UnknownRule { rule: String, known: Vec<String> },
}

impl ConfigError {
    /// True when the config file does not exist, as opposed to being unreadable.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl Mv3ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => error_code::CONFIG_READ_ERROR,
            Self::Toml { .. } => error_code::CONFIG_ERROR,
            Self::InvalidGlobal { .. } | Self::UnknownRule { .. } => error_code::CONFIG_INVALID,
        }
    }
}
