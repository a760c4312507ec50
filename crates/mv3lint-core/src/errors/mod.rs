//! Error handling for mv3lint.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Findings produced by lint rules are never errors: they travel as diagnostics.
//! These enums cover the faults that stop a file from being analyzed at all.

pub mod config_error;
pub mod error_code;
pub mod lint_error;
pub mod parse_error;

pub use config_error::ConfigError;
pub use error_code::Mv3ErrorCode;
pub use lint_error::LintError;
pub use parse_error::ParseError;
