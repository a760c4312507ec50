//! mv3lint-core: shared foundation for the mv3lint analysis engine.
//!
//! - Errors: one `thiserror` enum per subsystem, each with a stable error code
//! - Config: TOML-based lint configuration with env overrides
//! - Tracing: `EnvFilter`-driven subscriber setup
//! - Types: collection aliases used across the workspace

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{LintConfig, RuleSeverity, SourceType};
pub use errors::{ConfigError, LintError, Mv3ErrorCode, ParseError};
