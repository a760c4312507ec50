//! Configuration system for mv3lint.
//! TOML-based, 3-layer resolution: env > config file > defaults.

pub mod lint_config;

pub use lint_config::{LintConfig, RuleSeverity, SourceType};
