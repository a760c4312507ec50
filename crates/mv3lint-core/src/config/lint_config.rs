//! Lint configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How top-level declarations are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// ES module: top-level bindings live in a module scope below the global scope.
    #[default]
    Module,
    /// Classic script: top-level bindings live in the global scope.
    Script,
}

impl SourceType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "module" => Some(Self::Module),
            "script" | "commonjs" => Some(Self::Script),
            _ => None,
        }
    }
}

/// Per-rule severity, mirroring ESLint's `off` / `warn` / `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Off,
    Warn,
    Error,
}

impl RuleSeverity {
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for a lint run.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`MV3LINT_*`)
/// 2. Config file (`mv3lint.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LintConfig {
    /// Source type for all files. Default: module.
    pub source_type: Option<SourceType>,
    /// Ambient globals: declared in the global scope without any definition.
    pub globals: Vec<String>,
    /// Rule id -> severity. Rules not listed use their recommended severity.
    pub rules: BTreeMap<String, RuleSeverity>,
    /// Honor inline suppression comments. Default: true.
    pub suppressions: Option<bool>,
}

impl LintConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: LintConfig = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: LintConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Toml {
            origin: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &LintConfig) -> Result<(), ConfigError> {
        for name in &config.globals {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidGlobal { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Reject rule ids the host does not know about.
    pub fn validate_rules(&self, known: &[&str]) -> Result<(), ConfigError> {
        if let Some(unknown) = self.rules.keys().find(|id| !known.contains(&id.as_str())) {
            return Err(ConfigError::UnknownRule {
                rule: unknown.clone(),
                known: known.iter().map(|id| id.to_string()).collect(),
            });
        }
        Ok(())
    }

    fn apply_env_overrides(config: &mut LintConfig) {
        if let Ok(val) = std::env::var("MV3LINT_SOURCE_TYPE") {
            if let Some(v) = SourceType::parse(&val) {
                config.source_type = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MV3LINT_GLOBALS") {
            for name in val.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !config.globals.iter().any(|g| g == name) {
                    config.globals.push(name.to_string());
                }
            }
        }
        if let Ok(val) = std::env::var("MV3LINT_SUPPRESSIONS") {
            if let Ok(v) = val.parse::<bool>() {
                config.suppressions = Some(v);
            }
        }
    }

    /// Returns the effective source type, defaulting to module.
    pub fn effective_source_type(&self) -> SourceType {
        self.source_type.unwrap_or_default()
    }

    /// Returns the configured severity for `rule_id`, or `default` when unlisted.
    pub fn effective_severity(&self, rule_id: &str, default: RuleSeverity) -> RuleSeverity {
        self.rules.get(rule_id).copied().unwrap_or(default)
    }

    /// Returns whether inline suppressions are honored, defaulting to true.
    pub fn effective_suppressions(&self) -> bool {
        self.suppressions.unwrap_or(true)
    }
}
