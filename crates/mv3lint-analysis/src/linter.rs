//! Linter — runs the enabled rules over one source file at a time.
//!
//! Per file: detect language, parse, lower, build scopes, dispatch every call
//! expression to each rule in document order, drop suppressed findings, sort.

use std::path::{Path, PathBuf};
use std::time::Instant;

use mv3lint_core::config::{LintConfig, RuleSeverity};
use mv3lint_core::errors::LintError;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::Ast;
use crate::parsers::{Language, ParserManager};
use crate::rules::{Diagnostic, Rule, RuleContext, RuleRegistry, RuleVisitor, SuppressionChecker};
use crate::scope::{ScopeManager, ScopeOptions};

/// Findings for one file.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub file: String,
    pub language: Language,
    pub diagnostics: Vec<Diagnostic>,
    /// Findings silenced by inline comments.
    pub suppressed: usize,
    pub parse_error_count: u32,
    pub parse_time_us: u64,
    pub analysis_time_us: u64,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.count(RuleSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(RuleSeverity::Warn)
    }

    fn count(&self, severity: RuleSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lints source files with a fixed configuration. Holds no per-file state.
pub struct Linter {
    config: LintConfig,
    scope_options: ScopeOptions,
    parsers: ParserManager,
    registry: RuleRegistry,
}

impl Linter {
    /// Build a linter with the recommended rules. Unknown rule ids in the
    /// configuration are rejected.
    pub fn new(config: LintConfig) -> Result<Self, LintError> {
        Self::with_registry(config, RuleRegistry::recommended())
    }

    pub fn with_registry(config: LintConfig, registry: RuleRegistry) -> Result<Self, LintError> {
        LintConfig::validate(&config)?;
        config.validate_rules(&registry.ids())?;
        Ok(Self {
            scope_options: ScopeOptions::from_config(&config),
            config,
            parsers: ParserManager::new(),
            registry,
        })
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn severity_of(&self, rule: &dyn Rule) -> RuleSeverity {
        self.config
            .effective_severity(rule.id(), rule.meta().recommended)
    }

    /// Lint one file. The language is chosen from the path's extension.
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<LintReport, LintError> {
        let parsed = self.parsers.parse(source.as_bytes(), path)?;
        if parsed.has_errors {
            warn!(
                file = %path.display(),
                errors = parsed.error_count,
                "syntax errors; analyzing recovered tree"
            );
        }

        let started = Instant::now();
        let ast = Ast::from_parse(&parsed, source);
        let scopes = ScopeManager::build(&ast, &self.scope_options);

        let mut visitors: Vec<Box<dyn RuleVisitor + '_>> = self
            .registry
            .iter()
            .filter_map(|rule| {
                let severity = self.severity_of(rule);
                severity.is_enabled().then(|| {
                    let ctx = RuleContext {
                        ast: &ast,
                        graph: &scopes,
                        severity,
                    };
                    rule.create(ctx)
                })
            })
            .collect();

        let mut diagnostics = Vec::new();
        if !visitors.is_empty() {
            for call in ast.call_expressions() {
                for visitor in visitors.iter_mut() {
                    diagnostics.extend(visitor.check_call(call));
                }
            }
        }

        let before = diagnostics.len();
        if self.config.effective_suppressions() {
            let checker = SuppressionChecker::new(source);
            diagnostics.retain(|d: &Diagnostic| !checker.is_suppressed(d.line, &d.rule_id));
        }
        let suppressed = before - diagnostics.len();
        diagnostics.sort_by_key(|d| (d.line, d.column));

        let analysis_time_us = started.elapsed().as_micros() as u64;
        debug!(
            file = %path.display(),
            diagnostics = diagnostics.len(),
            suppressed,
            analysis_time_us,
            "lint complete"
        );

        Ok(LintReport {
            file: path.display().to_string(),
            language: parsed.language,
            diagnostics,
            suppressed,
            parse_error_count: parsed.error_count,
            parse_time_us: parsed.parse_time_us,
            analysis_time_us,
        })
    }

    /// Lint source text as `language`, reporting it under a synthetic file name.
    pub fn lint_text(&self, language: Language, source: &str) -> Result<LintReport, LintError> {
        let path = match language {
            Language::JavaScript => "fixture.js",
            Language::TypeScript => "fixture.ts",
            Language::Tsx => "fixture.tsx",
        };
        self.lint_source(Path::new(path), source)
    }

    /// Lint many files in parallel. Results keep the input order.
    pub fn lint_files(&self, files: &[(PathBuf, String)]) -> Vec<Result<LintReport, LintError>> {
        files
            .par_iter()
            .map(|(path, source)| self.lint_source(path, source))
            .collect()
    }
}
