//! Diagnostics produced by lint rules.

use std::collections::BTreeMap;
use std::fmt;

use mv3lint_core::config::RuleSeverity;
use serde::Serialize;

use crate::ast::{Ast, NodeId};

/// The closed set of findings the execute-script rule can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    UnresolvedFunc,
    ImportedFunc,
    ClosureCapture,
    MissingArgs,
    InvalidArgs,
    DynamicConfig,
    DynamicInvoke,
}

impl DiagnosticKind {
    pub fn all() -> &'static [DiagnosticKind] {
        &[
            Self::UnresolvedFunc,
            Self::ImportedFunc,
            Self::ClosureCapture,
            Self::MissingArgs,
            Self::InvalidArgs,
            Self::DynamicConfig,
            Self::DynamicInvoke,
        ]
    }

    /// Stable message id, as used in reports and suppression tooling.
    pub fn message_id(self) -> &'static str {
        match self {
            Self::UnresolvedFunc => "unresolvedFunc",
            Self::ImportedFunc => "importedFunc",
            Self::ClosureCapture => "closureCapture",
            Self::MissingArgs => "missingArgs",
            Self::InvalidArgs => "invalidArgs",
            Self::DynamicConfig => "dynamicConfig",
            Self::DynamicInvoke => "dynamicInvoke",
        }
    }

    /// Message template. `{{name}}` is filled from the diagnostic data.
    pub fn template(self) -> &'static str {
        match self {
            Self::UnresolvedFunc => "`executeScript({ func })` must point to a local function declared in this file (inline it or define it above).",
            Self::ImportedFunc => "`executeScript({ func })` cannot use an imported function. Define a local wrapper and pass input via `args`.",
            Self::ClosureCapture => "Injected function captures outer variable `{{name}}`. Move that value into `args` so `func` is self-contained.",
            Self::MissingArgs => "Injected function has parameters but `args` is missing. Pass inputs with `executeScript({ ..., args: [...] })`.",
            Self::InvalidArgs => "`executeScript` `args` must be an array literal (`args: [...]`).",
            Self::DynamicConfig => "`executeScript` options must be a static object literal (no spread/dynamic config) so `func` and `args` can be validated.",
            Self::DynamicInvoke => "`executeScript` call must pass statically analyzable options (`executeScript({...})`, `.call(_, {...})`, or `.apply(_, [{...}])`).",
        }
    }

    /// Render the template with `data` substituted for `{{key}}` placeholders.
    pub fn render(self, data: &BTreeMap<String, String>) -> String {
        let mut message = self.template().to_string();
        for (key, value) in data {
            message = message.replace(&format!("{{{{{key}}}}}"), value);
        }
        message
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_id())
    }
}

/// A single finding, anchored to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub kind: DiagnosticKind,
    pub severity: RuleSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(skip)]
    pub node: NodeId,
    /// 1-based line.
    pub line: u32,
    /// 1-based column in UTF-16 code units.
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Diagnostic {
    pub fn new(
        ast: &Ast,
        rule_id: &str,
        severity: RuleSeverity,
        kind: DiagnosticKind,
        node: NodeId,
        data: BTreeMap<String, String>,
    ) -> Self {
        let range = ast.range(node);
        let span = ast.node(node).span;
        Self {
            rule_id: rule_id.to_string(),
            kind,
            severity,
            message: kind.render(&data),
            data,
            node,
            line: range.start.line + 1,
            column: ast.utf16_column(span.start) + 1,
            end_line: range.end.line + 1,
            end_column: ast.utf16_column(span.end) + 1,
        }
    }

    /// The captured name for `closureCapture` findings.
    pub fn name(&self) -> Option<&str> {
        self.data.get("name").map(String::as_str)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} ({})",
            self.line,
            self.column,
            self.severity.name(),
            self.message,
            self.rule_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_capture_renders_name() {
        let mut data = BTreeMap::new();
        data.insert("name".to_string(), "TOP".to_string());
        let message = DiagnosticKind::ClosureCapture.render(&data);
        assert!(message.contains("captures outer variable `TOP`"));
        assert!(!message.contains("{{"));
    }

    #[test]
    fn message_ids_are_unique() {
        let mut ids: Vec<&str> = DiagnosticKind::all().iter().map(|k| k.message_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DiagnosticKind::all().len());
    }
}
