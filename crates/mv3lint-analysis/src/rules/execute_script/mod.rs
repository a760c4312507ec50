//! `mv3/no-execute-script-closure`: functions injected with
//! `chrome.scripting.executeScript({ func })` must be self-contained.
//!
//! The injected function is serialized and run in the page, so any variable it
//! closes over is missing there. Inputs have to travel through `args`.
//!
//! Per call expression:
//! 1. Shape and arity pre-filters on the callee.
//! 2. [`invocation::resolve_invocation`] confirms the call and finds the options.
//! 3. The options must be an object literal; spreads are reported but the
//!    visible properties are still checked.
//! 4. [`function::resolve_injected_function`] locates `func`.
//! 5. [`capture::check_arguments`] and [`capture::find_captures`] report the rest.

pub mod capture;
pub mod function;
pub mod invocation;
pub mod target;

use std::collections::BTreeMap;

use mv3lint_core::config::RuleSeverity;
use tracing::debug;

use crate::ast::accessor::{find_property, has_spread, property_value, unwrap_chain};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::rules::{Diagnostic, DiagnosticKind, Rule, RuleContext, RuleMeta, RuleType, RuleVisitor};
use crate::scope::ScopeIndex;

use function::FunctionError;
use invocation::Invocation;
use target::TargetResolver;

pub const RULE_ID: &str = "mv3/no-execute-script-closure";

const META: RuleMeta = RuleMeta {
    id: RULE_ID,
    description: "Enforce self-contained functions for chrome.scripting.executeScript({ func }).",
    url: "https://github.com/mertcreates/eslint-plugin-mv3#no-execute-script-closure",
    rule_type: RuleType::Problem,
    recommended: RuleSeverity::Error,
};

/// The rule. Stateless; per-file state lives in [`ExecuteScriptPass`].
#[derive(Debug, Default)]
pub struct ExecuteScriptClosure;

impl ExecuteScriptClosure {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ExecuteScriptClosure {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn create<'a>(&self, ctx: RuleContext<'a>) -> Box<dyn RuleVisitor + 'a> {
        Box::new(ExecuteScriptPass::new(ctx))
    }
}

/// One file's pass: scope lookups and execute-reference verdicts are cached
/// across call sites.
pub struct ExecuteScriptPass<'a> {
    ast: &'a Ast,
    index: ScopeIndex<'a>,
    targets: TargetResolver,
    severity: RuleSeverity,
}

impl<'a> ExecuteScriptPass<'a> {
    pub fn new(ctx: RuleContext<'a>) -> Self {
        Self {
            ast: ctx.ast,
            index: ScopeIndex::new(ctx.ast, ctx.graph),
            targets: TargetResolver::new(),
            severity: ctx.severity,
        }
    }

    fn report(&self, out: &mut Vec<Diagnostic>, kind: DiagnosticKind, node: NodeId) {
        self.report_with(out, kind, node, BTreeMap::new());
    }

    fn report_with(
        &self,
        out: &mut Vec<Diagnostic>,
        kind: DiagnosticKind,
        node: NodeId,
        data: BTreeMap<String, String>,
    ) {
        out.push(Diagnostic::new(self.ast, RULE_ID, self.severity, kind, node, data));
    }

    fn check(&mut self, call: NodeId, out: &mut Vec<Diagnostic>) {
        let ast = self.ast;
        let NodeKind::CallExpression { callee, .. } = ast.kind(call) else {
            return;
        };
        if !invocation::is_candidate_shape(ast, *callee)
            || !invocation::is_arity_compatible(ast, call)
        {
            return;
        }

        let resolved = invocation::resolve_invocation(&mut self.targets, &mut self.index, call);
        let config = match resolved {
            Invocation::NoMatch => return,
            Invocation::Dynamic => {
                debug!(
                    line = ast.range(call).start.line + 1,
                    "executeScript call with dynamic arguments"
                );
                return self.report(out, DiagnosticKind::DynamicInvoke, call);
            }
            Invocation::Static(config) => config,
        };
        debug!(line = ast.range(call).start.line + 1, "confirmed executeScript call");

        let config = config.map(|c| unwrap_chain(ast, c));
        let Some(config) =
            config.filter(|&c| matches!(ast.kind(c), NodeKind::ObjectExpression { .. }))
        else {
            return self.report(out, DiagnosticKind::DynamicConfig, call);
        };
        if has_spread(ast, config) {
            self.report(out, DiagnosticKind::DynamicConfig, config);
        }

        let Some(func_prop) = find_property(ast, config, "func") else {
            return;
        };
        let Some(func_value) = property_value(ast, func_prop) else {
            return;
        };
        let func_value = unwrap_chain(ast, func_value);

        let function = match function::resolve_injected_function(&mut self.index, func_value) {
            Ok(function) => function,
            Err(FunctionError::Imported) => {
                return self.report(out, DiagnosticKind::ImportedFunc, func_value);
            }
            Err(FunctionError::Unresolved) => {
                return self.report(out, DiagnosticKind::UnresolvedFunc, func_value);
            }
        };

        if let Some((kind, at)) = capture::check_arguments(ast, config, func_prop, function) {
            self.report(out, kind, at);
        }

        for found in capture::find_captures(&mut self.index, function) {
            let mut data = BTreeMap::new();
            data.insert("name".to_string(), found.name);
            self.report_with(out, DiagnosticKind::ClosureCapture, found.identifier, data);
        }
    }
}

impl RuleVisitor for ExecuteScriptPass<'_> {
    fn check_call(&mut self, call: NodeId) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        self.check(call, &mut out);
        out
    }
}
