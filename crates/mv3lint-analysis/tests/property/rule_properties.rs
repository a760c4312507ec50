use mv3lint_analysis::rules::DiagnosticKind;
use mv3lint_analysis::{Language, Linter};
use mv3lint_core::config::LintConfig;
use proptest::prelude::*;

fn linter() -> Linter {
    Linter::new(LintConfig::default()).expect("linter")
}

/// Identifiers that are neither keywords nor the names the fixtures use.
fn local_name() -> impl Strategy<Value = String> {
    "[a-z]{3,8}".prop_map(|s| format!("v_{s}"))
}

proptest! {
    #[test]
    fn self_contained_functions_never_capture(names in prop::collection::vec(local_name(), 1..8)) {
        let mut body = String::new();
        for (i, name) in names.iter().enumerate() {
            body.push_str(&format!("  const {name}{i} = cfg.k + {i};\n"));
        }
        let sum: Vec<String> = names.iter().enumerate().map(|(i, n)| format!("{n}{i}")).collect();
        let code = format!(
            "const OUTER = 1;\nchrome.scripting.executeScript({{\n  func: (cfg) => {{\n{body}  return {};\n  }},\n  args: [{{ k: OUTER }}],\n}});\n",
            sum.join(" + ")
        );
        let report = linter().lint_text(Language::JavaScript, &code).expect("lint");
        prop_assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn alias_chains_of_any_length_resolve(len in 1usize..48) {
        let mut code = String::from("const a0 = chrome.scripting.executeScript;\n");
        for i in 1..len {
            code.push_str(&format!("const a{i} = a{};\n", i - 1));
        }
        code.push_str(&format!("const TOP = 1;\na{}({{ func: () => TOP }});\n", len - 1));
        let report = linter().lint_text(Language::JavaScript, &code).expect("lint");
        let kinds: Vec<DiagnosticKind> = report.diagnostics.iter().map(|d| d.kind).collect();
        prop_assert_eq!(kinds, vec![DiagnosticKind::ClosureCapture]);
    }

    #[test]
    fn alias_cycles_terminate(len in 2usize..24) {
        let mut code = String::new();
        for i in 0..len {
            code.push_str(&format!("var c{i} = c{};\n", (i + 1) % len));
        }
        code.push_str("const TOP = 1;\nc0({ func: () => TOP });\n");
        let report = linter().lint_text(Language::JavaScript, &code).expect("lint");
        prop_assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn linting_is_idempotent(captured in prop::collection::vec(local_name(), 0..6)) {
        let mut code = String::new();
        for name in &captured {
            code.push_str(&format!("let {name} = 1;\n"));
        }
        let uses: Vec<&str> = captured.iter().map(String::as_str).chain(["0"]).collect();
        code.push_str(&format!(
            "chrome.scripting.executeScript({{ func: () => {} }});\n",
            uses.join(" + ")
        ));
        let linter = linter();
        let first = linter.lint_text(Language::JavaScript, &code).expect("lint");
        let second = linter.lint_text(Language::JavaScript, &code).expect("lint");
        prop_assert_eq!(&first.diagnostics, &second.diagnostics);

        let mut distinct = captured.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(first.diagnostics.len(), distinct.len());
    }
}
