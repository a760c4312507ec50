//! Linter pipeline tests (LNT-01 through LNT-08).

use std::path::PathBuf;

use mv3lint_analysis::rules::DiagnosticKind;
use mv3lint_analysis::{Language, LintReport, Linter};
use mv3lint_core::config::LintConfig;
use mv3lint_core::errors::LintError;

const CAPTURING: &str = "const TOP = 1;\nchrome.scripting.executeScript({ func: () => TOP });\n";

/// LNT-01: Reports carry file, language, and 1-based positions.
#[test]
fn test_report_fields() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let report = linter
        .lint_source(&PathBuf::from("src/background.js"), CAPTURING)
        .unwrap();
    assert_eq!(report.file, "src/background.js");
    assert_eq!(report.language, Language::JavaScript);
    assert_eq!(report.parse_error_count, 0);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 0);

    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::ClosureCapture);
    assert_eq!((diagnostic.line, diagnostic.column), (2, 46));
    assert_eq!((diagnostic.end_line, diagnostic.end_column), (2, 49));
    assert!(diagnostic.to_string().contains("mv3/no-execute-script-closure"));
}

/// LNT-02: JSON output uses camelCase message ids and includes data.
#[test]
fn test_report_json() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let report = linter.lint_text(Language::JavaScript, CAPTURING).unwrap();
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &value["diagnostics"][0];
    assert_eq!(first["kind"], "closureCapture");
    assert_eq!(first["severity"], "error");
    assert_eq!(first["data"]["name"], "TOP");
    assert_eq!(value["suppressed"], 0);
}

/// LNT-03: Unsupported extensions surface as errors, not findings.
#[test]
fn test_unsupported_extension() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let err = linter
        .lint_source(&PathBuf::from("manifest.json"), "{}")
        .unwrap_err();
    assert!(matches!(err, LintError::Parse(_)));
}

/// LNT-04: Files with syntax errors are still analyzed.
#[test]
fn test_syntax_errors_still_analyzed() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let code = format!("{CAPTURING}\nconst broken = ;\n");
    let report = linter.lint_text(Language::JavaScript, &code).unwrap();
    assert!(report.parse_error_count > 0);
    assert_eq!(report.diagnostics.len(), 1);
}

/// LNT-05: Parallel linting keeps input order and per-file results.
#[test]
fn test_lint_files_parallel() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let files: Vec<(PathBuf, String)> = (0..16)
        .map(|i| {
            let source = if i % 2 == 0 {
                CAPTURING.to_string()
            } else {
                "chrome.scripting.executeScript({ func: () => 1 });\n".to_string()
            };
            (PathBuf::from(format!("file{i}.ts")), source)
        })
        .collect();
    let reports: Vec<LintReport> = linter
        .lint_files(&files)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(reports.len(), 16);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.file, format!("file{i}.ts"));
        assert_eq!(report.language, Language::TypeScript);
        assert_eq!(report.diagnostics.len(), usize::from(i % 2 == 0));
    }
}

/// LNT-06: Configuration loaded from a TOML file drives the run.
#[test]
fn test_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("mv3lint.toml");
    std::fs::write(
        &path,
        "globals = [\"TOP\"]\n\n[rules]\n\"mv3/no-execute-script-closure\" = \"warn\"\n",
    )
    .unwrap();
    let config = LintConfig::load(&path).unwrap();
    let linter = Linter::new(config).unwrap();

    // A configured global that is also declared locally is still a capture.
    let report = linter.lint_text(Language::JavaScript, CAPTURING).unwrap();
    assert_eq!(report.warning_count(), 1);

    let report = linter
        .lint_text(
            Language::JavaScript,
            "chrome.scripting.executeScript({ func: () => TOP });\n",
        )
        .unwrap();
    assert!(report.diagnostics.is_empty());
}

/// LNT-07: Very deep expressions are analyzed without exhausting the stack.
#[test]
fn test_deeply_nested_input() {
    let mut code = String::from("const TOP = 1;\nchrome.scripting.executeScript({ func: () => ");
    code.push_str(&"(".repeat(600));
    code.push_str("TOP");
    for i in 0..6000 {
        code.push_str(&format!(" + v{i}"));
    }
    code.push_str(&")".repeat(600));
    code.push_str(" });\n");

    let linter = Linter::new(LintConfig::default()).unwrap();
    let report = linter.lint_text(Language::JavaScript, &code).unwrap();
    assert_eq!(report.parse_error_count, 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].name(), Some("TOP"));

    let files = vec![
        (PathBuf::from("deep.js"), code.clone()),
        (PathBuf::from("deep.ts"), code),
    ];
    for report in linter.lint_files(&files) {
        assert_eq!(report.unwrap().diagnostics.len(), 1);
    }
}

/// LNT-08: Columns count UTF-16 code units, not bytes.
#[test]
fn test_columns_are_utf16() {
    let linter = Linter::new(LintConfig::default()).unwrap();
    let code = "const TOP = 1;\n/* ñ */ chrome.scripting.executeScript({ func: () => TOP });\n";
    let report = linter.lint_text(Language::JavaScript, code).unwrap();
    let diagnostic = &report.diagnostics[0];
    assert_eq!((diagnostic.line, diagnostic.column), (2, 54));
    assert_eq!((diagnostic.end_line, diagnostic.end_column), (2, 57));

    let code = "const TOP = 1;\n/* 😀 */ chrome.scripting.executeScript({ func: () => TOP });\n";
    let report = linter.lint_text(Language::JavaScript, code).unwrap();
    assert_eq!(report.diagnostics[0].column, 55);
}
