//! executeScript rule benchmarks.
//!
//! Benchmarks: full lint pass over synthetic files with many call sites, and
//! a deep alias chain.
//! Run with: cargo bench -p mv3lint-analysis --bench execute_script_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mv3lint_analysis::{Language, Linter};
use mv3lint_core::config::LintConfig;

/// A file mixing injection calls, aliases, and unrelated calls.
fn synthetic_source(call_sites: usize) -> String {
    let mut code = String::from(
        "const run = chrome.scripting.executeScript.bind(chrome.scripting);\n\
         const api = { executeScript: chrome.scripting.executeScript };\n\
         const TOP = 'outer';\n",
    );
    for i in 0..call_sites {
        let line = match i % 4 {
            0 => format!(
                "chrome.scripting.executeScript({{ target: {{ tabId: {i} }}, func: (cfg) => cfg.v + {i}, args: [{{ v: {i} }}] }});\n"
            ),
            1 => format!("run({{ target: {{ tabId: {i} }}, func: () => TOP }});\n"),
            2 => format!("api.executeScript({{ func: function f{i}() {{ return {i}; }} }});\n"),
            _ => format!("console.log(helper_{i}(TOP, {i}));\n"),
        };
        code.push_str(&line);
    }
    code
}

fn lint_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_script_lint");
    group.sample_size(20);
    let linter = Linter::new(LintConfig::default()).unwrap();

    for size in [100, 1000, 5000] {
        let source = synthetic_source(size);
        group.bench_with_input(BenchmarkId::new("call_sites", size), &source, |b, source| {
            b.iter(|| linter.lint_text(Language::JavaScript, source).unwrap());
        });
    }
    group.finish();
}

fn alias_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_script_alias_chain");
    let linter = Linter::new(LintConfig::default()).unwrap();

    for depth in [10, 100, 1000] {
        let mut source = String::from("const a0 = chrome.scripting.executeScript;\n");
        for i in 1..depth {
            source.push_str(&format!("const a{i} = a{};\n", i - 1));
        }
        source.push_str(&format!("a{}({{ func: () => 1 }});\n", depth - 1));
        group.bench_with_input(BenchmarkId::new("depth", depth), &source, |b, source| {
            b.iter(|| linter.lint_text(Language::JavaScript, source).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, lint_pass, alias_chain);
criterion_main!(benches);
