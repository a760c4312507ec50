//! Inline suppression comments.
//!
//! Supports:
//! - `// eslint-disable-next-line` / `// eslint-disable-next-line rule1, rule2`
//! - `// eslint-disable-line` / `// eslint-disable-line rule1` (same line)
//! - `// mv3lint-ignore` / `// mv3lint-ignore rule1` (next line)
//!
//! A trailing `-- reason` is ignored. Rule names match either exactly or by
//! plugin-prefixed suffix, so `@scope/mv3/no-execute-script-closure` silences
//! `mv3/no-execute-script-closure`.

/// Checks whether a finding on a given line is silenced by a comment.
pub struct SuppressionChecker<'s> {
    lines: Vec<&'s str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    NextLine,
    SameLine,
}

const MARKERS: &[(&str, Directive)] = &[
    ("eslint-disable-next-line", Directive::NextLine),
    ("eslint-disable-line", Directive::SameLine),
    ("mv3lint-ignore", Directive::NextLine),
];

impl<'s> SuppressionChecker<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            lines: source.lines().collect(),
        }
    }

    /// Whether `rule_id` is suppressed at 1-based `line`.
    pub fn is_suppressed(&self, line: u32, rule_id: &str) -> bool {
        if line == 0 {
            return false;
        }
        let idx = (line - 1) as usize;

        if let Some(current) = self.lines.get(idx) {
            if line_suppresses(current, Directive::SameLine, rule_id) {
                return true;
            }
        }

        if idx > 0 {
            if let Some(previous) = self.lines.get(idx - 1) {
                if line_suppresses(previous, Directive::NextLine, rule_id) {
                    return true;
                }
            }
        }

        false
    }
}

fn line_suppresses(line: &str, wanted: Directive, rule_id: &str) -> bool {
    let trimmed = line.trim();
    MARKERS
        .iter()
        .filter(|(_, directive)| *directive == wanted)
        .any(|(marker, _)| check_marker(trimmed, marker, rule_id) == Some(true))
}

fn check_marker(trimmed: &str, marker: &str, rule_id: &str) -> Option<bool> {
    let pos = trimmed.find(marker)?;

    let before = &trimmed[..pos];
    if !(before.contains("//") || before.contains("/*")) {
        return None;
    }

    let mut after = &trimmed[pos + marker.len()..];
    // `mv3lint-ignore-file` and similar are other directives.
    if after.starts_with(|c: char| c.is_alphanumeric() || c == '-' || c == '_') {
        return None;
    }
    if let Some(end) = after.find("*/") {
        after = &after[..end];
    }
    if let Some(reason) = after.find("--") {
        after = &after[..reason];
    }
    let after = after.trim();
    if after.is_empty() {
        return Some(true);
    }

    Some(
        after
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .any(|r| rule_matches(r, rule_id)),
    )
}

fn rule_matches(listed: &str, rule_id: &str) -> bool {
    listed == rule_id
        || listed
            .strip_suffix(rule_id)
            .is_some_and(|prefix| prefix.ends_with('/'))
        || rule_id
            .strip_suffix(listed)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: &str = "mv3/no-execute-script-closure";

    #[test]
    fn next_line_without_rules_suppresses_everything() {
        let checker = SuppressionChecker::new("// eslint-disable-next-line\nfoo();\n");
        assert!(checker.is_suppressed(2, RULE));
        assert!(!checker.is_suppressed(1, RULE));
    }

    #[test]
    fn next_line_with_plugin_prefixed_rule() {
        let checker = SuppressionChecker::new(
            "// eslint-disable-next-line @mertcreates/mv3/no-execute-script-closure -- legacy\nfoo();",
        );
        assert!(checker.is_suppressed(2, RULE));
    }

    #[test]
    fn other_rules_do_not_suppress() {
        let checker = SuppressionChecker::new("// eslint-disable-next-line no-console\nfoo();");
        assert!(!checker.is_suppressed(2, RULE));
    }

    #[test]
    fn same_line_directive() {
        let checker = SuppressionChecker::new("foo(); // eslint-disable-line\nbar();");
        assert!(checker.is_suppressed(1, RULE));
        assert!(!checker.is_suppressed(2, RULE));
    }

    #[test]
    fn block_comment_and_ignore_marker() {
        let checker = SuppressionChecker::new(
            "/* mv3lint-ignore mv3/no-execute-script-closure */\nfoo();\n",
        );
        assert!(checker.is_suppressed(2, RULE));
    }

    #[test]
    fn marker_outside_comment_is_ignored() {
        let checker = SuppressionChecker::new("const s = 'eslint-disable-next-line';\nfoo();");
        assert!(!checker.is_suppressed(2, RULE));
    }
}
