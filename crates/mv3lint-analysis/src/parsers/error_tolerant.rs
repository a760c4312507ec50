//! Error-tolerant parsing: trees with ERROR nodes are still analyzed.

use tree_sitter::Node;

use super::types::Range;

/// Count ERROR and MISSING nodes in a tree-sitter tree. Only subtrees that
/// contain errors are walked.
pub fn count_errors(root: Node) -> (u32, Vec<Range>) {
    let mut count = 0u32;
    let mut ranges = Vec::new();
    let mut pending = Vec::new();
    if root.has_error() {
        pending.push(root);
    }
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
            ranges.push(Range::from_ts_node(&node));
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| child.has_error() || child.is_missing())
            .collect();
        pending.extend(children.into_iter().rev());
    }
    (count, ranges)
}
