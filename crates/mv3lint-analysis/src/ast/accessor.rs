//! Structural helpers over the [`Ast`]: chain unwrapping, static property
//! names, property lookup, and function-shape checks.

use std::borrow::Cow;

use super::{Ast, LiteralValue, NodeId, NodeKind};

/// Strip `ChainExpression` wrappers so `a?.b` is inspected like `a.b`.
pub fn unwrap_chain(ast: &Ast, mut node: NodeId) -> NodeId {
    while let NodeKind::ChainExpression { expression } = ast.kind(node) {
        node = *expression;
    }
    node
}

/// The compile-time name of a key-like node: an identifier, a literal, or a
/// template literal with no substitutions.
pub fn static_property_name(ast: &Ast, node: NodeId) -> Option<Cow<'_, str>> {
    match ast.kind(node) {
        NodeKind::Identifier { name } => Some(Cow::Borrowed(name)),
        NodeKind::Literal { value } => Some(literal_to_string(value)),
        NodeKind::TemplateLiteral {
            quasis,
            expressions,
        } if expressions.is_empty() => quasis.first().map(|q| Cow::Borrowed(q.as_str())),
        _ => None,
    }
}

/// Static name of the property read by a member expression.
/// `obj[x]` with an identifier `x` has no static name.
pub fn member_property_name(ast: &Ast, member: NodeId) -> Option<Cow<'_, str>> {
    match ast.kind(member) {
        NodeKind::MemberExpression {
            property, computed, ..
        } => key_name(ast, *property, *computed),
        _ => None,
    }
}

/// Static key name of an object property or pattern property.
pub fn property_key_name(ast: &Ast, property: NodeId) -> Option<Cow<'_, str>> {
    match ast.kind(property) {
        NodeKind::Property { key, computed, .. } => key_name(ast, *key, *computed),
        _ => None,
    }
}

fn key_name(ast: &Ast, key: NodeId, computed: bool) -> Option<Cow<'_, str>> {
    if computed && matches!(ast.kind(key), NodeKind::Identifier { .. }) {
        return None;
    }
    static_property_name(ast, key)
}

fn literal_to_string(value: &LiteralValue) -> Cow<'_, str> {
    match value {
        LiteralValue::String(s) => Cow::Borrowed(s),
        LiteralValue::Number(n) => Cow::Owned(number_to_js_string(*n)),
        LiteralValue::BigInt(digits) => Cow::Borrowed(digits),
        LiteralValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        LiteralValue::Null => Cow::Borrowed("null"),
        LiteralValue::RegExp { pattern, flags } => Cow::Owned(format!("/{pattern}/{flags}")),
    }
}

/// Format a number the way `String(n)` does for the common cases.
pub fn number_to_js_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

/// First non-computed `Property` of an object expression whose static key is `name`.
pub fn find_property(ast: &Ast, object: NodeId, name: &str) -> Option<NodeId> {
    let NodeKind::ObjectExpression { properties } = ast.kind(object) else {
        return None;
    };
    properties.iter().copied().find(|&prop| match ast.kind(prop) {
        NodeKind::Property { key, computed, .. } => {
            !computed && static_property_name(ast, *key).as_deref() == Some(name)
        }
        _ => false,
    })
}

/// Whether an object expression contains a spread element.
pub fn has_spread(ast: &Ast, object: NodeId) -> bool {
    match ast.kind(object) {
        NodeKind::ObjectExpression { properties } => properties
            .iter()
            .any(|&p| matches!(ast.kind(p), NodeKind::SpreadElement { .. })),
        _ => false,
    }
}

/// The value of a `Property` node.
pub fn property_value(ast: &Ast, property: NodeId) -> Option<NodeId> {
    match ast.kind(property) {
        NodeKind::Property { value, .. } => Some(*value),
        _ => None,
    }
}

pub fn is_function_like(ast: &Ast, node: NodeId) -> bool {
    ast.kind(node).as_function().is_some()
}

/// Whether an identifier sits in a type position rather than a value position.
pub fn is_type_only_reference(ast: &Ast, identifier: NodeId) -> bool {
    ast.parent(identifier)
        .is_some_and(|p| matches!(ast.kind(p), NodeKind::TypeAnnotation { .. }))
}
