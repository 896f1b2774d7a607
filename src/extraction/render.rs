//! String rendering of property type expressions.
//!
//! Recursively converts a type node into the text stored on the extracted
//! record. Shapes without a dedicated rule fall back to their literal source
//! text.

use crate::extraction::parser::node_text;
use tree_sitter::Node;

/// Render a type expression node.
pub fn render_type(node: &Node, source: &str) -> String {
    match node.kind() {
        // Primitive keywords pass through unchanged, `any` included: the
        // guard stage is the one place that rejects it.
        "predefined_type" => node_text(node, source).to_string(),
        "object_type" => render_object_type(node, source),
        "array_type" => {
            let element = node
                .named_child(0)
                .map(|n| render_type(&n, source))
                .unwrap_or_default();
            format!("{element}[]")
        }
        "union_type" => {
            let mut cursor = node.walk();
            let arms: Vec<String> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .map(|n| render_type(&n, source))
                .collect();
            arms.join(" | ")
        }
        "parenthesized_type" => {
            let inner = node
                .named_child(0)
                .map(|n| render_type(&n, source))
                .unwrap_or_default();
            format!("({inner})")
        }
        _ => node_text(node, source).to_string(),
    }
}

/// Render an inline object type as a brace-delimited, semicolon-joined
/// property list.
fn render_object_type(node: &Node, source: &str) -> String {
    let mut members = Vec::new();
    let mut cursor = node.walk();
    for member in node.named_children(&mut cursor) {
        if member.kind() != "property_signature" {
            if member.kind() != "comment" {
                members.push(node_text(&member, source).trim().to_string());
            }
            continue;
        }
        let name = member
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default();
        let optional = has_token(&member, "?");
        let rendered = match type_of(&member) {
            Some(ty) => render_type(&ty, source),
            None => node_text(&member, source).trim().to_string(),
        };
        let marker = if optional { "?" } else { "" };
        members.push(format!("{name}{marker}: {rendered}"));
    }
    if members.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", members.join("; "))
    }
}

/// The type node under a member's `type_annotation`, if any.
pub fn type_of<'a>(member: &Node<'a>) -> Option<Node<'a>> {
    let annotation = member.child_by_field_name("type")?;
    let mut cursor = annotation.walk();
    let result = annotation.named_children(&mut cursor).next();
    result
}

/// Whether the node carries the given anonymous token among its children.
pub fn has_token(node: &Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|c| c.kind() == token);
    result
}
