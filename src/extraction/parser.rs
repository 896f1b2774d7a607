//! Tree-sitter parser integration for TypeScript.

use crate::core::ast::TypeScriptAst;
use crate::core::errors::{Error, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parse TypeScript source code into a tree-sitter AST
pub fn parse_source(content: &str, path: &Path) -> Result<TypeScriptAst> {
    let mut parser = Parser::new();
    let language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();

    parser
        .set_language(&language)
        .map_err(|e| Error::Extraction(format!("failed to set tree-sitter language: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse(path, 1, 1, "parser produced no tree"))?;

    Ok(TypeScriptAst {
        tree,
        source: content.to_string(),
        path: path.to_path_buf(),
    })
}

/// Check if a parse tree has errors
pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

/// Locate the first error or missing node, for diagnostics (1-indexed).
pub fn first_error_position(tree: &Tree) -> (usize, usize) {
    fn find<'a>(node: Node<'a>) -> Option<Node<'a>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = find(child) {
                return Some(found);
            }
        }
        None
    }

    match find(tree.root_node()) {
        Some(node) => (node_line(&node), node_column(&node)),
        None => (1, 1),
    }
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    &source[start..end]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}
