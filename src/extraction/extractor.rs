//! Reduces qualifying top-level declarations into canonical records.
//!
//! Interfaces keep an ordered property list; type aliases, enums and classes
//! keep their raw declaration text for verbatim re-emission. Classes are only
//! extracted when the rule set's predicate accepts their name.

use std::fs;

use tree_sitter::Node;

use crate::core::ast::{SyntaxHandle, TypeScriptAst};
use crate::core::errors::{Error, Result};
use crate::core::{
    ExtractedType, ExtractionContext, ExtractionError, PropertyInfo, TypeKind, ANONYMOUS_NAME,
};
use crate::extraction::parser::{self, node_column, node_line, node_text};
use crate::extraction::render::{has_token, render_type, type_of};

/// Extraction stage: parse every input file and collect declaration records.
///
/// Fatal on the first unreadable or unparseable file; diagnostics recorded up
/// to that point stay on the context.
pub fn run_extraction(ctx: &mut ExtractionContext) -> Result<()> {
    let files = ctx.files.clone();
    for path in &files {
        let source = fs::read_to_string(path).map_err(|e| Error::FileSystem {
            message: "failed to read source file".to_string(),
            path: Some(path.clone()),
            source: Some(e),
        })?;

        let ast = parser::parse_source(&source, path)?;
        if parser::has_parse_errors(&ast.tree) {
            let (line, column) = parser::first_error_position(&ast.tree);
            ctx.errors.push(
                ExtractionError::new(path.clone(), "unrecoverable syntax error").at(line, column),
            );
            return Err(Error::parse(
                path.clone(),
                line,
                column,
                "unrecoverable syntax error",
            ));
        }

        ctx.metrics.files_parsed += 1;
        collect_declarations(ctx, &ast);
        log::debug!("collected declarations from {}", path.display());
    }
    Ok(())
}

/// The branded stand-in used wherever a type is genuinely unannotated.
pub fn branded_placeholder(category: &str, origin: &str) -> String {
    format!("BrandedUnknown<'{category}', '{origin}'>")
}

fn collect_declarations(ctx: &mut ExtractionContext, ast: &TypeScriptAst) {
    let source = &ast.source;
    let root = ast.tree.root_node();
    let mut cursor = root.walk();
    let top_level: Vec<Node> = root.named_children(&mut cursor).collect();

    for outer in top_level {
        let (decl, exported) = match outer.kind() {
            // `export default class { … }` carries an anonymous class
            // expression under `value` rather than a declaration.
            "export_statement" => match outer.child_by_field_name("declaration").or_else(|| {
                outer
                    .child_by_field_name("value")
                    .filter(|n| n.kind() == "class")
            }) {
                Some(decl) => (decl, true),
                None => continue,
            },
            _ => (outer, false),
        };

        let name = declaration_name(&decl, source);
        if ctx.rules.exclude_types.contains(&name) {
            continue;
        }

        let mut record = match decl.kind() {
            "interface_declaration" => build_interface(ast, &decl, name),
            "type_alias_declaration" => build_raw(ast, &decl, name, TypeKind::TypeAlias),
            "enum_declaration" => build_raw(ast, &decl, name, TypeKind::Enum),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                if !ctx.rules.accepts_class(&name) {
                    continue;
                }
                build_raw(ast, &decl, name, TypeKind::Class)
            }
            _ => continue,
        };

        record.line = node_line(&decl);
        record.column = node_column(&decl);
        record.is_exported = exported;
        record.documentation = leading_doc(&outer, source);
        record.syntax = Some(SyntaxHandle::new(ast.tree.clone(), decl.id()));

        ctx.insert_type(record);
        ctx.metrics.types_extracted += 1;
    }
}

fn declaration_name(decl: &Node, source: &str) -> String {
    decl.child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_else(|| ANONYMOUS_NAME.to_string())
}

fn build_interface(ast: &TypeScriptAst, decl: &Node, name: String) -> ExtractedType {
    let source = &ast.source;
    let mut ty = ExtractedType::new(name.clone(), TypeKind::Interface, ast.path.clone());
    ty.definition = node_text(decl, source).to_string();
    ty.type_parameters = type_parameter_names(decl, source);
    ty.extends = supertype_names(decl, source);

    if let Some(body) = decl.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "property_signature" {
                continue;
            }
            ty.properties.push(property_info(&member, source, &name));
        }
    }
    ty
}

fn build_raw(ast: &TypeScriptAst, decl: &Node, name: String, kind: TypeKind) -> ExtractedType {
    let source = &ast.source;
    let mut ty = ExtractedType::new(name, kind, ast.path.clone());
    ty.definition = node_text(decl, source).to_string();
    ty.type_parameters = type_parameter_names(decl, source);
    ty
}

fn property_info(member: &Node, source: &str, owner: &str) -> PropertyInfo {
    let name = member
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    // Every property gets an explicit, traceable type: an unannotated one is
    // tagged with its category and origin rather than defaulting to `any`.
    let rendered = match type_of(member) {
        Some(ty) => render_type(&ty, source),
        None => branded_placeholder("property", &format!("{owner}.{name}")),
    };
    PropertyInfo {
        name,
        ty: rendered,
        optional: has_token(member, "?"),
        readonly: has_token(member, "readonly"),
        documentation: leading_doc(member, source),
    }
}

fn type_parameter_names(decl: &Node, source: &str) -> Vec<String> {
    let Some(params) = decl.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "type_parameter")
        .filter_map(|n| {
            n.child_by_field_name("name")
                .map(|id| node_text(&id, source).to_string())
        })
        .collect()
}

fn supertype_names(decl: &Node, source: &str) -> Vec<String> {
    let mut cursor = decl.walk();
    let clause = decl
        .named_children(&mut cursor)
        .find(|n| n.kind() == "extends_type_clause");
    let Some(clause) = clause else {
        return Vec::new();
    };
    let mut clause_cursor = clause.walk();
    clause
        .named_children(&mut clause_cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| node_text(&n, source).to_string())
        .collect()
}

/// The nearest leading doc-comment block, stripped of delimiters and per-line
/// markers; `None` when absent.
fn leading_doc(node: &Node, source: &str) -> Option<String> {
    let sibling = node.prev_named_sibling()?;
    if sibling.kind() != "comment" {
        return None;
    }
    let raw = node_text(&sibling, source);
    if !raw.starts_with("/**") {
        return None;
    }
    let cleaned = clean_doc_comment(raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

fn clean_doc_comment(raw: &str) -> String {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);
    let lines: Vec<String> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').unwrap_or(line).trim().to_string()
        })
        .collect();
    lines.join("\n").trim().to_string()
}
