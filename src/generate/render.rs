//! Per-declaration text rendering shared by the artifact writers.

use crate::core::{ExtractedType, PropertyInfo, TypeKind};

/// Render an interface declaration from its record: header with generic
/// parameters and supertypes, then one line per property in declared order.
pub fn render_interface_definition(ty: &ExtractedType) -> String {
    let mut out = String::from("interface ");
    out.push_str(&ty.name);
    if !ty.type_parameters.is_empty() {
        out.push('<');
        out.push_str(&ty.type_parameters.join(", "));
        out.push('>');
    }
    if !ty.extends.is_empty() {
        out.push_str(" extends ");
        out.push_str(&ty.extends.join(", "));
    }
    out.push_str(" {\n");
    for property in &ty.properties {
        out.push_str("  ");
        out.push_str(&render_property(property));
        out.push('\n');
    }
    out.push('}');
    out
}

/// One interface member line: `readonly name?: type;`
pub fn render_property(property: &PropertyInfo) -> String {
    let mut line = String::new();
    if property.readonly {
        line.push_str("readonly ");
    }
    line.push_str(&property.name);
    if property.optional {
        line.push('?');
    }
    line.push_str(": ");
    line.push_str(&property.ty);
    line.push(';');
    line
}

/// Prepend the export marker if and only if it is missing.
pub fn ensure_export(definition: &str) -> String {
    if definition.trim_start().starts_with("export ") {
        definition.to_string()
    } else {
        format!("export {definition}")
    }
}

/// Documentation block followed by the traceability trailer.
pub fn render_doc_header(ty: &ExtractedType) -> String {
    let mut lines = Vec::new();
    if let Some(doc) = &ty.documentation {
        for line in doc.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                lines.push(" *".to_string());
            } else {
                lines.push(format!(" * {line}"));
            }
        }
        lines.push(" *".to_string());
    }
    lines.push(format!(
        " * @source {}:{}",
        ty.source_file.display(),
        ty.line
    ));
    format!("/**\n{}\n */\n", lines.join("\n"))
}

/// Full block for one declaration: doc header, then the exported definition.
/// Interfaces interleave property doc comments; other kinds emit their stored
/// raw text.
pub fn render_type_block(ty: &ExtractedType) -> String {
    let mut out = render_doc_header(ty);
    match ty.kind {
        TypeKind::Interface => {
            out.push_str("export interface ");
            out.push_str(&ty.name);
            if !ty.type_parameters.is_empty() {
                out.push('<');
                out.push_str(&ty.type_parameters.join(", "));
                out.push('>');
            }
            if !ty.extends.is_empty() {
                out.push_str(" extends ");
                out.push_str(&ty.extends.join(", "));
            }
            out.push_str(" {\n");
            for property in &ty.properties {
                if let Some(doc) = &property.documentation {
                    out.push_str(&format!("  /** {} */\n", doc.replace('\n', " ")));
                }
                out.push_str("  ");
                out.push_str(&render_property(property));
                out.push('\n');
            }
            out.push('}');
        }
        _ => out.push_str(&ensure_export(&ty.definition)),
    }
    out.push('\n');
    out
}
