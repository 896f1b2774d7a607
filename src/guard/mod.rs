//! Forbidden top-type enforcement.
//!
//! Scans every declaration's final definition text for the implicit `any`
//! keyword. Word-boundary matching keeps identifiers that merely contain the
//! token (`Anything`, `company`) out of scope. One violation anywhere aborts
//! the whole run; partial output is never offered.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{Error, Result};
use crate::core::{ExtractionContext, ExtractionError};

static ANY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bany\b").expect("static pattern"));

/// Width of the diagnostic snippet on each side of an occurrence.
const SNIPPET_WINDOW: usize = 20;

/// Guard stage entry point. Metrics and diagnostics recorded here survive on
/// the context even when the stage aborts.
pub fn run_guard(ctx: &mut ExtractionContext) -> Result<()> {
    let mut occurrences = 0usize;
    let mut violating_types = 0usize;
    let mut diagnostics: Vec<ExtractionError> = Vec::new();

    for ty in ctx.types.values() {
        let hits: Vec<(usize, usize)> = ANY_TOKEN
            .find_iter(&ty.definition)
            .map(|m| (m.start(), m.end()))
            .collect();
        if hits.is_empty() {
            continue;
        }

        violating_types += 1;
        occurrences += hits.len();
        for (start, end) in hits {
            let snippet = context_snippet(&ty.definition, start, end);
            diagnostics.push(
                ExtractionError::for_type(
                    ty.source_file.clone(),
                    ty.name.clone(),
                    format!("forbidden `any` type near \"{snippet}\""),
                )
                .at(ty.line, ty.column),
            );
        }
    }

    ctx.metrics.unknown_type_violations += violating_types;
    ctx.errors.extend(diagnostics);

    if occurrences > 0 {
        return Err(Error::ForbiddenType {
            occurrences,
            types: violating_types,
        });
    }
    Ok(())
}

/// Fixed-width surrounding text for one occurrence, flattened to one line.
fn context_snippet(text: &str, start: usize, end: usize) -> String {
    let mut lo = start.saturating_sub(SNIPPET_WINDOW);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + SNIPPET_WINDOW).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    text[lo..hi].replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::ExtractionRules;
    use crate::core::{ExtractedType, TypeKind};

    fn context_with_definition(definition: &str) -> ExtractionContext {
        let mut ctx = ExtractionContext::new(vec![], ExtractionRules::new("test"));
        let mut ty = ExtractedType::new("Sample", TypeKind::Interface, "src/sample.ts");
        ty.definition = definition.to_string();
        ctx.insert_type(ty);
        ctx
    }

    #[test]
    fn clean_definitions_pass() {
        let mut ctx = context_with_definition("interface Sample {\n  id: string;\n}");
        run_guard(&mut ctx).unwrap();
        assert_eq!(ctx.metrics.unknown_type_violations, 0);
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn substring_identifiers_are_not_violations() {
        let mut ctx = context_with_definition(
            "interface Sample {\n  company: string;\n  anything: Anything;\n  many: number;\n}",
        );
        run_guard(&mut ctx).unwrap();
        assert_eq!(ctx.metrics.unknown_type_violations, 0);
    }

    #[test]
    fn one_violation_per_type_one_error_per_occurrence() {
        let mut ctx =
            context_with_definition("interface Sample {\n  a: any;\n  b: any[];\n  c: string;\n}");
        let result = run_guard(&mut ctx);

        assert!(matches!(
            result,
            Err(Error::ForbiddenType {
                occurrences: 2,
                types: 1
            })
        ));
        assert_eq!(ctx.metrics.unknown_type_violations, 1);
        assert_eq!(ctx.errors.len(), 2);
        assert!(ctx.errors[0].message.contains("any"));
    }

    #[test]
    fn counts_span_multiple_types() {
        let mut ctx = ExtractionContext::new(vec![], ExtractionRules::new("test"));
        for name in ["A", "B"] {
            let mut ty = ExtractedType::new(name, TypeKind::TypeAlias, "src/t.ts");
            ty.definition = format!("type {name} = any;");
            ctx.insert_type(ty);
        }
        let result = run_guard(&mut ctx);
        assert!(matches!(
            result,
            Err(Error::ForbiddenType {
                occurrences: 2,
                types: 2
            })
        ));
        assert_eq!(ctx.metrics.unknown_type_violations, 2);
    }

    #[test]
    fn snippet_is_bounded_and_single_line() {
        let text = "interface Sample {\n  payload: any;\n}";
        let m = ANY_TOKEN.find(text).unwrap();
        let snippet = context_snippet(text, m.start(), m.end());
        assert!(snippet.contains("any"));
        assert!(!snippet.contains('\n'));
        assert!(snippet.len() <= "any".len() + 2 * SNIPPET_WINDOW);
    }
}
