//! Structural and rule-supplied validation.
//!
//! Runs every adapter-supplied structural check plus any per-name predicate
//! against each declaration. Failures are recorded as diagnostics and counted
//! in the metrics; the run always continues. The declaration set itself is
//! never mutated here.

use crate::core::errors::Result;
use crate::core::rules::{Validation, ValidatorFn};
use crate::core::{ExtractionContext, ExtractionError, TypeKind};

/// Validation stage entry point.
pub fn run_validations(ctx: &mut ExtractionContext) -> Result<()> {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut diagnostics: Vec<ExtractionError> = Vec::new();

    for ty in ctx.types.values() {
        let mut outcomes: Vec<Validation> = Vec::new();
        for check in &ctx.rules.structural_checks {
            outcomes.push(check(ty));
        }
        if let Some(validator) = ctx.rules.validators.get(&ty.name) {
            outcomes.push(validator(ty));
        }

        for outcome in outcomes {
            if outcome.valid {
                passed += 1;
            } else {
                failed += 1;
                for message in outcome.errors {
                    diagnostics.push(
                        ExtractionError::for_type(ty.source_file.clone(), ty.name.clone(), message)
                            .at(ty.line, ty.column),
                    );
                }
            }
            for warning in outcome.warnings {
                log::warn!("validation warning for `{}`: {warning}", ty.name);
            }
        }
    }

    ctx.metrics.validations_passed += passed;
    ctx.metrics.validations_failed += failed;
    ctx.errors.extend(diagnostics);
    Ok(())
}

/// Structural check: interfaces named `*Response` must expose a `success`
/// field.
pub fn response_envelope_check() -> ValidatorFn {
    Box::new(|ty| {
        if ty.kind != TypeKind::Interface || !ty.name.ends_with("Response") {
            return Validation::pass();
        }
        if ty.properties.iter().any(|p| p.name == "success") {
            Validation::pass()
        } else {
            Validation::fail(vec![format!(
                "`{}` must expose a `success` field",
                ty.name
            )])
        }
    })
}
