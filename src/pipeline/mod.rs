//! The extraction pipeline.
//!
//! One invocation owns one context and runs each stage at most once, in
//! order: extract, transform, validate, guard, generate, then the drift
//! check and the extraction map. A fatal stage unwinds immediately; the
//! failure carries the context so metrics and diagnostics accumulated up to
//! the abort stay reachable.

use std::fmt;
use std::path::PathBuf;

use crate::core::errors::{Error, Result};
use crate::core::rules::ExtractionRules;
use crate::core::ExtractionContext;
use crate::generate::{self, GenerationReport, GeneratorConfig};
use crate::manifest;
use crate::{extraction, guard, transform, validate};

/// Options for a full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub generator: GeneratorConfig,
}

impl PipelineOptions {
    pub fn new(generator: GeneratorConfig) -> Self {
        Self { generator }
    }
}

/// A fatal failure with the run's context attached for diagnostics.
#[derive(Debug)]
pub struct PipelineFailure {
    pub error: Error,
    pub context: Box<ExtractionContext>,
}

impl PipelineFailure {
    fn new(error: Error, context: ExtractionContext) -> Self {
        Self {
            error,
            context: Box::new(context),
        }
    }
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} diagnostic(s) recorded)",
            self.error,
            self.context.errors.len()
        )
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of a successful full run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub context: ExtractionContext,
    pub report: GenerationReport,
    pub manifest_path: PathBuf,
}

/// Run the in-memory stages and return the finished context.
pub fn extract(
    files: Vec<PathBuf>,
    rules: ExtractionRules,
) -> std::result::Result<ExtractionContext, PipelineFailure> {
    let mut ctx = ExtractionContext::new(files, rules);
    if let Err(error) = run_stages(&mut ctx) {
        return Err(PipelineFailure::new(error, ctx));
    }
    Ok(ctx)
}

/// Run the whole pipeline, including artifact generation, the drift check,
/// and the extraction map.
pub fn run(
    files: Vec<PathBuf>,
    rules: ExtractionRules,
    options: &PipelineOptions,
) -> std::result::Result<PipelineOutcome, PipelineFailure> {
    let mut ctx = extract(files, rules)?;

    let report = match generate::write_artifacts(&ctx, &options.generator) {
        Ok(report) => report,
        Err(error) => return Err(PipelineFailure::new(error, ctx)),
    };
    let manifest_path = match manifest::write_manifest(&ctx, &options.generator.output_dir) {
        Ok(path) => path,
        Err(error) => return Err(PipelineFailure::new(error, ctx)),
    };

    ctx.release_syntax();
    log::info!(
        "pipeline finished for `{}`: {} type(s), {} error(s)",
        ctx.rules.api_id,
        ctx.types.len(),
        ctx.errors.len()
    );
    Ok(PipelineOutcome {
        context: ctx,
        report,
        manifest_path,
    })
}

fn run_stages(ctx: &mut ExtractionContext) -> Result<()> {
    extraction::run_extraction(ctx)?;
    transform::run_transformations(ctx)?;
    validate::run_validations(ctx)?;
    guard::run_guard(ctx)?;
    ctx.metrics.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;
    use std::io::Write;

    fn write_source(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn extract_runs_all_in_memory_stages() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_source(&dir, "model.ts", "export interface User { id: string; }");

        let ctx = extract(vec![path], ExtractionRules::new("demo")).unwrap();
        assert_eq!(ctx.metrics.types_extracted, 1);
        assert_eq!(ctx.metrics.unknown_type_violations, 0);
        // Interface definitions are re-rendered after transformation.
        assert_eq!(ctx.types["User"].definition, "interface User {\n  id: string;\n}");
    }

    #[test]
    fn failure_keeps_accumulated_metrics_reachable() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = write_source(&dir, "a.ts", "interface Good { id: string; }");
        let bad = write_source(&dir, "b.ts", "interface Bad { id: any; }");

        let failure = extract(vec![good, bad], ExtractionRules::new("demo")).unwrap_err();
        assert!(matches!(failure.error, Error::ForbiddenType { .. }));
        assert_eq!(failure.context.metrics.files_parsed, 2);
        assert_eq!(failure.context.metrics.types_extracted, 2);
        assert_eq!(failure.context.metrics.unknown_type_violations, 1);
        assert_eq!(failure.context.errors.len(), 1);
    }
}
