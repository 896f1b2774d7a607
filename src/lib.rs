//! declmap extracts declaration-level type information from TypeScript
//! sources, transforms it under API-specific rules, validates it, enforces a
//! ban on the implicit `any` top-type, renders versioned contract artifacts,
//! and reports name-level drift against the previously committed artifact.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod drift;
pub mod extraction;
pub mod generate;
pub mod guard;
pub mod manifest;
pub mod pipeline;
pub mod transform;
pub mod validate;

// Re-export commonly used types
pub use crate::core::errors::{Error, Result};
pub use crate::core::rules::{
    DiscriminatorSpec, ExtractionRules, NamingRule, PropertyTransform, TypeTransform, Validation,
};
pub use crate::core::{
    ExtractedType, ExtractionContext, ExtractionError, Metrics, PropertyInfo, TypeKind,
};
pub use crate::drift::DriftReport;
pub use crate::generate::{GenerationReport, GeneratorConfig};
pub use crate::manifest::ExtractionManifest;
pub use crate::pipeline::{extract, run, PipelineFailure, PipelineOptions, PipelineOutcome};
