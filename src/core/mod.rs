pub mod ast;
pub mod errors;
pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::ast::SyntaxHandle;
use crate::core::rules::ExtractionRules;

/// Name given to declarations whose name cannot be recovered from source.
/// A second anonymous declaration in the same run overwrites the first.
pub const ANONYMOUS_NAME: &str = "__anonymous__";

/// Kind of extracted declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Interface,
    TypeAlias,
    Enum,
    Class,
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Interface => "interface",
            TypeKind::TypeAlias => "type alias",
            TypeKind::Enum => "enum",
            TypeKind::Class => "class",
        }
    }
}

/// A single member of an interface declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    /// String-rendered type expression.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            readonly: false,
            documentation: None,
        }
    }
}

/// One extracted declaration.
///
/// `properties` is populated for interfaces only; other kinds keep their raw
/// declaration text in `definition` for verbatim re-emission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractedType {
    pub name: String,
    pub kind: TypeKind,
    /// Full rendered declaration text. For interfaces this is re-rendered
    /// from `properties` once transformations have run.
    pub definition: String,
    pub source_file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub is_exported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub extends: Vec<String>,
    /// Parse-phase handle back to the declaration's syntax node. Dropped
    /// before the run finishes; never serialized.
    #[serde(skip)]
    pub syntax: Option<SyntaxHandle>,
}

impl ExtractedType {
    pub fn new(name: impl Into<String>, kind: TypeKind, source_file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: String::new(),
            source_file: source_file.into(),
            line: 1,
            column: 1,
            is_exported: false,
            documentation: None,
            properties: Vec::new(),
            type_parameters: Vec::new(),
            extends: Vec::new(),
            syntax: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A recoverable diagnostic attached to the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl ExtractionError {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            type_name: None,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn for_type(
        file: impl Into<PathBuf>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            type_name: Some(type_name.into()),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Counters accumulated over one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metrics {
    pub start_time: DateTime<Utc>,
    pub files_parsed: usize,
    pub types_extracted: usize,
    pub transforms_applied: usize,
    pub validations_passed: usize,
    pub validations_failed: usize,
    pub unknown_type_violations: usize,
    /// Wall-clock duration of the run, recorded once when the last in-memory
    /// stage completes so that artifact rendering stays deterministic.
    pub elapsed_ms: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            files_parsed: 0,
            types_extracted: 0,
            transforms_applied: 0,
            validations_passed: 0,
            validations_failed: 0,
            unknown_type_violations: 0,
            elapsed_ms: 0,
        }
    }

    pub fn finish(&mut self) {
        if self.elapsed_ms == 0 {
            let elapsed = Utc::now().signed_duration_since(self.start_time);
            self.elapsed_ms = elapsed.num_milliseconds().max(0) as u64;
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// The single mutable unit of one run. Created fresh at run start, owned by
/// exactly one invocation, discarded at run end.
#[derive(Debug)]
pub struct ExtractionContext {
    /// Input files, sorted lexicographically so processing order is stable.
    pub files: Vec<PathBuf>,
    /// Name-keyed declarations. A later write under the same name silently
    /// replaces the earlier one (logged at warn).
    pub types: BTreeMap<String, ExtractedType>,
    pub rules: ExtractionRules,
    pub metrics: Metrics,
    pub errors: Vec<ExtractionError>,
}

impl ExtractionContext {
    pub fn new(mut files: Vec<PathBuf>, rules: ExtractionRules) -> Self {
        files.sort();
        files.dedup();
        Self {
            files,
            types: BTreeMap::new(),
            rules,
            metrics: Metrics::new(),
            errors: Vec::new(),
        }
    }

    /// Insert a declaration under its name, last write wins.
    pub fn insert_type(&mut self, ty: ExtractedType) {
        let name = ty.name.clone();
        if self.types.insert(name.clone(), ty).is_some() {
            log::warn!("declaration `{name}` redefined; keeping the latest definition");
        }
    }

    /// Drop all parse-phase syntax handles.
    pub fn release_syntax(&mut self) {
        for ty in self.types.values_mut() {
            ty.syntax = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_type_replaces_existing_entry() {
        let mut ctx = ExtractionContext::new(vec![], ExtractionRules::new("test"));
        let first = ExtractedType::new("User", TypeKind::Interface, "a.ts");
        let second = ExtractedType::new("User", TypeKind::Interface, "b.ts");

        ctx.insert_type(first);
        ctx.insert_type(second);

        assert_eq!(ctx.types.len(), 1);
        assert_eq!(ctx.types["User"].source_file, PathBuf::from("b.ts"));
    }

    #[test]
    fn context_sorts_and_dedupes_files() {
        let files = vec![
            PathBuf::from("b.ts"),
            PathBuf::from("a.ts"),
            PathBuf::from("b.ts"),
        ];
        let ctx = ExtractionContext::new(files, ExtractionRules::new("test"));
        assert_eq!(ctx.files, vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]);
    }

    #[test]
    fn metrics_finish_records_once() {
        let mut metrics = Metrics::new();
        metrics.elapsed_ms = 42;
        metrics.finish();
        assert_eq!(metrics.elapsed_ms, 42);
    }
}
