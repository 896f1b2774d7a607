//! Configuration surface for the command-line front end.
//!
//! The pipeline itself never loads configuration; it receives a fully formed
//! rule set. This module exists for the binary: discovering `.declmap.toml`,
//! parsing it, and expanding include globs into a concrete file list.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::Result;
use crate::core::rules::TypeTransform;

/// Top-level configuration file shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclmapConfig {
    /// Directory artifacts are written into; relative to the config file.
    pub output_dir: Option<PathBuf>,
    /// One section per target API, keyed by API identifier.
    pub apis: BTreeMap<String, ApiConfig>,
}

/// Per-API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub version: String,
    /// Glob patterns naming candidate source files.
    pub include: Vec<String>,
    pub exclude_types: Vec<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Class-name substrings accepted for extraction; empty rejects all.
    pub classes: Vec<String>,
    /// Require a `success` field on interfaces named `*Response`.
    pub require_response_envelope: bool,
    pub split: bool,
    pub file_pattern: Option<String>,
    pub contracts_pattern: Option<String>,
    pub module: Option<String>,
    pub fail_on_drift: bool,
    pub transforms: BTreeMap<String, TypeTransform>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: "0.0.0".to_string(),
            include: Vec::new(),
            exclude_types: Vec::new(),
            prefix: None,
            suffix: None,
            classes: Vec::new(),
            require_response_envelope: false,
            split: false,
            file_pattern: None,
            contracts_pattern: None,
            module: None,
            fail_on_drift: false,
            transforms: BTreeMap::new(),
        }
    }
}

/// Expand include globs into a sorted, deduplicated file list.
pub fn resolve_files(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base_dir.join(pattern).to_string_lossy().into_owned()
        };
        for entry in glob::glob(&full)? {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => log::warn!("skipping unreadable path: {e}"),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
