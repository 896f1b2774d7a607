//! Extraction map manifest.
//!
//! Persisted on every successful run: which source file contributed which
//! declaration names.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::ExtractionContext;

pub const MANIFEST_VERSION: u32 = 1;
const MANIFEST_PATTERN: &str = "{api}.extraction-map.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionManifest {
    pub version: u32,
    pub generated: DateTime<Utc>,
    pub api_id: String,
    pub api_version: String,
    /// source file path -> sorted declaration names
    pub types: BTreeMap<String, Vec<String>>,
}

/// Assemble the manifest from the final context.
pub fn build(ctx: &ExtractionContext) -> ExtractionManifest {
    let mut types: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for ty in ctx.types.values() {
        types
            .entry(ty.source_file.display().to_string())
            .or_default()
            .push(ty.name.clone());
    }
    for names in types.values_mut() {
        names.sort();
    }
    ExtractionManifest {
        version: MANIFEST_VERSION,
        generated: Utc::now(),
        api_id: ctx.rules.api_id.clone(),
        api_version: ctx.rules.api_version.clone(),
        types,
    }
}

pub fn manifest_path(output_dir: &Path, api: &str) -> PathBuf {
    output_dir.join(MANIFEST_PATTERN.replace("{api}", api))
}

/// Write the manifest next to the generated artifacts.
pub fn write_manifest(ctx: &ExtractionContext, output_dir: &Path) -> Result<PathBuf> {
    let manifest = build(ctx);
    let path = manifest_path(output_dir, &ctx.rules.api_id);
    fs::create_dir_all(output_dir)?;
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    log::debug!("wrote extraction map to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::ExtractionRules;
    use crate::core::{ExtractedType, TypeKind};

    #[test]
    fn manifest_groups_names_by_file_sorted() {
        let mut rules = ExtractionRules::new("billing");
        rules.api_version = "2.1.0".to_string();
        let mut ctx = ExtractionContext::new(vec![], rules);
        ctx.insert_type(ExtractedType::new("Zeta", TypeKind::Interface, "src/z.ts"));
        ctx.insert_type(ExtractedType::new("Alpha", TypeKind::Interface, "src/z.ts"));
        ctx.insert_type(ExtractedType::new("Solo", TypeKind::Enum, "src/s.ts"));

        let manifest = build(&ctx);
        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.api_id, "billing");
        assert_eq!(manifest.api_version, "2.1.0");
        assert_eq!(manifest.types["src/z.ts"], vec!["Alpha", "Zeta"]);
        assert_eq!(manifest.types["src/s.ts"], vec!["Solo"]);
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let ctx = ExtractionContext::new(vec![], ExtractionRules::new("demo"));
        let manifest = build(&ctx);
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: ExtractionManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_id, "demo");
        assert_eq!(parsed.version, MANIFEST_VERSION);
    }
}
