//! Name-level drift detection against the committed contracts artifact.
//!
//! Exported declaration names are recovered from artifact text with a
//! pattern match over declaration headers, not a structural parse. A body
//! edit that keeps the name set intact is therefore not reported as drift.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{Error, Result};

static DECLARATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*export\s+(?:abstract\s+)?(?:interface|type|enum|class)\s+([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("static pattern")
});

/// Names added to and removed from the exported set, each sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriftReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Extract the set of exported declaration names from artifact text.
pub fn exported_names(text: &str) -> BTreeSet<String> {
    DECLARATION_HEADER
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Compare a committed artifact against the candidate replacement.
pub fn diff(previous: &str, candidate: &str) -> DriftReport {
    if previous == candidate {
        return DriftReport::default();
    }
    let before = exported_names(previous);
    let after = exported_names(candidate);
    DriftReport {
        added: after.difference(&before).cloned().collect(),
        removed: before.difference(&after).cloned().collect(),
    }
}

/// Evaluate drift for the artifact at `path`. No prior artifact means no
/// drift.
pub fn check(path: &Path, candidate: &str) -> Result<DriftReport> {
    if !path.exists() {
        return Ok(DriftReport::default());
    }
    let previous = fs::read_to_string(path).map_err(|e| Error::FileSystem {
        message: "failed to read committed contracts artifact".to_string(),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;
    let report = diff(&previous, candidate);
    if report.has_drift() {
        log::warn!(
            "contract drift at {}: {} added, {} removed",
            path.display(),
            report.added.len(),
            report.removed.len()
        );
    }
    Ok(report)
}
