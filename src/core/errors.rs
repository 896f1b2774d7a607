//! Shared error types for the extraction pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for declmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Parsing errors
    #[error("Parse error in {file}:{line}:{column}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Transformation errors
    #[error("Transformation error: {0}")]
    Transformation(String),

    /// Forbidden top-type detection; the run aborts with no artifact written
    #[error("forbidden `any` type: {occurrences} occurrence(s) across {types} declaration(s)")]
    ForbiddenType { occurrences: usize, types: usize },

    /// Exported name drift against the committed contracts artifact
    #[error("contract drift for `{api}`: added [{}], removed [{}]", .added.join(", "), .removed.join(", "))]
    Drift {
        api: String,
        added: Vec<String>,
        removed: Vec<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Glob pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a parse error with location
    pub fn parse(
        file: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// True for conditions that abort generation before any file write.
    pub fn is_drift(&self) -> bool {
        matches!(self, Self::Drift { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_error_lists_names() {
        let err = Error::Drift {
            api: "billing".into(),
            added: vec!["CardPayment".into()],
            removed: vec!["LegacyPayment".into()],
        };
        let message = err.to_string();
        assert!(message.contains("billing"));
        assert!(message.contains("CardPayment"));
        assert!(message.contains("LegacyPayment"));
    }

    #[test]
    fn forbidden_type_error_counts() {
        let err = Error::ForbiddenType {
            occurrences: 3,
            types: 2,
        };
        assert!(err.to_string().contains('3'));
        assert!(!err.is_drift());
    }
}
