//! API-specific extraction rules.
//!
//! Supplied fully formed by an adapter and treated as read-only configuration
//! by the pipeline. Function-valued pieces (validators, class predicates,
//! custom renames) carry behavior the configuration file cannot express.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::{ExtractedType, PropertyInfo};

/// Outcome of one validation predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn pass() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Predicate run against a single declaration.
pub type ValidatorFn = Box<dyn Fn(&ExtractedType) -> Validation + Send + Sync>;

/// Adapter-supplied synthesis pass over the whole declaration set; returns
/// the names of the types it changed.
pub type TransformHook =
    Box<dyn Fn(&mut BTreeMap<String, ExtractedType>) -> Vec<String> + Send + Sync>;

/// Custom rename hook applied to every declaration name.
pub type RenameFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Decides whether a class declaration is extracted at all.
pub type ClassPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Naming convention for a target API. Prefix and suffix are idempotent: a
/// name that already conforms is left alone.
#[derive(Default)]
pub struct NamingRule {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub custom: Option<RenameFn>,
}

impl NamingRule {
    pub fn apply(&self, name: &str) -> String {
        if let Some(custom) = &self.custom {
            return custom(name);
        }
        let mut renamed = name.to_string();
        if let Some(prefix) = &self.prefix {
            if !renamed.starts_with(prefix.as_str()) {
                renamed = format!("{prefix}{renamed}");
            }
        }
        if let Some(suffix) = &self.suffix {
            if !renamed.ends_with(suffix.as_str()) {
                renamed.push_str(suffix);
            }
        }
        renamed
    }
}

impl fmt::Debug for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamingRule")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Edits applied to one property of a transformed type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyTransform {
    pub rename: Option<String>,
    /// Replacement type expression.
    pub retype: Option<String>,
    pub optional: Option<bool>,
    pub readonly: Option<bool>,
}

/// Synthesizes a discriminated union from a base type: one variant per
/// literal, each with the discriminator narrowed to that literal, and the
/// base replaced by the union alias over all variant names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminatorSpec {
    pub property: String,
    /// literal value -> variant type name
    pub variants: BTreeMap<String, String>,
}

/// Rule-driven edits for one declaration, keyed by its extracted name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeTransform {
    pub rename: Option<String>,
    pub add_properties: Vec<PropertyInfo>,
    pub remove_properties: Vec<String>,
    pub property_transforms: BTreeMap<String, PropertyTransform>,
    pub discriminator: Option<DiscriminatorSpec>,
}

impl TypeTransform {
    pub fn is_empty(&self) -> bool {
        self.rename.is_none()
            && self.add_properties.is_empty()
            && self.remove_properties.is_empty()
            && self.property_transforms.is_empty()
            && self.discriminator.is_none()
    }
}

/// Complete rule set for one API, assembled by an adapter.
pub struct ExtractionRules {
    pub api_id: String,
    pub api_version: String,
    pub transforms: BTreeMap<String, TypeTransform>,
    /// Synthesis passes that run after the declarative transforms.
    pub custom_transforms: Vec<TransformHook>,
    pub exclude_types: BTreeSet<String>,
    /// Per-type predicates keyed by declaration name.
    pub validators: BTreeMap<String, ValidatorFn>,
    /// Checks run against every declaration.
    pub structural_checks: Vec<ValidatorFn>,
    pub naming: NamingRule,
    /// Classes are skipped entirely unless this predicate accepts their name.
    pub class_filter: Option<ClassPredicate>,
}

impl ExtractionRules {
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            api_version: "0.0.0".to_string(),
            transforms: BTreeMap::new(),
            custom_transforms: Vec::new(),
            exclude_types: BTreeSet::new(),
            validators: BTreeMap::new(),
            structural_checks: Vec::new(),
            naming: NamingRule::default(),
            class_filter: None,
        }
    }

    pub fn accepts_class(&self, name: &str) -> bool {
        self.class_filter.as_ref().map(|f| f(name)).unwrap_or(false)
    }
}

impl fmt::Debug for ExtractionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRules")
            .field("api_id", &self.api_id)
            .field("api_version", &self.api_version)
            .field("transforms", &self.transforms)
            .field("custom_transforms", &self.custom_transforms.len())
            .field("exclude_types", &self.exclude_types)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("structural_checks", &self.structural_checks.len())
            .field("naming", &self.naming)
            .field("class_filter", &self.class_filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_not_applied_twice() {
        let naming = NamingRule {
            prefix: Some("Test".to_string()),
            suffix: None,
            custom: None,
        };
        assert_eq!(naming.apply("User"), "TestUser");
        assert_eq!(naming.apply("TestUser"), "TestUser");
    }

    #[test]
    fn suffix_is_idempotent() {
        let naming = NamingRule {
            prefix: None,
            suffix: Some("Dto".to_string()),
            custom: None,
        };
        assert_eq!(naming.apply("User"), "UserDto");
        assert_eq!(naming.apply("UserDto"), "UserDto");
    }

    #[test]
    fn custom_rename_overrides_prefix_and_suffix() {
        let naming = NamingRule {
            prefix: Some("Test".to_string()),
            suffix: None,
            custom: Some(Box::new(|name| name.to_ascii_uppercase())),
        };
        assert_eq!(naming.apply("User"), "USER");
    }

    #[test]
    fn default_rules_reject_all_classes() {
        let rules = ExtractionRules::new("test");
        assert!(!rules.accepts_class("ApiClient"));
    }

    #[test]
    fn empty_transform_is_detected() {
        assert!(TypeTransform::default().is_empty());
        let t = TypeTransform {
            rename: Some("Other".into()),
            ..Default::default()
        };
        assert!(!t.is_empty());
    }
}
