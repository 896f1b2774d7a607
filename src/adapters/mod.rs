//! Adapter resolution.
//!
//! An adapter turns per-API configuration into a complete rule set,
//! contributing the pieces a configuration file cannot express: validation
//! predicates, class acceptance, custom renames. The default adapter is
//! purely configuration-driven.

use crate::config::ApiConfig;
use crate::core::rules::{ExtractionRules, NamingRule};
use crate::validate;

pub trait ApiAdapter: Send + Sync {
    fn api_id(&self) -> &str;

    /// Assemble the full rule set for one run.
    fn rules(&self, config: &ApiConfig) -> ExtractionRules;
}

/// Builds rules from the configuration file alone.
pub struct ConfigAdapter {
    api_id: String,
}

impl ConfigAdapter {
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
        }
    }
}

impl ApiAdapter for ConfigAdapter {
    fn api_id(&self) -> &str {
        &self.api_id
    }

    fn rules(&self, config: &ApiConfig) -> ExtractionRules {
        let mut rules = ExtractionRules::new(self.api_id.clone());
        rules.api_version = config.version.clone();
        rules.transforms = config.transforms.clone();
        rules.exclude_types = config.exclude_types.iter().cloned().collect();
        rules.naming = NamingRule {
            prefix: config.prefix.clone(),
            suffix: config.suffix.clone(),
            custom: None,
        };
        if !config.classes.is_empty() {
            let accepted = config.classes.clone();
            rules.class_filter = Some(Box::new(move |name: &str| {
                accepted.iter().any(|s| name.contains(s.as_str()))
            }));
        }
        if config.require_response_envelope {
            rules
                .structural_checks
                .push(validate::response_envelope_check());
        }
        rules
    }
}

/// Resolve the adapter for an API identifier. APIs without a registered
/// programmatic adapter fall back to the configuration-driven one.
pub fn resolve(api_id: &str) -> Box<dyn ApiAdapter> {
    Box::new(ConfigAdapter::new(api_id))
}
