//! Validation and compatibility orchestration
//!
//! A [`SchemaChecker`] resolves the schema type against the catalog, loads
//! the files, hands them to the format engine and normalizes whatever the
//! engine says into an [`Outcome`](crate::outcome::Outcome). Only rule
//! violations and incompatibilities become outcomes; every other failure
//! is returned as a [`CheckError`](crate::error::CheckError).

mod compatibility;
mod validate;

use crate::registry::SchemaTypeRegistry;
use crate::rules::RuleConfig;

/// Runs checks against a format catalog with a fixed rule configuration
pub struct SchemaChecker<'r> {
    registry: &'r SchemaTypeRegistry,
    rules: RuleConfig,
}

impl<'r> SchemaChecker<'r> {
    pub fn new(registry: &'r SchemaTypeRegistry) -> Self {
        Self {
            registry,
            rules: RuleConfig::new(),
        }
    }

    /// Engine options passed to every validator and checker call
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }
}

impl Default for SchemaChecker<'static> {
    fn default() -> Self {
        Self::new(SchemaTypeRegistry::global())
    }
}
