//! Compatibility contract and the level dispatch protocol
//!
//! Formats usually implement [`SchemaDiffer`], which answers a single
//! question: can a consumer decoding with the *reader* schema accept every
//! document produced under the *writer* schema? The blanket
//! [`CompatibilityChecker`] implementation turns that into the level
//! semantics:
//!
//! - `BACKWARD`: existing version writes, proposed version reads
//! - `FORWARD`: proposed version writes, existing version reads
//! - `FULL`: both directions
//! - `*_TRANSITIVE`: the same against every existing version instead of
//!   the latest one only
//! - `NONE`: nothing is checked

use serde::{Deserialize, Serialize};

use crate::content::TypedContent;
use crate::level::CompatibilityLevel;
use crate::rules::{dedup, RuleConfig, RuleViolation};

/// One incompatibility between two schema versions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompatibilityDifference {
    pub description: String,
    /// Path of the incompatible element (e.g. `/properties/name/type`)
    pub context: String,
}

impl CompatibilityDifference {
    pub fn new(description: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: context.into(),
        }
    }

    pub fn as_rule_violation(&self) -> RuleViolation {
        RuleViolation::at(self.description.clone(), self.context.clone())
    }
}

/// Result of a compatibility check; compatible when no difference was found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibilityExecutionResult {
    incompatible_differences: Vec<CompatibilityDifference>,
}

impl CompatibilityExecutionResult {
    pub fn compatible() -> Self {
        Self::default()
    }

    pub fn from_differences(differences: Vec<CompatibilityDifference>) -> Self {
        Self {
            incompatible_differences: dedup(differences),
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.incompatible_differences.is_empty()
    }

    pub fn incompatible_differences(&self) -> &[CompatibilityDifference] {
        &self.incompatible_differences
    }

    pub fn into_violations(self) -> Vec<RuleViolation> {
        self.incompatible_differences
            .iter()
            .map(CompatibilityDifference::as_rule_violation)
            .collect()
    }
}

/// Checks a proposed schema against previous versions at a level
pub trait CompatibilityChecker: Send + Sync {
    /// `existing` is ordered oldest to newest.
    fn test_compatibility(
        &self,
        level: CompatibilityLevel,
        existing: &[TypedContent],
        proposed: &TypedContent,
        rules: &RuleConfig,
    ) -> CompatibilityExecutionResult;
}

/// Format-specific reader/writer comparison
pub trait SchemaDiffer: Send + Sync {
    /// Everything that prevents `reader` from accepting data written with
    /// `writer`. Content that does not parse is reported as a difference.
    fn differences(
        &self,
        writer: &TypedContent,
        reader: &TypedContent,
        rules: &RuleConfig,
    ) -> Vec<CompatibilityDifference>;
}

impl<T: SchemaDiffer> CompatibilityChecker for T {
    fn test_compatibility(
        &self,
        level: CompatibilityLevel,
        existing: &[TypedContent],
        proposed: &TypedContent,
        rules: &RuleConfig,
    ) -> CompatibilityExecutionResult {
        let Some(latest) = existing.len().checked_sub(1) else {
            return CompatibilityExecutionResult::compatible();
        };
        if level == CompatibilityLevel::None {
            return CompatibilityExecutionResult::compatible();
        }

        let history = if level.is_transitive() {
            existing
        } else {
            &existing[latest..]
        };
        tracing::debug!(%level, versions = history.len(), "testing compatibility");

        let mut differences = Vec::new();
        for previous in history {
            if level.checks_backward() {
                differences.extend(self.differences(previous, proposed, rules));
            }
            if level.checks_forward() {
                differences.extend(self.differences(proposed, previous, rules));
            }
        }

        CompatibilityExecutionResult::from_differences(differences)
    }
}
