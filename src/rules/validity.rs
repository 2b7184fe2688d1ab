//! Single-document validity contract

use crate::content::TypedContent;
use crate::level::ValidityLevel;
use crate::rules::{RuleConfig, RuleViolationError};

/// Checks one schema document at a given strictness
pub trait ContentValidator: Send + Sync {
    /// Returns normally when `content` satisfies every rule of `level`.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleViolationError`] listing what is wrong.
    fn validate(
        &self,
        level: ValidityLevel,
        content: &TypedContent,
        rules: &RuleConfig,
    ) -> Result<(), RuleViolationError>;
}
