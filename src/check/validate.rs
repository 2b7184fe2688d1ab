use std::path::Path;

use super::SchemaChecker;
use crate::content;
use crate::error::Result;
use crate::level::ValidityLevel;
use crate::outcome::{CommandKind, Outcome};

impl SchemaChecker<'_> {
    /// Validate one schema file at `level`.
    ///
    /// # Errors
    ///
    /// Unknown or unregistered schema types and unreadable files. Rule
    /// violations are a failing [`Outcome`], not an error.
    pub fn validate(
        &self,
        file: &Path,
        schema_type: &str,
        level: ValidityLevel,
    ) -> Result<Outcome> {
        let support = self.registry.resolve(schema_type)?;
        let content = content::load(file, support.content_type())?;

        tracing::debug!(file = %file.display(), format = %support.format(), %level, "validating");
        match support.content_validator().validate(level, &content, &self.rules) {
            Ok(()) => Ok(Outcome::pass(CommandKind::Validate, file, level)),
            Err(e) => Ok(Outcome::fail(CommandKind::Validate, file, level, e.into_violations())),
        }
    }
}
