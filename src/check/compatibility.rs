use std::path::{Path, PathBuf};

use super::SchemaChecker;
use crate::content::{self, TypedContent};
use crate::error::Result;
use crate::git::VersionResolver;
use crate::level::CompatibilityLevel;
use crate::outcome::{CommandKind, Outcome};
use crate::schema::SchemaSupport;

impl SchemaChecker<'_> {
    /// Check `proposed` against `existing` versions, given oldest first.
    pub fn check_compatibility(
        &self,
        existing: &[PathBuf],
        proposed: &Path,
        schema_type: &str,
        level: CompatibilityLevel,
    ) -> Result<Outcome> {
        let support = self.registry.resolve(schema_type)?;
        let proposed_content = content::load(proposed, support.content_type())?;
        let existing_contents = existing
            .iter()
            .map(|path| content::load(path, support.content_type()))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.compare(support, &existing_contents, &proposed_content, proposed, level))
    }

    /// Check the working-tree `file` against its content at `revision`
    /// (default `HEAD`).
    ///
    /// # Errors
    ///
    /// [`RevisionContentUnavailable`] when the revision does not contain the
    /// file.
    ///
    /// [`RevisionContentUnavailable`]: crate::error::CheckError::RevisionContentUnavailable
    pub fn diff(
        &self,
        file: &Path,
        revision: Option<&str>,
        schema_type: &str,
        level: CompatibilityLevel,
        resolver: &VersionResolver,
    ) -> Result<Outcome> {
        let support = self.registry.resolve(schema_type)?;
        let proposed_content = content::load(file, support.content_type())?;
        let previous = resolver.resolve(file, revision, support.content_type())?;

        Ok(self.compare(support, &[previous], &proposed_content, file, level))
    }

    fn compare(
        &self,
        support: &dyn SchemaSupport,
        existing: &[TypedContent],
        proposed: &TypedContent,
        file: &Path,
        level: CompatibilityLevel,
    ) -> Outcome {
        tracing::debug!(
            file = %file.display(),
            format = %support.format(),
            %level,
            versions = existing.len(),
            "checking compatibility"
        );
        let result = support
            .compatibility_checker()
            .test_compatibility(level, existing, proposed, &self.rules);

        if result.is_compatible() {
            Outcome::pass(CommandKind::Compatibility, file, level)
        } else {
            Outcome::fail(CommandKind::Compatibility, file, level, result.into_violations())
        }
    }
}
