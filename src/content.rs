//! Schema content tagged with its media type, and the file loader

use std::fs;
use std::path::Path;

use crate::error::{CheckError, Result};

/// Raw schema text plus the media type it is declared as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedContent {
    content: String,
    content_type: &'static str,
}

impl TypedContent {
    pub fn new(content: impl Into<String>, content_type: &'static str) -> Self {
        Self {
            content: content.into(),
            content_type,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// Read a whole schema file. No parsing happens here; the media type is
/// only metadata for the engines.
pub fn load(path: &Path, content_type: &'static str) -> Result<TypedContent> {
    tracing::debug!(path = %path.display(), content_type, "loading schema file");
    let content = fs::read_to_string(path).map_err(|source| CheckError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TypedContent::new(content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_tags_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, r#"{"type": "string"}"#).unwrap();

        let content = load(&path, "application/json").unwrap();
        assert_eq!(content.content(), r#"{"type": "string"}"#);
        assert_eq!(content.content_type(), "application/json");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        match load(&path, "application/json") {
            Err(CheckError::FileUnreadable { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected FileUnreadable, got {:?}", other),
        }
    }
}
