//! Error types for schema checking

use std::path::PathBuf;

use thiserror::Error;

/// Result type for check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Fatal errors. Rule violations and incompatibilities are not errors; they
/// are reported through [`crate::outcome::Outcome`].
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Unsupported schema type: {name}. Supported: {supported}")]
    UnsupportedFormat { name: String, supported: String },

    #[error("No support registered for schema type: {0}")]
    UnregisteredFormat(String),

    #[error("Missing required option '--type' (and no defaults.schema_type configured)")]
    MissingSchemaType,

    #[error("Cannot read schema file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found in git at {revision}:{path}")]
    RevisionContentUnavailable { revision: String, path: String },

    #[error("Failed to run {program}: {source}")]
    Git {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Git error: {0}")]
    LibGit2(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
