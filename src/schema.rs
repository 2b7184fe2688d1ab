//! Schema formats and the capability bundle each format provides

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::compatibility::CompatibilityChecker;
use crate::rules::validity::ContentValidator;

/// Schema description language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// JSON Schema documents
    Json,
    /// Avro schemas (`.avsc`)
    Avro,
    /// Protocol Buffers definitions
    Protobuf,
}

impl SchemaFormat {
    pub const ALL: [SchemaFormat; 3] =
        [SchemaFormat::Json, SchemaFormat::Avro, SchemaFormat::Protobuf];

    /// Name used by the `--type` option
    pub fn cli_name(&self) -> &'static str {
        match self {
            SchemaFormat::Json => "json",
            SchemaFormat::Avro => "avro",
            SchemaFormat::Protobuf => "protobuf",
        }
    }

    /// Canonical media type of documents in this format
    pub fn content_type(&self) -> &'static str {
        match self {
            SchemaFormat::Json => "application/json",
            SchemaFormat::Avro => "application/avro+json",
            SchemaFormat::Protobuf => "application/x-protobuf",
        }
    }

    /// Case-insensitive lookup by CLI name
    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.cli_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

/// Everything the orchestrators need from one schema format.
///
/// Implemented once per format and registered in
/// [`crate::registry::SchemaTypeRegistry`]. Callers only ever see the trait.
pub trait SchemaSupport: Send + Sync {
    fn format(&self) -> SchemaFormat;

    fn content_validator(&self) -> &dyn ContentValidator;

    fn compatibility_checker(&self) -> &dyn CompatibilityChecker;

    fn content_type(&self) -> &'static str {
        self.format().content_type()
    }
}
