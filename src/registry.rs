//! Schema type catalog
//!
//! Maps each [`SchemaFormat`] to the [`SchemaSupport`] bundle implementing
//! it. The catalog is filled once at startup and read-only afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{CheckError, Result};
use crate::formats::avro::AvroSchemaSupport;
use crate::formats::json::JsonSchemaSupport;
use crate::schema::{SchemaFormat, SchemaSupport};

/// Format catalog
#[derive(Default)]
pub struct SchemaTypeRegistry {
    supports: HashMap<SchemaFormat, Box<dyn SchemaSupport>>,
}

impl SchemaTypeRegistry {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every format this crate implements
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(JsonSchemaSupport::new());
        registry.register(AvroSchemaSupport::new());
        registry
    }

    /// The process-wide catalog, built on first use
    pub fn global() -> &'static SchemaTypeRegistry {
        static GLOBAL: OnceLock<SchemaTypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Register the bundle for the format it reports. A later registration
    /// for the same format replaces the earlier one.
    pub fn register(&mut self, support: impl SchemaSupport + 'static) {
        let format = support.format();
        tracing::debug!(%format, "registering schema support");
        self.supports.insert(format, Box::new(support));
    }

    /// Formats with registered support, in declaration order
    pub fn supported(&self) -> Vec<SchemaFormat> {
        SchemaFormat::ALL
            .into_iter()
            .filter(|format| self.supports.contains_key(format))
            .collect()
    }

    /// Look up the bundle for a format
    pub fn get(&self, format: SchemaFormat) -> Result<&dyn SchemaSupport> {
        self.supports
            .get(&format)
            .map(|support| support.as_ref())
            .ok_or_else(|| CheckError::UnregisteredFormat(format.cli_name().to_string()))
    }

    /// Look up the bundle by `--type` name (case-insensitive)
    pub fn resolve(&self, cli_name: &str) -> Result<&dyn SchemaSupport> {
        let format =
            SchemaFormat::from_cli_name(cli_name).ok_or_else(|| CheckError::UnsupportedFormat {
                name: cli_name.to_string(),
                supported: self
                    .supported()
                    .iter()
                    .map(SchemaFormat::cli_name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        self.get(format)
    }
}
