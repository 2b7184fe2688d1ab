//! Avro schema support

mod compatibility;
mod validator;

pub use compatibility::AvroSchemaDiffer;
pub use validator::AvroContentValidator;

use crate::rules::compatibility::CompatibilityChecker;
use crate::rules::validity::ContentValidator;
use crate::schema::{SchemaFormat, SchemaSupport};

/// Capability bundle for Avro
#[derive(Debug, Default)]
pub struct AvroSchemaSupport {
    validator: AvroContentValidator,
    checker: AvroSchemaDiffer,
}

impl AvroSchemaSupport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaSupport for AvroSchemaSupport {
    fn format(&self) -> SchemaFormat {
        SchemaFormat::Avro
    }

    fn content_validator(&self) -> &dyn ContentValidator {
        &self.validator
    }

    fn compatibility_checker(&self) -> &dyn CompatibilityChecker {
        &self.checker
    }
}
