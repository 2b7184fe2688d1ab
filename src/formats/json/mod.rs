//! JSON Schema support

mod compatibility;
mod validator;

pub use compatibility::JsonSchemaDiffer;
pub use validator::JsonSchemaContentValidator;

use serde_json::Value;

use crate::rules::compatibility::CompatibilityChecker;
use crate::rules::validity::ContentValidator;
use crate::schema::{SchemaFormat, SchemaSupport};

/// Rule key that turns local `$ref` resolution checks off when set to `false`
pub const CHECK_REFS_RULE: &str = "json.check-refs";

/// Capability bundle for JSON Schema
#[derive(Debug, Default)]
pub struct JsonSchemaSupport {
    validator: JsonSchemaContentValidator,
    checker: JsonSchemaDiffer,
}

impl JsonSchemaSupport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaSupport for JsonSchemaSupport {
    fn format(&self) -> SchemaFormat {
        SchemaFormat::Json
    }

    fn content_validator(&self) -> &dyn ContentValidator {
        &self.validator
    }

    fn compatibility_checker(&self) -> &dyn CompatibilityChecker {
        &self.checker
    }
}

/// Resolve a local reference (`#`, `#/json/pointer` or `#anchor`) inside
/// `root`
pub(crate) fn resolve_local_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let fragment = reference.strip_prefix('#')?;
    if fragment.is_empty() {
        return Some(root);
    }
    if fragment.starts_with('/') {
        return root.pointer(fragment);
    }
    find_anchor(root, fragment)
}

fn find_anchor<'a>(schema: &'a Value, anchor: &str) -> Option<&'a Value> {
    match schema {
        Value::Object(map) => {
            let declared = map.get("$anchor").and_then(Value::as_str) == Some(anchor)
                || map
                    .get("$id")
                    .or_else(|| map.get("id"))
                    .and_then(Value::as_str)
                    .and_then(|id| id.strip_prefix('#'))
                    == Some(anchor);
            if declared {
                return Some(schema);
            }
            map.iter()
                .filter(|(key, _)| !is_literal_keyword(key))
                .find_map(|(_, child)| find_anchor(child, anchor))
        }
        Value::Array(items) => items.iter().find_map(|child| find_anchor(child, anchor)),
        _ => None,
    }
}

/// Keywords whose values are instance data, not subschemas
pub(crate) fn is_literal_keyword(key: &str) -> bool {
    matches!(key, "enum" | "const" | "default" | "examples")
}
