//! JSON Schema validity rules
//!
//! - `SYNTAX_ONLY`: the document parses as JSON.
//! - `FULL`: the root is an object or a boolean, the document compiles as a
//!   JSON Schema (which includes meta-schema conformance), and every local
//!   `$ref` points somewhere inside the document.

use jsonschema::JSONSchema;
use serde_json::Value;

use super::{is_literal_keyword, resolve_local_ref, CHECK_REFS_RULE};
use crate::content::TypedContent;
use crate::formats::{display_path, pointer_child};
use crate::level::ValidityLevel;
use crate::rules::validity::ContentValidator;
use crate::rules::{RuleConfig, RuleViolation, RuleViolationError};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaContentValidator;

impl ContentValidator for JsonSchemaContentValidator {
    fn validate(
        &self,
        level: ValidityLevel,
        content: &TypedContent,
        rules: &RuleConfig,
    ) -> Result<(), RuleViolationError> {
        if level == ValidityLevel::None {
            return Ok(());
        }

        let document: Value = serde_json::from_str(content.content()).map_err(|e| {
            RuleViolationError::new(
                "Syntax violation for JSON Schema artifact.",
                vec![RuleViolation::at(
                    e.to_string(),
                    format!("line {}, column {}", e.line(), e.column()),
                )],
            )
        })?;

        if level == ValidityLevel::SyntaxOnly {
            return Ok(());
        }

        if !document.is_object() && !document.is_boolean() {
            return Err(RuleViolationError::new(
                "Invalid JSON Schema",
                vec![RuleViolation::at("A JSON Schema must be an object or a boolean", "/")],
            ));
        }

        let mut violations = Vec::new();

        if let Err(error) = JSONSchema::compile(&document) {
            violations.push(RuleViolation::at(
                error.to_string(),
                display_path(&error.instance_path.to_string()),
            ));
        }

        let check_refs = rules.get(CHECK_REFS_RULE).map_or(true, |value| value != "false");
        if check_refs {
            collect_dangling_refs(&document, &document, "", &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RuleViolationError::new("Invalid JSON Schema", violations))
        }
    }
}

fn collect_dangling_refs(
    root: &Value,
    schema: &Value,
    path: &str,
    violations: &mut Vec<RuleViolation>,
) {
    match schema {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if reference.starts_with('#') && resolve_local_ref(root, reference).is_none() {
                    violations.push(RuleViolation::at(
                        format!("Unresolvable reference '{}'", reference),
                        pointer_child(path, "$ref"),
                    ));
                }
            }
            for (key, child) in map {
                if !is_literal_keyword(key) {
                    collect_dangling_refs(root, child, &pointer_child(path, key), violations);
                }
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_path = pointer_child(path, &index.to_string());
                collect_dangling_refs(root, child, &child_path, violations);
            }
        }
        _ => {}
    }
}
