//! Avro validity rules: `SYNTAX_ONLY` parses the JSON, `FULL` parses the
//! Avro schema itself.

use apache_avro::Schema;
use serde_json::Value;

use crate::content::TypedContent;
use crate::level::ValidityLevel;
use crate::rules::validity::ContentValidator;
use crate::rules::{RuleConfig, RuleViolation, RuleViolationError};

#[derive(Debug, Default, Clone, Copy)]
pub struct AvroContentValidator;

impl ContentValidator for AvroContentValidator {
    fn validate(
        &self,
        level: ValidityLevel,
        content: &TypedContent,
        _rules: &RuleConfig,
    ) -> Result<(), RuleViolationError> {
        if level == ValidityLevel::None {
            return Ok(());
        }

        serde_json::from_str::<Value>(content.content()).map_err(|e| {
            RuleViolationError::new(
                "Syntax violation for Avro artifact.",
                vec![RuleViolation::at(
                    e.to_string(),
                    format!("line {}, column {}", e.line(), e.column()),
                )],
            )
        })?;

        if level == ValidityLevel::SyntaxOnly {
            return Ok(());
        }

        Schema::parse_str(content.content()).map_err(|e| {
            RuleViolationError::new(
                "Invalid Avro schema",
                vec![RuleViolation::new(e.to_string())],
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(level: ValidityLevel, text: &str) -> Result<(), RuleViolationError> {
        let content = TypedContent::new(text, "application/avro+json");
        AvroContentValidator.validate(level, &content, &RuleConfig::new())
    }

    #[test]
    fn test_valid_record() {
        let schema = r#"{
            "type": "record",
            "name": "User",
            "namespace": "dev.lilcurio",
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "age", "type": ["null", "int"], "default": null }
            ]
        }"#;
        assert!(validate(ValidityLevel::Full, schema).is_ok());
    }

    #[test]
    fn test_record_without_fields_fails_full_only() {
        let schema = r#"{ "type": "record", "name": "User" }"#;
        assert!(validate(ValidityLevel::SyntaxOnly, schema).is_ok());

        let err = validate(ValidityLevel::Full, schema).unwrap_err();
        assert_eq!(err.causes.len(), 1);
    }

    #[test]
    fn test_syntax_error() {
        let schema = r#"{ "type": "record", "name": "User", "fields": [ }"#;
        assert!(validate(ValidityLevel::SyntaxOnly, schema).is_err());
        assert!(validate(ValidityLevel::Full, schema).is_err());
        assert!(validate(ValidityLevel::None, schema).is_ok());
    }
}
