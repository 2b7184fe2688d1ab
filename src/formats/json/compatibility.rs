//! JSON Schema compatibility
//!
//! Compares a writer schema with a reader schema and reports every
//! constraint of the reader that a document valid under the writer could
//! break. The comparison walks `properties`, `additionalProperties`, `items`
//! and local `$ref`s.
//!
//! Properties the reader declares but the writer leaves open are not
//! flagged; otherwise adding any optional property would be breaking.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use super::resolve_local_ref;
use crate::content::TypedContent;
use crate::formats::{display_path, pointer_child};
use crate::rules::compatibility::{CompatibilityDifference, SchemaDiffer};
use crate::rules::RuleConfig;

/// `$ref` chains longer than this are treated as unresolvable
const MAX_REF_HOPS: usize = 32;

static ACCEPT_ALL: Value = Value::Bool(true);

const UPPER_BOUNDS: [&str; 5] = [
    "maxLength",
    "maximum",
    "exclusiveMaximum",
    "maxItems",
    "maxProperties",
];
const LOWER_BOUNDS: [&str; 5] = [
    "minLength",
    "minimum",
    "exclusiveMinimum",
    "minItems",
    "minProperties",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaDiffer;

impl SchemaDiffer for JsonSchemaDiffer {
    fn differences(
        &self,
        writer: &TypedContent,
        reader: &TypedContent,
        _rules: &RuleConfig,
    ) -> Vec<CompatibilityDifference> {
        let (writer, reader) = match (parse(writer), parse(reader)) {
            (Ok(writer), Ok(reader)) => (writer, reader),
            (Err(difference), _) | (_, Err(difference)) => return vec![difference],
        };

        let mut walker = Walker {
            writer_root: &writer,
            reader_root: &reader,
            active: HashSet::new(),
            differences: Vec::new(),
        };
        walker.compare(&writer, &reader, "");
        walker.differences
    }
}

fn parse(content: &TypedContent) -> Result<Value, CompatibilityDifference> {
    serde_json::from_str(content.content())
        .map_err(|e| {
            CompatibilityDifference::new(format!("Unable to parse JSON Schema: {}", e), "/")
        })
}

struct Walker<'a> {
    writer_root: &'a Value,
    reader_root: &'a Value,
    /// Schema pairs currently being compared, keyed by address
    active: HashSet<(usize, usize)>,
    differences: Vec<CompatibilityDifference>,
}

impl<'a> Walker<'a> {
    fn report(&mut self, description: String, context: String) {
        self.differences.push(CompatibilityDifference::new(description, display_path(&context)));
    }

    fn compare(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        let writer = follow_refs(self.writer_root, writer);
        let reader = follow_refs(self.reader_root, reader);

        let key = (writer as *const Value as usize, reader as *const Value as usize);
        if !self.active.insert(key) {
            return;
        }

        match (writer, reader) {
            (_, Value::Bool(true)) | (Value::Bool(false), _) => {}
            (_, Value::Bool(false)) => {
                self.report("Reader schema rejects every document".to_string(), path.to_string());
            }
            _ => {
                self.compare_types(writer, reader, path);
                self.compare_enum(writer, reader, path);
                self.compare_const(writer, reader, path);
                self.compare_bounds(writer, reader, path);
                self.compare_pattern(writer, reader, path);
                self.compare_required(writer, reader, path);
                self.compare_properties(writer, reader, path);
                self.compare_items(writer, reader, path);
            }
        }

        self.active.remove(&key);
    }

    fn compare_types(&mut self, writer: &Value, reader: &Value, path: &str) {
        let Some(reader_types) = types(reader) else {
            return;
        };
        let context = pointer_child(path, "type");

        match types(writer) {
            None => self.report(
                format!("Type constraint introduced: only {} accepted", join(&reader_types)),
                context,
            ),
            Some(writer_types) => {
                let accepts = |t: &&str| {
                    reader_types.contains(t)
                        || (*t == "integer" && reader_types.contains("number"))
                };
                if !writer_types.iter().all(accepts) {
                    self.report(
                        format!(
                            "Type narrowed from {} to {}",
                            join(&writer_types),
                            join(&reader_types)
                        ),
                        context,
                    );
                }
            }
        }
    }

    fn compare_enum(&mut self, writer: &Value, reader: &Value, path: &str) {
        let Some(reader_values) = reader.get("enum").and_then(Value::as_array) else {
            return;
        };
        let context = pointer_child(path, "enum");

        let writer_enum = writer.get("enum").and_then(Value::as_array);
        let writer_values: Vec<&Value> = match (writer_enum, writer.get("const")) {
            (Some(values), _) => values.iter().collect(),
            (None, Some(constant)) => vec![constant],
            (None, None) => {
                self.report("Enum constraint introduced".to_string(), context);
                return;
            }
        };

        for value in writer_values {
            if !reader_values.contains(value) {
                self.report(format!("Enum value {} was removed", value), context.clone());
            }
        }
    }

    fn compare_const(&mut self, writer: &Value, reader: &Value, path: &str) {
        let Some(reader_const) = reader.get("const") else {
            return;
        };
        let context = pointer_child(path, "const");

        match writer.get("const") {
            Some(writer_const) if writer_const == reader_const => {}
            Some(writer_const) => self.report(
                format!("Constant changed from {} to {}", writer_const, reader_const),
                context,
            ),
            None => {
                let single_enum = writer
                    .get("enum")
                    .and_then(Value::as_array)
                    .is_some_and(|values| values.len() == 1 && &values[0] == reader_const);
                if !single_enum {
                    self.report(format!("Constant {} introduced", reader_const), context);
                }
            }
        }
    }

    fn compare_bounds(&mut self, writer: &Value, reader: &Value, path: &str) {
        for keyword in UPPER_BOUNDS {
            let Some(reader_bound) = reader.get(keyword).filter(|v| v.is_number()) else {
                continue;
            };
            match writer.get(keyword).filter(|v| v.is_number()) {
                None => self.report(
                    format!("'{}' of {} introduced", keyword, reader_bound),
                    pointer_child(path, keyword),
                ),
                Some(writer_bound) if as_f64(reader_bound) < as_f64(writer_bound) => self.report(
                    format!("'{}' decreased from {} to {}", keyword, writer_bound, reader_bound),
                    pointer_child(path, keyword),
                ),
                Some(_) => {}
            }
        }

        for keyword in LOWER_BOUNDS {
            let Some(reader_bound) = reader.get(keyword).filter(|v| v.is_number()) else {
                continue;
            };
            // Counting keywords default to zero; numeric minimums have no default.
            let counts = !keyword.ends_with("imum");
            match writer.get(keyword).filter(|v| v.is_number()) {
                None if counts && as_f64(reader_bound) <= 0.0 => {}
                None => self.report(
                    format!("'{}' of {} introduced", keyword, reader_bound),
                    pointer_child(path, keyword),
                ),
                Some(writer_bound) if as_f64(reader_bound) > as_f64(writer_bound) => self.report(
                    format!("'{}' increased from {} to {}", keyword, writer_bound, reader_bound),
                    pointer_child(path, keyword),
                ),
                Some(_) => {}
            }
        }
    }

    fn compare_pattern(&mut self, writer: &Value, reader: &Value, path: &str) {
        let Some(reader_pattern) = reader.get("pattern").and_then(Value::as_str) else {
            return;
        };
        match writer.get("pattern").and_then(Value::as_str) {
            Some(writer_pattern) if writer_pattern == reader_pattern => {}
            Some(writer_pattern) => self.report(
                format!("Pattern changed from '{}' to '{}'", writer_pattern, reader_pattern),
                pointer_child(path, "pattern"),
            ),
            None => self.report(
                format!("Pattern '{}' introduced", reader_pattern),
                pointer_child(path, "pattern"),
            ),
        }
    }

    fn compare_required(&mut self, writer: &Value, reader: &Value, path: &str) {
        let writer_required = required(writer);
        for name in required(reader) {
            if !writer_required.contains(name) {
                self.report(
                    format!("Property '{}' is required but may be absent", name),
                    pointer_child(path, "required"),
                );
            }
        }
    }

    fn compare_properties(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        let writer_additional = writer.get("additionalProperties").unwrap_or(&ACCEPT_ALL);
        let reader_additional = reader.get("additionalProperties").unwrap_or(&ACCEPT_ALL);
        let reader_closed = reader_additional == &Value::Bool(false);
        let properties_path = pointer_child(path, "properties");

        if let Some(writer_properties) = writer.get("properties").and_then(Value::as_object) {
            let reader_properties = reader.get("properties").and_then(Value::as_object);
            for (name, writer_property) in writer_properties {
                let property_path = pointer_child(&properties_path, name);
                match reader_properties.and_then(|properties| properties.get(name)) {
                    Some(reader_property) => {
                        self.compare(writer_property, reader_property, &property_path)
                    }
                    None if reader_closed => self.report(
                        format!(
                            "Property '{}' is not allowed by the reader \
                             (additionalProperties is false)",
                            name
                        ),
                        property_path,
                    ),
                    None => self.compare(writer_property, reader_additional, &property_path),
                }
            }
        }

        let additional_path = pointer_child(path, "additionalProperties");
        if reader_closed {
            if writer_additional != &Value::Bool(false) {
                self.report(
                    "Additional properties are no longer allowed".to_string(),
                    additional_path,
                );
            }
        } else {
            self.compare(writer_additional, reader_additional, &additional_path);
        }
    }

    fn compare_items(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        let Some(reader_items) = reader.get("items").filter(|items| !items.is_array()) else {
            return;
        };
        let writer_items = writer
            .get("items")
            .filter(|items| !items.is_array())
            .unwrap_or(&ACCEPT_ALL);
        self.compare(writer_items, reader_items, &pointer_child(path, "items"));
    }
}

fn follow_refs<'v>(root: &'v Value, schema: &'v Value) -> &'v Value {
    let mut current = schema;
    for _ in 0..MAX_REF_HOPS {
        match current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| resolve_local_ref(root, reference))
        {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}

fn types(schema: &Value) -> Option<BTreeSet<&str>> {
    match schema.get("type")? {
        Value::String(name) => Some(BTreeSet::from([name.as_str()])),
        Value::Array(names) => Some(names.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

fn required(schema: &Value) -> BTreeSet<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn join(types: &BTreeSet<&str>) -> String {
    types.iter().copied().collect::<Vec<_>>().join("|")
}

fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}
