//! Avro compatibility, following Avro schema resolution. A reader can decode
//! writer data when every reader field is present in the writer or has a
//! default, types match or promote, and every writer union branch and enum
//! symbol is known to the reader.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::content::TypedContent;
use crate::formats::{display_path, pointer_child};
use crate::rules::compatibility::{CompatibilityDifference, SchemaDiffer};
use crate::rules::RuleConfig;

const PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct AvroSchemaDiffer;

impl SchemaDiffer for AvroSchemaDiffer {
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

        let writer_names = NamedTypes::collect(&writer);
        let reader_names = NamedTypes::collect(&reader);
        let mut walker = Walker {
            writer: &writer_names,
            reader: &reader_names,
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
            CompatibilityDifference::new(format!("Unable to parse Avro schema: {}", e), "/")
        })
}

/// Named type definitions of one document, by full and by short name
struct NamedTypes<'a> {
    by_name: HashMap<String, &'a Value>,
}

impl<'a> NamedTypes<'a> {
    fn collect(root: &'a Value) -> Self {
        let mut named = Self { by_name: HashMap::new() };
        named.visit(root, None);
        named
    }

    fn visit(&mut self, schema: &'a Value, namespace: Option<&str>) {
        match schema {
            Value::Array(branches) => {
                for branch in branches {
                    self.visit(branch, namespace);
                }
            }
            Value::Object(map) => {
                let kind = map.get("type");
                match kind.and_then(Value::as_str) {
                    Some("record" | "error" | "enum" | "fixed") => {
                        let (full_name, own_namespace) = full_name(schema, namespace);
                        if let Some(full_name) = full_name {
                            let short = short_name(&full_name).to_string();
                            self.by_name.entry(short).or_insert(schema);
                            self.by_name.insert(full_name, schema);
                        }
                        let fields = map.get("fields").and_then(Value::as_array);
                        for field in fields.into_iter().flatten() {
                            if let Some(field_type) = field.get("type") {
                                self.visit(field_type, own_namespace.as_deref());
                            }
                        }
                    }
                    Some("array") => {
                        if let Some(items) = map.get("items") {
                            self.visit(items, namespace);
                        }
                    }
                    Some("map") => {
                        if let Some(values) = map.get("values") {
                            self.visit(values, namespace);
                        }
                    }
                    Some(_) => {}
                    None => {
                        if let Some(nested) = kind {
                            self.visit(nested, namespace);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Follow named references and unwrap `{"type": ...}` wrappers
    fn resolve(&self, schema: &'a Value) -> &'a Value {
        match schema {
            Value::String(name) if !PRIMITIVES.contains(&name.as_str()) => self
                .by_name
                .get(name)
                .or_else(|| self.by_name.get(short_name(name)))
                .copied()
                .unwrap_or(schema),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(name)) if !is_complex(name) => self.resolve(&map["type"]),
                Some(nested @ (Value::Object(_) | Value::Array(_))) => self.resolve(nested),
                _ => schema,
            },
            _ => schema,
        }
    }
}

fn is_complex(kind: &str) -> bool {
    matches!(kind, "record" | "error" | "enum" | "fixed" | "array" | "map")
}

fn full_name(schema: &Value, enclosing: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = schema.get("name").and_then(Value::as_str) else {
        return (None, enclosing.map(String::from));
    };
    if let Some((namespace, _)) = name.rsplit_once('.') {
        return (Some(name.to_string()), Some(namespace.to_string()));
    }
    let namespace = schema
        .get("namespace")
        .and_then(Value::as_str)
        .or(enclosing)
        .filter(|ns| !ns.is_empty());
    match namespace {
        Some(ns) => (Some(format!("{}.{}", ns, name)), Some(ns.to_string())),
        None => (Some(name.to_string()), None),
    }
}

fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn kind(schema: &Value) -> &str {
    match schema {
        Value::String(name) => name,
        Value::Array(_) => "union",
        Value::Object(map) => map.get("type").and_then(Value::as_str).unwrap_or("unknown"),
        _ => "unknown",
    }
}

fn describe(schema: &Value) -> String {
    match schema.get("name").and_then(Value::as_str) {
        Some(name) => format!("{} '{}'", kind(schema), name),
        None => kind(schema).to_string(),
    }
}

fn promotes(writer: &str, reader: &str) -> bool {
    matches!(
        (writer, reader),
        ("int", "long" | "float" | "double")
            | ("long", "float" | "double")
            | ("float", "double")
            | ("string", "bytes")
            | ("bytes", "string")
    )
}

fn strings<'v>(schema: &'v Value, keyword: &str) -> impl Iterator<Item = &'v str> {
    schema
        .get(keyword)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn aliases(schema: &Value) -> impl Iterator<Item = &str> {
    strings(schema, "aliases")
}

fn symbols(schema: &Value) -> impl Iterator<Item = &str> {
    strings(schema, "symbols")
}

struct Walker<'d, 'a> {
    writer: &'d NamedTypes<'a>,
    reader: &'d NamedTypes<'a>,
    active: HashSet<(usize, usize)>,
    differences: Vec<CompatibilityDifference>,
}

impl<'d, 'a> Walker<'d, 'a> {
    fn report(&mut self, description: String, context: String) {
        self.differences.push(CompatibilityDifference::new(description, display_path(&context)));
    }

    fn compare(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        let writer = self.writer.resolve(writer);
        let reader = self.reader.resolve(reader);

        let key = (writer as *const Value as usize, reader as *const Value as usize);
        if !self.active.insert(key) {
            return;
        }

        match (writer, reader) {
            (Value::Array(writer_branches), Value::Array(reader_branches)) => {
                for (index, branch) in writer_branches.iter().enumerate() {
                    if !self.readable_by_any(branch, reader_branches) {
                        self.report(
                            format!(
                                "Writer union branch {} is not in the reader union",
                                describe(self.writer.resolve(branch))
                            ),
                            pointer_child(path, &index.to_string()),
                        );
                    }
                }
            }
            (_, Value::Array(reader_branches)) => {
                if !self.readable_by_any(writer, reader_branches) {
                    self.report(
                        format!("Writer type {} is not in the reader union", describe(writer)),
                        path.to_string(),
                    );
                }
            }
            (Value::Array(writer_branches), _) => {
                for (index, branch) in writer_branches.iter().enumerate() {
                    self.compare(branch, reader, &pointer_child(path, &index.to_string()));
                }
            }
            _ => self.compare_single(writer, reader, path),
        }

        self.active.remove(&key);
    }

    fn readable_by_any(&self, writer: &'a Value, branches: &'a [Value]) -> bool {
        branches.iter().any(|branch| {
            let mut probe = Walker {
                writer: self.writer,
                reader: self.reader,
                active: self.active.clone(),
                differences: Vec::new(),
            };
            probe.compare(writer, branch, "");
            probe.differences.is_empty()
        })
    }

    fn compare_single(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        match (kind(writer), kind(reader)) {
            ("record" | "error", "record" | "error") => {
                self.compare_names(writer, reader, path);
                self.compare_fields(writer, reader, path);
            }
            ("enum", "enum") => {
                self.compare_names(writer, reader, path);
                self.compare_symbols(writer, reader, path);
            }
            ("fixed", "fixed") => {
                self.compare_names(writer, reader, path);
                let (writer_size, reader_size) = (writer.get("size"), reader.get("size"));
                if writer_size != reader_size {
                    self.report(
                        format!(
                            "Fixed size changed from {} to {}",
                            writer_size.unwrap_or(&Value::Null),
                            reader_size.unwrap_or(&Value::Null)
                        ),
                        pointer_child(path, "size"),
                    );
                }
            }
            ("array", "array") => {
                if let (Some(w), Some(r)) = (writer.get("items"), reader.get("items")) {
                    self.compare(w, r, &pointer_child(path, "items"));
                }
            }
            ("map", "map") => {
                if let (Some(w), Some(r)) = (writer.get("values"), reader.get("values")) {
                    self.compare(w, r, &pointer_child(path, "values"));
                }
            }
            (w, r) if w == r && PRIMITIVES.contains(&w) => {}
            (w, r) if promotes(w, r) => {}
            _ => self.report(
                format!("Type {} cannot be read as {}", describe(writer), describe(reader)),
                path.to_string(),
            ),
        }
    }

    fn compare_names(&mut self, writer: &Value, reader: &Value, path: &str) {
        let Some(writer_name) = writer.get("name").and_then(Value::as_str) else {
            return;
        };
        let reader_name = reader.get("name").and_then(Value::as_str).unwrap_or_default();

        let matches = short_name(writer_name) == short_name(reader_name)
            || aliases(reader)
                .any(|alias| alias == writer_name || short_name(alias) == short_name(writer_name));
        if !matches {
            self.report(
                format!("Name mismatch: writer '{}', reader '{}'", writer_name, reader_name),
                pointer_child(path, "name"),
            );
        }
    }

    fn compare_fields(&mut self, writer: &'a Value, reader: &'a Value, path: &str) {
        let writer_fields: HashMap<&str, &'a Value> = writer
            .get("fields")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|field| field.get("name").and_then(Value::as_str).map(|name| (name, field)))
            .collect();

        let reader_fields = reader.get("fields").and_then(Value::as_array).into_iter().flatten();
        for reader_field in reader_fields {
            let Some(name) = reader_field.get("name").and_then(Value::as_str) else {
                continue;
            };
            let field_path = pointer_child(&pointer_child(path, "fields"), name);
            let writer_field = writer_fields
                .get(name)
                .or_else(|| aliases(reader_field).find_map(|alias| writer_fields.get(alias)))
                .copied();

            match writer_field {
                Some(writer_field) => {
                    let types = (writer_field.get("type"), reader_field.get("type"));
                    if let (Some(w), Some(r)) = types {
                        self.compare(w, r, &field_path);
                    }
                }
                None if reader_field.get("default").is_some() => {}
                None => self.report(
                    format!("Field '{}' is missing from the writer and has no default", name),
                    field_path,
                ),
            }
        }
    }

    fn compare_symbols(&mut self, writer: &Value, reader: &Value, path: &str) {
        if reader.get("default").is_some() {
            return;
        }
        let reader_symbols: HashSet<&str> = symbols(reader).collect();
        let unknown: Vec<&str> = symbols(writer)
            .filter(|symbol| !reader_symbols.contains(symbol))
            .collect();

        if !unknown.is_empty() {
            self.report(
                format!("Enum symbols unknown to the reader: {}", unknown.join(", ")),
                pointer_child(path, "symbols"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(writer: &Value, reader: &Value) -> Vec<CompatibilityDifference> {
        AvroSchemaDiffer.differences(
            &TypedContent::new(writer.to_string(), "application/avro+json"),
            &TypedContent::new(reader.to_string(), "application/avro+json"),
            &RuleConfig::new(),
        )
    }

    fn user() -> Value {
        json!({
            "type": "record",
            "name": "User",
            "namespace": "dev.lilcurio",
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "age", "type": "int" }
            ]
        })
    }

    fn with_field(field: Value) -> Value {
        let mut schema = user();
        schema["fields"].as_array_mut().unwrap().push(field);
        schema
    }

    #[test]
    fn test_identical_schemas() {
        assert!(diff(&user(), &user()).is_empty());
    }

    #[test]
    fn test_field_with_default_added() {
        let widened = with_field(json!({
            "name": "email",
            "type": ["null", "string"],
            "default": null
        }));
        assert!(diff(&user(), &widened).is_empty());
        assert!(diff(&widened, &user()).is_empty());
    }

    #[test]
    fn test_field_without_default_added() {
        let stricter = with_field(json!({ "name": "email", "type": "string" }));

        let differences = diff(&user(), &stricter);
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].context, "/fields/email");

        assert!(diff(&stricter, &user()).is_empty());
    }

    #[test]
    fn test_promotion_is_one_way() {
        let mut promoted = user();
        promoted["fields"][1]["type"] = json!("long");

        assert!(diff(&user(), &promoted).is_empty());
        let differences = diff(&promoted, &user());
        assert_eq!(differences[0].context, "/fields/age");
    }

    #[test]
    fn test_record_rename_needs_alias() {
        let mut renamed = user();
        renamed["name"] = json!("Person");
        assert_eq!(diff(&user(), &renamed)[0].context, "/name");

        renamed["aliases"] = json!(["User"]);
        assert!(diff(&user(), &renamed).is_empty());
    }

    #[test]
    fn test_enum_symbols() {
        let writer = json!({
            "type": "enum",
            "name": "Color",
            "symbols": ["RED", "GREEN", "BLUE"]
        });
        let reader = json!({ "type": "enum", "name": "Color", "symbols": ["RED", "GREEN"] });
        assert_eq!(diff(&writer, &reader)[0].context, "/symbols");
        assert!(diff(&reader, &writer).is_empty());

        let defaulted = json!({
            "type": "enum",
            "name": "Color",
            "symbols": ["RED", "GREEN"],
            "default": "RED"
        });
        assert!(diff(&writer, &defaulted).is_empty());
    }

    #[test]
    fn test_unions() {
        let optional = json!(["null", "string"]);
        assert!(diff(&json!("string"), &optional).is_empty());

        let differences = diff(&optional, &json!("string"));
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].context, "/0");
    }

    #[test]
    fn test_named_references_and_recursion() {
        let list = json!({
            "type": "record",
            "name": "Node",
            "fields": [
                { "name": "value", "type": "int" },
                { "name": "next", "type": ["null", "Node"], "default": null }
            ]
        });
        assert!(diff(&list, &list).is_empty());

        let mut changed = list.clone();
        changed["fields"][0]["type"] = json!("string");
        let differences = diff(&list, &changed);
        assert!(differences.iter().any(|d| d.context == "/fields/value"));
    }

    #[test]
    fn test_fixed_size_change() {
        let writer = json!({ "type": "fixed", "name": "Hash", "size": 16 });
        let reader = json!({ "type": "fixed", "name": "Hash", "size": 32 });
        assert_eq!(diff(&writer, &reader)[0].context, "/size");
    }

    #[test]
    fn test_logical_type_wrapper() {
        let writer = json!({ "type": "int", "logicalType": "date" });
        assert!(diff(&writer, &json!("int")).is_empty());
        assert!(diff(&writer, &json!("long")).is_empty());
    }
}
