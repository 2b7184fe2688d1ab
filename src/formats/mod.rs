//! Schema format engines
//!
//! Each submodule provides a [`crate::schema::SchemaSupport`] bundle for one
//! format. Protobuf is known to [`crate::schema::SchemaFormat`] but has no
//! engine yet.

pub mod avro;
pub mod json;

/// Append an escaped JSON-pointer segment to `path`
pub(crate) fn pointer_child(path: &str, segment: &str) -> String {
    format!("{}/{}", path, segment.replace('~', "~0").replace('/', "~1"))
}

/// `path` as reported to users; the document root is `/`
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
