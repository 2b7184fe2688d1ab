//! lil-curio
//!
//! Validates schema files and checks that a proposed schema version stays
//! compatible with earlier ones, either given as files or read from git.
//!
//! ## Features
//!
//! - **Validity levels**: `NONE`, `SYNTAX_ONLY` and `FULL` checks of a single schema
//! - **Compatibility levels**: backward, forward and full, each optionally transitive
//! - **Git history**: compare a working-tree file with any revision
//! - **Formats**: JSON Schema and Avro; new formats plug in through [`SchemaSupport`]
//!
//! ## Architecture
//!
//! ```text
//! cli ──► check::SchemaChecker ──► registry ──► formats::{json, avro}
//!              │        │                              │
//!              │        └── content / git              └── rules::{validity, compatibility}
//!              ▼
//!          outcome::Outcome ──► output::{TextPrinter, JsonPrinter}
//! ```

pub mod check;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod formats;
pub mod git;
pub mod level;
pub mod outcome;
pub mod output;
pub mod registry;
pub mod rules;
pub mod schema;

pub use check::SchemaChecker;
pub use config::CurioConfig;
pub use content::TypedContent;
pub use error::{CheckError, Result};
pub use git::VersionResolver;
pub use level::{CompatibilityLevel, ValidityLevel};
pub use outcome::{Outcome, Status};
pub use registry::SchemaTypeRegistry;
pub use rules::RuleViolation;
pub use schema::{SchemaFormat, SchemaSupport};
