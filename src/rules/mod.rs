//! Rule contracts shared by every schema format
//!
//! A format engine plugs in by implementing [`validity::ContentValidator`]
//! and [`compatibility::CompatibilityChecker`] (usually through
//! [`compatibility::SchemaDiffer`]).

pub mod compatibility;
pub mod validity;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine options, forwarded verbatim from the `[rules]` configuration table
pub type RuleConfig = BTreeMap<String, String>;

/// One discrete problem found by an engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleViolation {
    pub description: String,
    /// Location of the problem inside the schema, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl RuleViolation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: None,
        }
    }

    pub fn at(description: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} [at: {}]", self.description, context),
            None => f.write_str(&self.description),
        }
    }
}

/// Failure raised by a validator, carrying zero or more violations
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RuleViolationError {
    pub message: String,
    pub causes: Vec<RuleViolation>,
}

impl RuleViolationError {
    pub fn new(message: impl Into<String>, causes: Vec<RuleViolation>) -> Self {
        Self {
            message: message.into(),
            causes,
        }
    }

    /// The violations to report: the causes, or a single violation made of
    /// the message when there are none
    pub fn into_violations(self) -> Vec<RuleViolation> {
        if self.causes.is_empty() {
            vec![RuleViolation::new(self.message)]
        } else {
            dedup(self.causes)
        }
    }
}

/// Drop repeated entries, keeping first occurrences in engine order
pub(crate) fn dedup<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
