//! Validity and compatibility levels
//!
//! Both levels parse case-insensitively and accept `-` or `_` as word
//! separators, so `backward-transitive`, `BACKWARD_TRANSITIVE` and
//! `Backward_Transitive` name the same level. They display in upper snake
//! case, which is also the form used in reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A level name that does not match any known level
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} level: {given}. Valid: {valid}")]
pub struct ParseLevelError {
    kind: &'static str,
    given: String,
    valid: &'static str,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// How strictly a single schema document is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValidityLevel {
    /// No checks at all
    None,
    /// Grammar only
    SyntaxOnly,
    /// Grammar plus the format's semantic rules
    Full,
}

impl ValidityLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValidityLevel::None => "NONE",
            ValidityLevel::SyntaxOnly => "SYNTAX_ONLY",
            ValidityLevel::Full => "FULL",
        }
    }
}

impl FromStr for ValidityLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" => Ok(ValidityLevel::None),
            "syntax_only" | "syntax" => Ok(ValidityLevel::SyntaxOnly),
            "full" => Ok(ValidityLevel::Full),
            _ => Err(ParseLevelError {
                kind: "validity",
                given: s.to_string(),
                valid: "none, syntax_only, full",
            }),
        }
    }
}

/// Schema evolution guarantee checked between versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompatibilityLevel {
    None,
    Backward,
    BackwardTransitive,
    Forward,
    ForwardTransitive,
    Full,
    FullTransitive,
}

impl CompatibilityLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompatibilityLevel::None => "NONE",
            CompatibilityLevel::Backward => "BACKWARD",
            CompatibilityLevel::BackwardTransitive => "BACKWARD_TRANSITIVE",
            CompatibilityLevel::Forward => "FORWARD",
            CompatibilityLevel::ForwardTransitive => "FORWARD_TRANSITIVE",
            CompatibilityLevel::Full => "FULL",
            CompatibilityLevel::FullTransitive => "FULL_TRANSITIVE",
        }
    }

    /// Transitive levels compare against the whole history instead of the
    /// latest existing version only
    pub const fn is_transitive(&self) -> bool {
        matches!(
            self,
            CompatibilityLevel::BackwardTransitive
                | CompatibilityLevel::ForwardTransitive
                | CompatibilityLevel::FullTransitive
        )
    }

    /// The proposed schema must read data written with existing ones
    pub const fn checks_backward(&self) -> bool {
        matches!(
            self,
            CompatibilityLevel::Backward
                | CompatibilityLevel::BackwardTransitive
                | CompatibilityLevel::Full
                | CompatibilityLevel::FullTransitive
        )
    }

    /// Existing schemas must read data written with the proposed one
    pub const fn checks_forward(&self) -> bool {
        matches!(
            self,
            CompatibilityLevel::Forward
                | CompatibilityLevel::ForwardTransitive
                | CompatibilityLevel::Full
                | CompatibilityLevel::FullTransitive
        )
    }

    pub const ALL: [CompatibilityLevel; 7] = [
        CompatibilityLevel::None,
        CompatibilityLevel::Backward,
        CompatibilityLevel::BackwardTransitive,
        CompatibilityLevel::Forward,
        CompatibilityLevel::ForwardTransitive,
        CompatibilityLevel::Full,
        CompatibilityLevel::FullTransitive,
    ];
}

impl FromStr for CompatibilityLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" => Ok(CompatibilityLevel::None),
            "backward" => Ok(CompatibilityLevel::Backward),
            "backward_transitive" => Ok(CompatibilityLevel::BackwardTransitive),
            "forward" => Ok(CompatibilityLevel::Forward),
            "forward_transitive" => Ok(CompatibilityLevel::ForwardTransitive),
            "full" => Ok(CompatibilityLevel::Full),
            "full_transitive" => Ok(CompatibilityLevel::FullTransitive),
            _ => Err(ParseLevelError {
                kind: "compatibility",
                given: s.to_string(),
                valid: "backward, backward-transitive, forward, forward-transitive, \
                        full, full-transitive, none",
            }),
        }
    }
}

macro_rules! level_conversions {
    ($($level:ty),*) => {$(
        impl fmt::Display for $level {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $level {
            type Error = ParseLevelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$level> for String {
            fn from(level: $level) -> Self {
                level.as_str().to_string()
            }
        }
    )*};
}

level_conversions!(ValidityLevel, CompatibilityLevel);
