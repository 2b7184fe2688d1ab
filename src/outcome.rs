//! The normalized result both orchestrators produce

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::level::{CompatibilityLevel, ValidityLevel};
use crate::rules::RuleViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check produced an outcome. `diff` reports as `Compatibility`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Validate,
    Compatibility,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Validate => "validate",
            CommandKind::Compatibility => "compatibility",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The level a check ran at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckLevel {
    Validity(ValidityLevel),
    Compatibility(CompatibilityLevel),
}

impl CheckLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckLevel::Validity(level) => level.as_str(),
            CheckLevel::Compatibility(level) => level.as_str(),
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ValidityLevel> for CheckLevel {
    fn from(level: ValidityLevel) -> Self {
        CheckLevel::Validity(level)
    }
}

impl From<CompatibilityLevel> for CheckLevel {
    fn from(level: CompatibilityLevel) -> Self {
        CheckLevel::Compatibility(level)
    }
}

/// Pass/fail result of one check. A `Pass` never carries violations; a
/// `Fail` usually carries at least one but may carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub command: CommandKind,
    pub file: PathBuf,
    pub level: CheckLevel,
    pub violations: Vec<RuleViolation>,
}

impl Outcome {
    pub fn pass(command: CommandKind, file: &Path, level: impl Into<CheckLevel>) -> Self {
        Self {
            status: Status::Pass,
            command,
            file: file.to_path_buf(),
            level: level.into(),
            violations: Vec::new(),
        }
    }

    /// A failure, whatever the number of violations
    pub fn fail(
        command: CommandKind,
        file: &Path,
        level: impl Into<CheckLevel>,
        violations: Vec<RuleViolation>,
    ) -> Self {
        Self {
            status: Status::Fail,
            command,
            file: file.to_path_buf(),
            level: level.into(),
            violations,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }

    /// Process exit code: 0 on pass, 1 on fail
    pub fn exit_code(&self) -> i32 {
        match self.status {
            Status::Pass => 0,
            Status::Fail => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_has_no_violations() {
        let outcome =
            Outcome::pass(CommandKind::Validate, Path::new("a.json"), ValidityLevel::Full);
        assert!(outcome.is_pass());
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.level.to_string(), "FULL");
    }

    #[test]
    fn test_fail_exit_code() {
        let outcome = Outcome::fail(
            CommandKind::Compatibility,
            Path::new("b.json"),
            CompatibilityLevel::BackwardTransitive,
            vec![RuleViolation::new("broken")],
        );
        assert!(!outcome.is_pass());
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.level.as_str(), "BACKWARD_TRANSITIVE");
        assert_eq!(outcome.command.to_string(), "compatibility");
    }

    #[test]
    fn test_fail_without_violations() {
        let outcome = Outcome::fail(
            CommandKind::Validate,
            Path::new("c.json"),
            ValidityLevel::SyntaxOnly,
            Vec::new(),
        );
        assert_eq!(outcome.status, Status::Fail);
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Pass).unwrap(), "\"PASS\"");
        assert_eq!(
            serde_json::to_string(&CommandKind::Validate).unwrap(),
            "\"validate\""
        );
    }
}
