use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::ResultPrinter;
use crate::outcome::{CommandKind, Outcome, Status};
use crate::rules::RuleViolation;

const SERIALIZATION_FAILURE: &str = "{\"error\": \"Failed to serialize JSON output\"}\n";

/// Wire shape of a JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub status: Status,
    pub command: CommandKind,
    pub file: String,
    pub level: String,
    /// Absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<RuleViolation>>,
}

impl From<&Outcome> for JsonReport {
    fn from(outcome: &Outcome) -> Self {
        Self {
            status: outcome.status,
            command: outcome.command,
            file: outcome.file.display().to_string(),
            level: outcome.level.to_string(),
            violations: (!outcome.is_pass()).then(|| outcome.violations.clone()),
        }
    }
}

/// One pretty-printed JSON document on stdout, pass or fail
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPrinter;

impl ResultPrinter for JsonPrinter {
    fn print(&self, outcome: &Outcome, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        match serde_json::to_string_pretty(&JsonReport::from(outcome)) {
            Ok(mut rendered) => {
                rendered.push('\n');
                out.write_all(rendered.as_bytes())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize report");
                err.write_all(SERIALIZATION_FAILURE.as_bytes())
            }
        }
    }
}
