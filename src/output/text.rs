use std::io::{self, Write};

use super::ResultPrinter;
use crate::outcome::{CommandKind, Outcome, Status};

/// Success line on stdout, failure details on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPrinter;

impl TextPrinter {
    pub fn render(outcome: &Outcome) -> String {
        let (subject, heading) = match outcome.command {
            CommandKind::Validate => ("Schema validation", "Violations:"),
            CommandKind::Compatibility => ("Compatibility check", "Incompatible differences:"),
        };
        let verb = match outcome.status {
            Status::Pass => "succeeded",
            Status::Fail => "failed",
        };

        let mut rendered = format!(
            "{}: {} {} for {} (level: {})\n",
            outcome.status,
            subject,
            verb,
            outcome.file.display(),
            outcome.level
        );
        if outcome.status == Status::Fail {
            rendered.push_str(heading);
            rendered.push('\n');
            for violation in &outcome.violations {
                rendered.push_str(&format!("  - {}\n", violation));
            }
        }
        rendered
    }
}

impl ResultPrinter for TextPrinter {
    fn print(&self, outcome: &Outcome, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        let rendered = Self::render(outcome);
        if outcome.is_pass() {
            out.write_all(rendered.as_bytes())
        } else {
            err.write_all(rendered.as_bytes())
        }
    }
}
