//! Outcome rendering
//!
//! The printer is chosen once per invocation. Each rendering is built in
//! memory and handed to the writer in a single `write_all`.

mod json;
mod text;

use std::io::{self, Write};

pub use json::{JsonPrinter, JsonReport};
pub use text::TextPrinter;

use crate::outcome::Outcome;

/// Renders an [`Outcome`] to the invocation's stdout/stderr
pub trait ResultPrinter {
    fn print(&self, outcome: &Outcome, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()>;
}

/// JSON printer when `json` is set, text otherwise
pub fn create(json: bool) -> Box<dyn ResultPrinter> {
    if json {
        Box::new(JsonPrinter)
    } else {
        Box::new(TextPrinter)
    }
}
