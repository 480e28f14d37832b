//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use std::io::Write;

use esp_relay_core::{ControlReporter, Entity, SwitchState};

/// Output formatter trait
pub trait OutputFormatter {
    /// Announce the entity about to be switched, if this format does that
    fn format_dispatching(&self, target: &Entity, state: SwitchState) -> Option<String>;

    /// Format the confirmation after the command was accepted
    fn format_switched(&self, target: &Entity, state: SwitchState) -> String;

    /// Format the listing shown when no relay entity could be identified
    fn format_unresolved(&self, host: &str, catalog: &[Entity]) -> String;

    /// Format an error
    fn format_error(&self, error: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}

/// Writes controller reports through a formatter, one line per report.
pub struct PrintReporter<'a, W> {
    formatter: &'a dyn OutputFormatter,
    out: W,
}

impl<'a, W: Write> PrintReporter<'a, W> {
    pub fn new(formatter: &'a dyn OutputFormatter, out: W) -> Self {
        Self { formatter, out }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "failed to write report");
        }
    }
}

impl<W: Write> ControlReporter for PrintReporter<'_, W> {
    fn unresolved(&mut self, host: &str, catalog: &[Entity]) {
        let text = self.formatter.format_unresolved(host, catalog);
        self.line(&text);
    }

    fn dispatching(&mut self, target: &Entity, state: SwitchState) {
        if let Some(text) = self.formatter.format_dispatching(target, state) {
            self.line(&text);
        }
    }

    fn switched(&mut self, target: &Entity, state: SwitchState) {
        let text = self.formatter.format_switched(target, state);
        self.line(&text);
    }
}
