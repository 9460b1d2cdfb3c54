//! Console reporter
//!
//! Writes one status line per call, colored by severity when the output is a
//! terminal. Output is best-effort: a failed write never interrupts a backup.

use std::io::{self, Stdout, Write};

use crossterm::style::{style, Color, Stylize};
use crossterm::tty::IsTty;

use crate::config::ColorMode;

/// Severity of a console line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Plain text
    #[default]
    Neutral,
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    /// Get the color for this severity, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Neutral => None,
            Self::Success => Some(Color::Green),
            Self::Warning => Some(Color::Yellow),
            Self::Error => Some(Color::Red),
            Self::Info => Some(Color::Cyan),
        }
    }
}

/// Writes human-readable status lines
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Report to standard output, honoring the configured color mode
    pub fn stdout(mode: ColorMode) -> Self {
        let out = io::stdout();
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => out.is_tty() && std::env::var_os("NO_COLOR").is_none(),
        };
        Self { out, color }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Write `message` as one line
    ///
    /// An empty message is ignored.
    pub fn report(&mut self, message: &str, severity: Severity) {
        if message.is_empty() {
            return;
        }

        let result = match severity.color() {
            Some(color) if self.color => writeln!(self.out, "{}", style(message).with(color)),
            _ => writeln!(self.out, "{}", message),
        };
        let _ = result.and_then(|_| self.out.flush());
    }

    pub fn neutral(&mut self, message: &str) {
        self.report(message, Severity::Neutral);
    }

    pub fn success(&mut self, message: &str) {
        self.report(message, Severity::Success);
    }

    pub fn warning(&mut self, message: &str) {
        self.report(message, Severity::Warning);
    }

    pub fn error(&mut self, message: &str) {
        self.report(message, Severity::Error);
    }

    pub fn info(&mut self, message: &str) {
        self.report(message, Severity::Info);
    }

    /// Blank separator line
    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_output() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        reporter.success("Created archive");
        reporter.neutral("done");

        assert_eq!(rendered(reporter), "Created archive\ndone\n");
    }

    #[test]
    fn test_colored_output() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.error("Error removing dump");
        reporter.neutral("plain");

        let output = rendered(reporter);
        let mut lines = output.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("\u{1b}["));
        assert!(first.contains("Error removing dump"));
        assert_eq!(lines.next(), Some("plain"));
    }

    #[test]
    fn test_empty_message_is_ignored() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.report("", Severity::Error);

        assert!(rendered(reporter).is_empty());
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Neutral.color(), None);
        assert_eq!(Severity::Success.color(), Some(Color::Green));
        assert_eq!(Severity::Error.color(), Some(Color::Red));
    }
}
