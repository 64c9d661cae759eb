//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Each reporter keeps its own record of what it already printed, so two
//! parses running side by side never suppress each other's output.

use std::collections::HashSet;
use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// A [`DiagnosticSink`] that prints each distinct diagnostic once to a writer
/// (stderr by default) in yellow.
///
/// Two diagnostics are the same warning when they have the same kind and
/// detail, regardless of position.
pub struct ConsoleReporter<W: Write = io::Stderr> {
    component: String,
    out: W,
    warned: HashSet<String>,
    total: usize,
    colored: bool,
}

impl ConsoleReporter {
    /// Reporter writing to stderr, prefixing every line with `component`.
    #[must_use]
    pub fn stderr(component: &str) -> Self {
        Self::new(component, io::stderr(), true)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter writing to an arbitrary writer.
    pub fn new(component: &str, out: W, colored: bool) -> Self {
        Self {
            component: component.to_string(),
            out,
            warned: HashSet::new(),
            total: 0,
            colored,
        }
    }

    /// Warn about something once per unique message.
    ///
    /// Returns whether the message was printed.
    ///
    /// # Example
    /// ```ignore
    /// reporter.warn_once("unexpected end tag </p>");
    /// ```
    pub fn warn_once(&mut self, message: &str) -> bool {
        self.total += 1;
        if !self.warned.insert(message.to_string()) {
            return false;
        }

        self.print(message);
        true
    }

    fn print(&mut self, message: &str) {
        let line = format!("[Wattle {}] ⚠ {message}", self.component);
        // A closed stderr is not worth failing a parse over.
        let _ = if self.colored {
            writeln!(self.out, "{}", line.yellow())
        } else {
            writeln!(self.out, "{line}")
        };
    }

    /// Number of diagnostics seen, duplicates included.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct warnings printed.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.warned.len()
    }

    /// Forget everything printed so far (call before parsing a new document).
    pub fn clear_warnings(&mut self) {
        self.warned.clear();
        self.total = 0;
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticSink for ConsoleReporter<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let message = match &diagnostic.detail {
            Some(detail) => format!("{} ({detail}) at {}", diagnostic.kind, diagnostic.position),
            None => format!("{} at {}", diagnostic.kind, diagnostic.position),
        };
        // Dedup on kind + detail; the position is only informational.
        let key = match &diagnostic.detail {
            Some(detail) => format!("{}:{detail}", diagnostic.kind),
            None => diagnostic.kind.to_string(),
        };
        self.total += 1;
        if self.warned.insert(key) {
            self.print(&message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ParseErrorKind, SourcePosition};

    fn reporter() -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::new("HTML", Vec::new(), false)
    }

    #[test]
    fn test_warn_once_deduplicates() {
        let mut r = reporter();
        assert!(r.warn_once("first"));
        assert!(!r.warn_once("first"));
        assert!(r.warn_once("second"));
        assert_eq!(r.total(), 3);
        assert_eq!(r.distinct(), 2);

        let text = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("[Wattle HTML] ⚠ first"));
    }

    #[test]
    fn test_report_ignores_position_for_dedup() {
        let mut r = reporter();
        r.report(Diagnostic::new(
            ParseErrorKind::EofInTag,
            SourcePosition::new(1, 1, 0),
        ));
        r.report(Diagnostic::new(
            ParseErrorKind::EofInTag,
            SourcePosition::new(9, 2, 80),
        ));
        assert_eq!(r.total(), 2);
        assert_eq!(r.distinct(), 1);
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("eof-in-tag at 1:1"));
    }

    #[test]
    fn test_clear_warnings_allows_reprint() {
        let mut r = reporter();
        assert!(r.warn_once("again"));
        r.clear_warnings();
        assert!(r.warn_once("again"));
    }
}
