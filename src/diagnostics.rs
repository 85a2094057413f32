//! Non-fatal diagnostics
//!
//! Fatal problems travel as `Err` values; everything else (currently the
//! warning emitted for skipped conditional-compilation spans) is handed to a
//! [`DiagnosticSink`] supplied when the parser is constructed.
//!
//! - [`ConsoleSink`]: coloured output on stderr, the default
//! - [`CollectingSink`]: keeps diagnostics in memory, used by tests
//! - [`TracingSink`]: forwards to the `tracing` subscriber

use crate::parser::ast::SourceLocation;
use crossterm::style::{Color, Stylize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: String,
    pub location: SourceLocation,
    /// Rendered source window around `location`
    pub context: String,
}

impl Diagnostic {
    pub fn warning(
        message: impl Into<String>,
        path: impl Into<String>,
        location: SourceLocation,
        context: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: path.into(),
            location,
            context: context.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}, {})\n{}",
            self.severity, self.message, self.path, self.location, self.context
        )
    }
}

/// Receiver for non-fatal diagnostics
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic);
}

// Severity colours
const WARNING_COLOR: Color = Color::Rgb { r: 250, g: 179, b: 135 };
const NOTE_COLOR: Color = Color::Rgb { r: 137, g: 180, b: 250 };
const PATH_COLOR: Color = Color::Rgb { r: 108, g: 112, b: 134 };

/// Writes diagnostics to stderr, styled with terminal colours
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let color = match diagnostic.severity {
            Severity::Warning => WARNING_COLOR,
            Severity::Note => NOTE_COLOR,
        };
        let header = diagnostic.severity.to_string().with(color).bold();
        let path = format!("{}, {}", diagnostic.path, diagnostic.location).with(PATH_COLOR);
        eprintln!("{header}: {} ({path})", diagnostic.message);
        eprintln!("{}", diagnostic.context);
    }
}

/// Stores every diagnostic; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    inner: Rc<RefCell<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.inner.borrow_mut().push(diagnostic.clone());
    }
}

/// Forwards diagnostics as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                path = %diagnostic.path,
                line = diagnostic.location.line,
                column = diagnostic.location.column,
                "{}",
                diagnostic.message
            ),
            Severity::Note => tracing::info!(
                path = %diagnostic.path,
                line = diagnostic.location.line,
                column = diagnostic.location.column,
                "{}",
                diagnostic.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_shares_buffer() {
        let sink = CollectingSink::new();
        let handle = sink.clone();
        sink.emit(&Diagnostic::warning(
            "skipped",
            "a.sv",
            SourceLocation::new(3, 1),
            "",
        ));
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.diagnostics()[0].severity, Severity::Warning);
        assert_eq!(handle.diagnostics()[0].location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::warning("skipped", "a.sv", SourceLocation::new(2, 5), "ctx");
        assert_eq!(d.to_string(), "warning: skipped (a.sv, line 2, column 5)\nctx");
    }
}
