//! Diagnostic reporting.
//!
//! The compiler never decides how messages are presented. It produces a
//! [`Diagnostic`] (severity, line, message) and hands it to whatever
//! [`DiagnosticSink`] the embedding application installed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Error;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note (for example, a shadowed typedef).
    Note,
    /// Suspicious but accepted input.
    Warning,
    /// A failure that aborts the current operation.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => f.write_str("note"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single location-tagged message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the message is.
    pub severity: Severity,
    /// Source line the message refers to, when known.
    pub line: Option<u32>,
    /// The message text.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(severity: Severity, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            severity,
            line,
            message: message.into(),
        }
    }

    /// Creates a note.
    #[must_use]
    pub fn note(line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, Some(line), message)
    }

    /// Creates a warning.
    #[must_use]
    pub fn warning(line: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, Some(line), message)
    }

    /// Creates an error diagnostic describing `err`.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        Self::new(Severity::Error, err.line(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line}): {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receiver of diagnostics.
///
/// Sinks are owned by a single registry and are not required to be `Send`.
pub trait DiagnosticSink {
    /// Receives one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let line = diagnostic.line.unwrap_or(0);
        match diagnostic.severity {
            Severity::Error => tracing::error!(line, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(line, "{}", diagnostic.message),
            Severity::Note => tracing::info!(line, "{}", diagnostic.message),
        }
    }
}

/// Sink that keeps diagnostics in a shared buffer.
///
/// Cloning the sink shares the buffer, so a caller can keep one handle and
/// give the other to a registry.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buffer: Rc<RefCell<Vec<Diagnostic>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every diagnostic received so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.buffer.borrow().clone()
    }

    /// Returns the diagnostics of the given severity.
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.buffer
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .cloned()
            .collect()
    }

    /// Drops every buffered diagnostic.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.buffer.borrow_mut().push(diagnostic);
    }
}
