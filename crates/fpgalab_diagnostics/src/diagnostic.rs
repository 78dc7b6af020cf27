//! Structured diagnostic messages with severity, code, and context notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use crate::stamp::TickStamp;
use serde::{Deserialize, Serialize};

/// A single reported event from a testbench run.
///
/// The message says what went wrong; notes carry the full context
/// (expected value, actual value, the stimulus that triggered the check).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// Stable code identifying the kind of check.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// When the check fired, if it is tied to a simulation point.
    pub at: Option<TickStamp>,
    /// Context lines (`= note: ...`).
    pub notes: Vec<String>,
    /// Suggestions (`= help: ...`).
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            at: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    /// Creates a note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message)
    }

    /// Attaches the simulation point the diagnostic refers to.
    pub fn at(mut self, stamp: TickStamp) -> Self {
        self.at = Some(stamp);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
