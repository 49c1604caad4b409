//! Error handling for the MMIO replay generator
//!
//! This module defines the trace error taxonomy and the diagnostic
//! reporter used to collect per-record problems without aborting a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while turning trace text into registry contents
///
/// Only `EmptyInput` and `Io` are structural; every other variant is
/// recovered per record by the ingest loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error("line is not an operation record")]
    SkippedLine,

    #[error("Malformed line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("Validation error at line {line}: {message}")]
    Validation { line: usize, message: String },

    #[error("Trace input is empty")]
    EmptyInput,

    #[error("No observations for BAR {bar}")]
    NoDataForBar { bar: u8 },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl TraceError {
    /// Create a malformed line error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        TraceError::MalformedLine {
            line,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(line: usize, message: impl Into<String>) -> Self {
        TraceError::Validation {
            line,
            message: message.into(),
        }
    }

    /// Failure to read the trace from `source`
    pub fn io(source: &str, err: &std::io::Error) -> Self {
        TraceError::Io {
            message: format!("{}: {}", source, err),
        }
    }

    /// Whether the run must stop on this error
    pub fn is_structural(&self) -> bool {
        matches!(self, TraceError::EmptyInput | TraceError::Io { .. })
    }

    /// Attach a line number to a per-record error raised without one
    pub fn at_line(self, line: usize) -> Self {
        match self {
            TraceError::MalformedLine { message, .. } => TraceError::MalformedLine { line, message },
            TraceError::Validation { message, .. } => TraceError::Validation { line, message },
            other => other,
        }
    }
}

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A dropped-record report with its 1-based trace line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
}

impl Diagnostic {
    pub fn warning(message: String, line: usize) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            line,
        }
    }

    pub fn note(message: String, line: usize) -> Self {
        Self {
            severity: Severity::Note,
            message,
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}

/// Collects diagnostics for one conversion run
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    warning_count: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dropped record
    pub fn warning(&mut self, message: String, line: usize) {
        self.diagnostics.push(Diagnostic::warning(message, line));
        self.warning_count += 1;
    }

    /// Record an informational note; notes do not count as drops
    pub fn note(&mut self, message: String, line: usize) {
        self.diagnostics.push(Diagnostic::note(message, line));
    }

    /// Record a per-record error as a warning
    pub fn report(&mut self, error: &TraceError) {
        let line = match error {
            TraceError::MalformedLine { line, .. } | TraceError::Validation { line, .. } => *line,
            _ => 0,
        };
        self.warning(error.to_string(), line);
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match self.warning_count {
            0 => "No records dropped".to_string(),
            1 => "1 record dropped".to_string(),
            n => format!("{} records dropped", n),
        }
    }
}
