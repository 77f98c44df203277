//! The diagnostic sink contract, plus a small concrete diagnostic type.
//!
//! Like [`crate::source`], this module's trait is an external
//! collaborator: the scanner only ever calls `add_error`/`add_warning`
//! with a finished message string. [`Diagnostic`] and [`DiagnosticLog`]
//! are provided for callers (and this crate's own tests) that want
//! structured diagnostics instead of writing their own sink from scratch.

use std::fmt;

/// Severity of a reported diagnostic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    /// Non-fatal malformed input; the scanner recovered and kept going.
    Error,
    /// Surprising but not wrong (e.g. a non-ASCII byte used as a symbol).
    Warning,
}

/// A single diagnostic: where, how severe, and what went wrong.
///
/// This is deliberately flat compared to a full compiler's diagnostic
/// type (no error codes, no suggested fixes, no secondary labels) — the
/// scope here is a tokenizer, not a diagnostic renderer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Diagnostic {
    /// Zero-based line of the offending byte.
    pub line: u32,
    /// Zero-based column of the offending byte.
    pub column: u32,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Human-readable message. May span multiple logical sentences (the
    /// unterminated-block-comment diagnostic is reported as two
    /// consecutive errors: the failure itself, then a follow-up pointing
    /// at the comment's opening `/*`).
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Receives diagnostics emitted while scanning.
///
/// Implement this to route tokenizer diagnostics into your own error
/// reporting (terminal output, an IDE's diagnostic list, a JSON log).
pub trait DiagnosticSink {
    /// Report a non-fatal error at `(line, column)`.
    fn add_error(&mut self, line: u32, column: u32, message: String);

    /// Report a warning at `(line, column)`. The scanner only uses this
    /// for the "interpreting non-ASCII codepoint" case; most callers can
    /// treat it the same as `add_error` with a different bucket.
    fn add_warning(&mut self, line: u32, column: u32, message: String) {
        // Default: fold warnings into errors. Most callers that care about
        // the distinction will override this; callers that don't can
        // ignore the split entirely.
        self.add_error(line, column, message);
    }
}

/// A [`DiagnosticSink`] that accumulates [`Diagnostic`] values in order.
///
/// Used by this crate's own tests and suitable for any caller that wants
/// to inspect or sort diagnostics after tokenization finishes rather than
/// stream them live.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics recorded so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `true` if no diagnostics (of either severity) have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Diagnostics with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn add_error(&mut self, line: u32, column: u32, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            column,
            severity: Severity::Error,
            message,
        });
    }

    fn add_warning(&mut self, line: u32, column: u32, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            column,
            severity: Severity::Warning,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_errors_and_warnings_separately() {
        let mut log = DiagnosticLog::new();
        log.add_error(0, 3, "bad thing".to_string());
        log.add_warning(1, 0, "surprising thing".to_string());
        assert_eq!(log.len(), 2);
        assert_eq!(log.errors().count(), 1);
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn log_starts_empty() {
        let log = DiagnosticLog::new();
        assert!(log.is_empty());
        assert_eq!(log.diagnostics(), &[]);
    }

    #[test]
    fn default_add_warning_falls_back_to_error_bucket() {
        struct ErrorsOnly(Vec<(u32, u32, String)>);
        impl DiagnosticSink for ErrorsOnly {
            fn add_error(&mut self, line: u32, column: u32, message: String) {
                self.0.push((line, column, message));
            }
        }
        let mut sink = ErrorsOnly(Vec::new());
        sink.add_warning(2, 5, "hi".to_string());
        assert_eq!(sink.0, vec![(2, 5, "hi".to_string())]);
    }

    #[test]
    fn diagnostic_display_format() {
        let d = Diagnostic {
            line: 3,
            column: 7,
            severity: Severity::Error,
            message: "oops".to_string(),
        };
        assert_eq!(d.to_string(), "3:7: oops");
    }
}
