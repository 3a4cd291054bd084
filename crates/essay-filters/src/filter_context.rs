/*
 * filter_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Context for filter execution, enabling diagnostics.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A message emitted by a filter while walking the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Context for filter execution.
///
/// This context is threaded through the traversal functions so filters can
/// emit warnings and errors without aborting the walk. Errors fail the run
/// once traversal is complete.
#[derive(Debug, Default)]
pub struct FilterContext {
    /// Output format pandoc passed on the command line, if any
    pub target_format: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl FilterContext {
    /// Create a new empty filter context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_format(target_format: Option<String>) -> Self {
        Self {
            target_format,
            diagnostics: Vec::new(),
        }
    }

    /// Add a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(error = %message, "Filter error recorded");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message,
        });
    }

    /// Check if any errors were collected
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Consume context and return diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get reference to diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
