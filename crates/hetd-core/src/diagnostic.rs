//! Per-event problems collected during a run.

use std::fmt;

use serde::Serialize;

/// How serious a per-event problem is. Neither level stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Prefix used when the diagnostic is printed.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Error => "ERROR",
        }
    }
}

/// A non-fatal message about an event that was left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// The description had no usable `CODE - Name` line.
    #[must_use]
    pub fn missing_code(title: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!("Could not extract code from event: {title}"),
        }
    }

    /// The title had no `CM`/`TD`/`TP` marker.
    #[must_use]
    pub fn missing_category(title: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!("No category (TP/TD/CM) found in event: {title}"),
        }
    }

    /// The title had more than one marker.
    #[must_use]
    pub fn ambiguous_category(title: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: format!("Multiple categories (TP/TD/CM) found in event: {title}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.label(), self.message)
    }
}
