//! Classified lines of simulator output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a line of output, or of a whole run.
///
/// Ordering is ascending: `Text < Info < Warning < Error`. Run verdicts take
/// the maximum over a set of lines, so `Error` always dominates.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Normal text.
    #[default]
    Text,

    /// Informational message.
    Info,

    /// Warning message.
    Warning,

    /// Error message.
    Error,
}

impl Severity {
    /// Lowest severity implied by a process exit code.
    ///
    /// A nonzero exit code is always an error, even when no line says so.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code != 0 {
            Severity::Error
        } else {
            Severity::Text
        }
    }

    /// Summary severity of a run: the exit-code floor raised to the worst line.
    pub fn summarize<'a>(exit_code: i32, lines: impl IntoIterator<Item = &'a RunLine>) -> Self {
        lines
            .into_iter()
            .map(|line| line.severity)
            .fold(Self::from_exit_code(exit_code), Ord::max)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Text => "text",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line of output and its classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunLine {
    /// Line classification.
    pub severity: Severity,

    /// Line text, without the line terminator.
    pub text: String,
}

impl RunLine {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}
