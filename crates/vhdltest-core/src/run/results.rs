//! Classified outcome of a single process invocation.

use crate::run::line::{RunLine, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one compile or test invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResults {
    /// Worst severity of the run, never below the exit-code floor.
    pub summary: Severity,

    /// When the invocation started.
    pub start: DateTime<Utc>,

    /// Duration in seconds.
    pub duration: f64,

    /// Process exit code.
    pub exit_code: i32,

    /// Raw combined output.
    pub output: String,

    /// Classified output lines.
    pub lines: Vec<RunLine>,
}

impl RunResults {
    pub fn new(
        summary: Severity,
        start: DateTime<Utc>,
        duration: f64,
        exit_code: i32,
        output: impl Into<String>,
        lines: Vec<RunLine>,
    ) -> Self {
        Self {
            summary,
            start,
            duration,
            exit_code,
            output: output.into(),
            lines,
        }
    }

    /// Whether the run reached `Error` severity.
    pub fn is_error(&self) -> bool {
        self.summary >= Severity::Error
    }

    /// Lines classified at exactly `severity`.
    pub fn lines_of(&self, severity: Severity) -> impl Iterator<Item = &RunLine> {
        self.lines.iter().filter(move |line| line.severity == severity)
    }

    /// Text of the `Error` lines, newline-joined.
    pub fn error_message(&self) -> String {
        self.lines_of(Severity::Error)
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// End of the run, derived from start and duration.
    pub fn end(&self) -> DateTime<Utc> {
        let micros = (self.duration * 1_000_000.0).round() as i64;
        self.start + chrono::Duration::microseconds(micros)
    }
}
