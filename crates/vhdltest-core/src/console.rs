//! Console report formatting.
//!
//! Formatting is pure: functions here turn results into [`ConsoleLine`]s whose
//! spans carry a [`Tone`]. Rendering (colour, silence, log files) belongs to
//! an [`OutputSink`].

use crate::results::{TestResult, TestResults};
use crate::run::{RunResults, Severity};
use std::fmt;

/// Presentation hint for a span of console text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Text,
    Info,
    Warning,
    Error,
    Success,
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Text => Tone::Text,
            Severity::Info => Tone::Info,
            Severity::Warning => Tone::Warning,
            Severity::Error => Tone::Error,
        }
    }
}

/// A run of text sharing one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tone: Tone,
    pub text: String,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsoleLine {
    pub spans: Vec<Span>,
}

impl ConsoleLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line consisting of a single span.
    pub fn toned(tone: Tone, text: impl Into<String>) -> Self {
        Self::new().push(tone, text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::toned(Tone::Text, text)
    }

    pub fn push(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            tone,
            text: text.into(),
        });
        self
    }

    /// The line without tone information.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Destination for formatted output.
pub trait OutputSink: Send {
    /// Emit a formatted line.
    fn write_line(&mut self, line: &ConsoleLine);

    /// Emit a line only when verbose output is enabled.
    fn write_verbose(&mut self, text: &str);

    /// Report an error. Errors are counted.
    fn write_error(&mut self, text: &str);

    fn write_text(&mut self, text: &str) {
        self.write_line(&ConsoleLine::text(text));
    }

    fn write_blank(&mut self) {
        self.write_line(&ConsoleLine::new());
    }
}

/// Echo of a run: non-`Text` lines always, `Text` lines only when verbose.
pub fn run_results_lines(results: &RunResults, verbose: bool) -> Vec<ConsoleLine> {
    results
        .lines
        .iter()
        .filter(|line| verbose || line.severity != Severity::Text)
        .map(|line| ConsoleLine::toned(line.severity.into(), line.text.as_str()))
        .collect()
}

/// `Passed <name> (<secs> seconds)` or `Failed ...`.
pub fn test_summary_line(test: &TestResult) -> ConsoleLine {
    let verdict = if test.passed() {
        ConsoleLine::toned(Tone::Success, "Passed")
    } else {
        ConsoleLine::toned(Tone::Error, "Failed")
    };
    verdict.push(
        Tone::Text,
        format!(" {} ({:.1} seconds)", test.test_name, test.duration()),
    )
}

/// Closing summary of an aggregate.
pub fn results_summary_lines(results: &TestResults) -> Vec<ConsoleLine> {
    let mut lines = vec![ConsoleLine::text("==== summary ===========================")];
    lines.extend(results.tests.iter().map(test_summary_line));
    lines.push(ConsoleLine::text("========================================"));

    let total = results.total();
    let passed = results.passed_count();
    let failed = results.failed_count();
    if passed > 0 {
        lines.push(
            ConsoleLine::toned(Tone::Success, "Passed")
                .push(Tone::Text, format!(" {passed} of {total} tests")),
        );
    }
    if failed > 0 {
        lines.push(
            ConsoleLine::toned(Tone::Error, "Failed")
                .push(Tone::Text, format!(" {failed} of {total} tests")),
        );
    }
    lines
}

/// In-memory sink.
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    pub verbose: bool,
    pub lines: Vec<ConsoleLine>,
    pub errors: usize,
}

impl CapturedOutput {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Captured output as plain text, one line per entry.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}\n", line.plain()))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.plain().contains(needle))
    }
}

impl OutputSink for CapturedOutput {
    fn write_line(&mut self, line: &ConsoleLine) {
        self.lines.push(line.clone());
    }

    fn write_verbose(&mut self, text: &str) {
        if self.verbose {
            self.lines.push(ConsoleLine::text(text));
        }
    }

    fn write_error(&mut self, text: &str) {
        self.errors += 1;
        self.lines.push(ConsoleLine::toned(Tone::Error, text));
    }
}
