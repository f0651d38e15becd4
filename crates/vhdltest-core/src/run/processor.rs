//! Run Processor: a rule table bound to process execution and classification.

use crate::error::Result;
use crate::run::line::{RunLine, Severity};
use crate::run::program::run_program;
use crate::run::results::RunResults;
use crate::run::rule::{classify, rule_table, RunLineRule};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::{Duration, Instant};

/// Classifies the output of external programs against a fixed rule table.
#[derive(Debug, Clone, Default)]
pub struct RunProcessor {
    rules: Vec<RunLineRule>,
}

impl RunProcessor {
    pub fn new(rules: Vec<RunLineRule>) -> Self {
        Self { rules }
    }

    /// Build a processor from `(severity, pattern)` pairs, in order.
    pub fn from_patterns(rules: &[(Severity, &str)]) -> Result<Self> {
        Ok(Self::new(rule_table(rules)?))
    }

    pub fn rules(&self) -> &[RunLineRule] {
        &self.rules
    }

    /// Severity of a single line; the first matching rule wins.
    pub fn classify(&self, line: &str) -> Severity {
        classify(&self.rules, line)
    }

    /// Classify captured output.
    ///
    /// Line endings are normalised to `\n` before splitting. A trailing line
    /// terminator therefore yields a final empty `Text` line.
    pub fn parse(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        output: &str,
        exit_code: i32,
    ) -> RunResults {
        let normalized = output.replace("\r\n", "\n");
        let lines: Vec<RunLine> = normalized
            .split('\n')
            .map(|text| RunLine::new(self.classify(text), text))
            .collect();

        let summary = Severity::summarize(exit_code, &lines);
        let duration = (end - start)
            .to_std()
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0);

        RunResults::new(summary, start, duration, exit_code, output, lines)
    }

    /// Run `application` to completion and classify its output.
    pub async fn execute(
        &self,
        application: &Path,
        working_dir: Option<&Path>,
        args: &[String],
    ) -> Result<RunResults> {
        self.execute_with_timeout(application, working_dir, args, None)
            .await
    }

    /// As [`execute`](Self::execute), killing the program if it outlives
    /// `timeout`.
    pub async fn execute_with_timeout(
        &self,
        application: &Path,
        working_dir: Option<&Path>,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<RunResults> {
        let start = Utc::now();
        let clock = Instant::now();

        let program = run_program(application, working_dir, args, timeout).await?;

        let elapsed = clock.elapsed();
        let end = start
            + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());
        let results = self.parse(start, end, &program.output, program.exit_code);

        tracing::debug!(
            application = %application.display(),
            exit_code = results.exit_code,
            summary = %results.summary,
            duration_secs = results.duration,
            "run classified"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn processor() -> RunProcessor {
        RunProcessor::from_patterns(&[(Severity::Warning, "^Warning:"), (Severity::Error, "^Error:")])
            .expect("valid rules")
    }

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, secs).unwrap()
    }

    #[test]
    fn test_parse_classifies_each_line() {
        let results = processor().parse(
            at(0),
            at(2),
            "Compiled\nWarning: unused signal\nError: type mismatch",
            1,
        );
        let severities: Vec<Severity> = results.lines.iter().map(|l| l.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Text, Severity::Warning, Severity::Error]
        );
        assert_eq!(results.summary, Severity::Error);
        assert_eq!(results.duration, 2.0);
        assert_eq!(results.start, at(0));
    }

    #[test]
    fn test_parse_keeps_raw_output() {
        let results = processor().parse(at(0), at(0), "a\r\nb", 0);
        assert_eq!(results.output, "a\r\nb");
        assert_eq!(results.lines.len(), 2);
    }

    #[test]
    fn test_parse_trailing_newline_yields_empty_line() {
        let results = processor().parse(at(0), at(0), "Compiled\n", 0);
        assert_eq!(results.lines.len(), 2);
        assert_eq!(results.lines[1], RunLine::new(Severity::Text, ""));
    }

    #[test]
    fn test_parse_negative_span_is_zero_duration() {
        let results = processor().parse(at(5), at(0), "", 0);
        assert_eq!(results.duration, 0.0);
    }
}
