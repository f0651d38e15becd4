//! Run Processor classification and execution behaviour.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use vhdltest_core::{RunProcessor, Severity};

fn sample_processor() -> RunProcessor {
    RunProcessor::from_patterns(&[(Severity::Warning, "^Warning:"), (Severity::Error, "^Error:")])
        .expect("valid rules")
}

fn severity_processor() -> RunProcessor {
    RunProcessor::from_patterns(&[
        (Severity::Info, "^Info:"),
        (Severity::Warning, "^Warning:"),
        (Severity::Error, "^Error:"),
    ])
    .expect("valid rules")
}

fn line_for(severity: Severity, index: usize) -> String {
    match severity {
        Severity::Text => format!("line {index}"),
        Severity::Info => format!("Info: line {index}"),
        Severity::Warning => format!("Warning: line {index}"),
        Severity::Error => format!("Error: line {index}"),
    }
}

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Text),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

#[test]
fn overlapping_rules_first_match_wins() {
    let processor = RunProcessor::from_patterns(&[
        (Severity::Text, "foo bar"),
        (Severity::Error, "foo"),
    ])
    .expect("valid rules");
    assert_eq!(processor.classify("foo bar"), Severity::Text);
}

#[test]
fn unmatched_line_defaults_to_text() {
    assert_eq!(sample_processor().classify("nothing to see"), Severity::Text);
}

#[test]
fn mixed_line_endings_split_into_lines() {
    let start = Utc::now();
    let results = sample_processor().parse(start, start, "a\r\nb\nc", 0);
    let texts: Vec<&str> = results.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn parse_is_deterministic() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 4).unwrap();
    let output = "Compiled\nWarning: unused signal\nError: type mismatch";
    let processor = sample_processor();
    assert_eq!(
        processor.parse(start, end, output, 1),
        processor.parse(start, end, output, 1)
    );
}

#[test]
fn failing_run_scenario() {
    let start = Utc::now();
    let results = sample_processor().parse(
        start,
        start,
        "Compiled\nWarning: unused signal\nError: type mismatch",
        1,
    );
    let severities: Vec<Severity> = results.lines.iter().map(|l| l.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Text, Severity::Warning, Severity::Error]
    );
    assert_eq!(results.summary, Severity::Error);

    let test = vhdltest_core::TestResult::new("tb", "tb", results);
    assert!(test.failed());
    assert_eq!(test.error_message(), "Error: type mismatch");
}

#[test]
fn passing_run_scenario() {
    let start = Utc::now();
    let results = sample_processor().parse(start, start, "Compiled OK", 0);
    assert_eq!(results.lines.len(), 1);
    assert_eq!(results.lines[0].severity, Severity::Text);
    assert_eq!(results.summary, Severity::Text);

    let test = vhdltest_core::TestResult::new("tb", "tb", results);
    assert!(test.passed());
}

#[test]
fn nonzero_exit_without_error_lines_is_error() {
    let start = Utc::now();
    let results = sample_processor().parse(start, start, "Compiled OK", 2);
    assert_eq!(results.summary, Severity::Error);
    assert_eq!(results.error_message(), "");
}

proptest! {
    #[test]
    fn summary_is_max_of_exit_floor_and_lines(
        exit_code in prop_oneof![Just(0i32), -2i32..4],
        severities in proptest::collection::vec(any_severity(), 0..24),
    ) {
        let output = severities
            .iter()
            .enumerate()
            .map(|(index, severity)| line_for(*severity, index))
            .collect::<Vec<_>>()
            .join("\n");
        let start = Utc::now();
        let results = severity_processor().parse(start, start, &output, exit_code);

        let floor = if exit_code != 0 { Severity::Error } else { Severity::Text };
        let expected = severities.iter().copied().fold(floor, Ord::max);
        prop_assert_eq!(results.summary, expected);

        if !severities.is_empty() {
            let classified: Vec<Severity> = results.lines.iter().map(|l| l.severity).collect();
            prop_assert_eq!(classified, severities);
        }
    }
}

#[cfg(unix)]
mod execute {
    use super::*;
    use std::path::Path;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn execute_classifies_combined_output() {
        let results = sample_processor()
            .execute(
                Path::new("sh"),
                None,
                &sh("echo Compiled; echo 'Error: type mismatch' 1>&2; exit 1"),
            )
            .await
            .expect("sh runs");
        assert_eq!(results.exit_code, 1);
        assert_eq!(results.summary, Severity::Error);
        assert!(results.output.starts_with("Compiled\n"));
        assert_eq!(results.error_message(), "Error: type mismatch");
        assert!(results.duration >= 0.0);
    }

    #[tokio::test]
    async fn execute_reports_start_failure() {
        let err = sample_processor()
            .execute(Path::new("/nonexistent/simulator"), None, &[])
            .await
            .expect_err("missing binary");
        assert!(matches!(
            err,
            vhdltest_core::VhdlTestError::ProcessStart { .. }
        ));
    }
}
