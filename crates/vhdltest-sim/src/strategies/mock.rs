//! In-process mock simulator.
//!
//! Output is derived from markers in file and test names, so the whole
//! build-then-test flow can be exercised without a real simulator:
//!
//! | Marker      | Compile                   | Test                         |
//! | ----------- | ------------------------- | ---------------------------- |
//! | `_error_`   | `Error: <file>`, exit 1   | `Error: <test>`, exit 1      |
//! | `_warning_` | `Warning: <file>`         | `Warning: <test>` (prefix)   |
//! | `_info_`    | `Info: <file>`            | `Info: <test>` (prefix)      |
//! | `_fail_`    |                           | `Failure: <test>`            |
//! | none        | `Compiled <file>`         | `Passed: <test>`             |

use crate::config::Options;
use crate::simulator::{Simulator, SimulatorKind};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

const COMPILE_RULES: &[(Severity, &str)] = &[
    (Severity::Info, "Info:"),
    (Severity::Warning, "Warning:"),
    (Severity::Error, "Error:"),
];

const TEST_RULES: &[(Severity, &str)] = &[
    (Severity::Info, "Info:"),
    (Severity::Warning, "Warning:"),
    (Severity::Error, "Failure:"),
    (Severity::Error, "Error:"),
];

/// Simulator that never launches a process.
#[derive(Debug, Clone)]
pub struct MockSimulator {
    compile: RunProcessor,
    test: RunProcessor,
}

impl MockSimulator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            compile: RunProcessor::from_patterns(COMPILE_RULES)?,
            test: RunProcessor::from_patterns(TEST_RULES)?,
        })
    }
}

/// Compiler output and exit code for a set of files.
pub fn compile_output(files: &[String]) -> (String, i32) {
    let mut output = String::new();
    let mut exit_code = 0;
    for file in files {
        if file.contains("_error_") {
            output.push_str(&format!("Error: {file}\n"));
            exit_code = 1;
        } else if file.contains("_warning_") {
            output.push_str(&format!("Warning: {file}\n"));
        } else if file.contains("_info_") {
            output.push_str(&format!("Info: {file}\n"));
        } else {
            output.push_str(&format!("Compiled {file}\n"));
        }
    }
    (output, exit_code)
}

/// Testbench output and exit code.
pub fn test_output(test: &str) -> (String, i32) {
    let mut output = String::new();
    let mut exit_code = 0;

    if test.contains("_warning_") {
        output.push_str(&format!("Warning: {test}\n"));
    }
    if test.contains("_info_") {
        output.push_str(&format!("Info: {test}\n"));
    }

    if test.contains("_error_") {
        output.push_str(&format!("Error: {test}\n"));
        exit_code = 1;
    } else if test.contains("_fail_") {
        output.push_str(&format!("Failure: {test}\n"));
    } else {
        output.push_str(&format!("Passed: {test}\n"));
    }
    (output, exit_code)
}

#[async_trait]
impl Simulator for MockSimulator {
    fn kind(&self) -> SimulatorKind {
        SimulatorKind::Mock
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    /// Never reported as available, so discovery cannot select it.
    fn is_available(&self) -> bool {
        false
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting Mock compile...");
        let (output, exit_code) = compile_output(&options.config.files);
        let now = Utc::now();
        Ok(self.compile.parse(now, now, &output, exit_code))
    }

    async fn test(
        &self,
        _options: &Options,
        test: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<TestResult> {
        sink.write_verbose(&format!("Starting Mock test {test}..."));
        let (output, exit_code) = test_output(test);
        let now = Utc::now();
        Ok(TestResult::new(
            test,
            test,
            self.test.parse(now, now, &output, exit_code),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigDocument;
    use vhdltest_core::CapturedOutput;

    fn options(files: &[&str]) -> Options {
        let config = ConfigDocument {
            files: files.iter().map(|f| f.to_string()).collect(),
            tests: vec![],
        };
        Options::new("/work", config)
    }

    #[test]
    fn test_compile_output_markers() {
        let files = vec![
            "a.vhd".to_string(),
            "b_info_.vhd".to_string(),
            "c_warning_.vhd".to_string(),
        ];
        let (output, exit_code) = compile_output(&files);
        assert_eq!(
            output,
            "Compiled a.vhd\nInfo: b_info_.vhd\nWarning: c_warning_.vhd\n"
        );
        assert_eq!(exit_code, 0);

        let (output, exit_code) = compile_output(&["x_error_.vhd".to_string()]);
        assert_eq!(output, "Error: x_error_.vhd\n");
        assert_eq!(exit_code, 1);
    }

    #[test]
    fn test_test_output_markers() {
        assert_eq!(test_output("a_tb"), ("Passed: a_tb\n".to_string(), 0));
        assert_eq!(test_output("a_fail_tb"), ("Failure: a_fail_tb\n".to_string(), 0));
        assert_eq!(test_output("a_error_tb"), ("Error: a_error_tb\n".to_string(), 1));
        assert_eq!(
            test_output("a_warning_info_tb"),
            (
                "Warning: a_warning_info_tb\nInfo: a_warning_info_tb\nPassed: a_warning_info_tb\n"
                    .to_string(),
                0
            )
        );
    }

    #[tokio::test]
    async fn test_compile_warning_passes_build() {
        let sim = MockSimulator::new().expect("rule tables compile");
        let mut sink = CapturedOutput::new(false);
        let build = sim
            .compile(&options(&["a_warning_.vhd"]), &mut sink)
            .await
            .expect("compile");
        assert_eq!(build.summary, Severity::Warning);
    }

    #[tokio::test]
    async fn test_compile_error_fails_build() {
        let sim = MockSimulator::new().expect("rule tables compile");
        let mut sink = CapturedOutput::new(false);
        let build = sim
            .compile(&options(&["a.vhd", "b_error_.vhd"]), &mut sink)
            .await
            .expect("compile");
        assert_eq!(build.summary, Severity::Error);
        assert_eq!(build.error_message(), "Error: b_error_.vhd");
    }

    #[tokio::test]
    async fn test_failure_line_fails_test_with_zero_exit() {
        let sim = MockSimulator::new().expect("rule tables compile");
        let mut sink = CapturedOutput::new(true);
        let result = sim
            .test(&options(&[]), "half_adder_fail_tb", &mut sink)
            .await
            .expect("test");
        assert!(result.failed());
        assert_eq!(result.run_results.exit_code, 0);
        assert_eq!(result.class_name, "half_adder_fail_tb");
        assert!(sink.contains("Starting Mock test half_adder_fail_tb..."));
    }

    #[test]
    fn test_never_available() {
        let sim = MockSimulator::new().expect("rule tables compile");
        assert!(!sim.is_available());
        assert_eq!(sim.name(), "Mock");
    }
}
