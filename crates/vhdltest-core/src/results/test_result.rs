//! A named test and its verdict.

use crate::run::{RunResults, Severity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one testbench.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    /// Class name reported to test tooling.
    pub class_name: String,

    /// Testbench name.
    pub test_name: String,

    /// Test definition identifier.
    pub test_id: Uuid,

    /// Test execution identifier.
    pub execution_id: Uuid,

    /// Classified run of the testbench.
    pub run_results: RunResults,
}

impl TestResult {
    /// Wrap a run with freshly generated identifiers.
    pub fn new(
        class_name: impl Into<String>,
        test_name: impl Into<String>,
        run_results: RunResults,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            test_name: test_name.into(),
            test_id: Uuid::new_v4(),
            execution_id: Uuid::new_v4(),
            run_results,
        }
    }

    pub fn passed(&self) -> bool {
        self.run_results.summary < Severity::Error
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    /// Newline-joined text of the run's error lines.
    pub fn error_message(&self) -> String {
        self.run_results.error_message()
    }

    /// Duration of the run in seconds.
    pub fn duration(&self) -> f64 {
        self.run_results.duration
    }
}
