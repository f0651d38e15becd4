//! The Test Results aggregate: build outcome plus every test verdict.

use crate::error::{Result, VhdlTestError};
use crate::results::{junit, trx, TestResult};
use crate::run::RunResults;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Report formats selected by results-file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Trx,
    Junit,
}

impl ReportFormat {
    /// `.xml` selects JUnit; every other extension selects TRX.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => ReportFormat::Junit,
            _ => ReportFormat::Trx,
        }
    }
}

/// Aggregate of one end-to-end run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    /// Unique run identifier.
    pub run_id: Uuid,

    /// Human-readable run name.
    pub run_name: String,

    /// Code base the tests were run from.
    pub code_base: String,

    /// Outcome of the compile step, once it has run.
    pub build_results: Option<RunResults>,

    /// Test verdicts in execution order.
    pub tests: Vec<TestResult>,
}

impl TestResults {
    pub fn new(run_name: impl Into<String>, code_base: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_name: run_name.into(),
            code_base: code_base.into(),
            build_results: None,
            tests: Vec::new(),
        }
    }

    pub fn set_build_results(&mut self, build: RunResults) {
        self.build_results = Some(build);
    }

    pub fn add_test(&mut self, test: TestResult) {
        self.tests.push(test);
    }

    pub fn passes(&self) -> impl Iterator<Item = &TestResult> {
        self.tests.iter().filter(|t| t.passed())
    }

    pub fn fails(&self) -> impl Iterator<Item = &TestResult> {
        self.tests.iter().filter(|t| t.failed())
    }

    pub fn total(&self) -> usize {
        self.tests.len()
    }

    pub fn passed_count(&self) -> usize {
        self.passes().count()
    }

    pub fn failed_count(&self) -> usize {
        self.fails().count()
    }

    /// True when no test failed. An empty aggregate passes.
    pub fn is_success(&self) -> bool {
        self.fails().next().is_none()
    }

    pub fn to_trx(&self) -> Result<String> {
        trx::to_trx(self, &machine_name())
    }

    pub fn to_junit(&self) -> Result<String> {
        junit::to_junit(self)
    }

    /// Write a report, choosing the format from the file extension.
    pub fn save_results(&self, path: &Path) -> Result<()> {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(VhdlTestError::InvalidArgument(
                "Results file name must not be empty".to_string(),
            ));
        }

        let format = ReportFormat::from_path(path);
        let document = match format {
            ReportFormat::Junit => self.to_junit()?,
            ReportFormat::Trx => self.to_trx()?,
        };
        std::fs::write(path, document)?;

        tracing::info!(path = %path.display(), ?format, tests = self.total(), "results saved");
        Ok(())
    }
}

/// Default run name: `user@machine timestamp`.
pub fn default_run_name() -> String {
    format!(
        "{}@{} {}",
        whoami::username(),
        machine_name(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Name of the host running the tests.
pub fn machine_name() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string())
}
