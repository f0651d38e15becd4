//! JUnit XML report writer.

use crate::error::{Result, VhdlTestError};
use crate::results::test_results::TestResults;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::time::Duration;

/// Render the aggregate as a JUnit `testsuites` document.
pub fn to_junit(results: &TestResults) -> Result<String> {
    let mut suite = TestSuite::new(results.code_base.as_str());
    for test in &results.tests {
        let status = if test.passed() {
            TestCaseStatus::success()
        } else {
            let message = test.error_message();
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            status
                .set_message(message.as_str())
                .set_description(message.as_str());
            status
        };

        let mut testcase = TestCase::new(test.test_name.as_str(), status);
        testcase
            .set_classname(test.class_name.as_str())
            .set_time(Duration::from_secs_f64(test.duration().max(0.0)))
            .set_system_out(test.run_results.output.as_str());
        suite.add_test_case(testcase);
    }
    if let Some(build) = &results.build_results {
        suite.set_system_out(build.output.as_str());
    }

    let mut report = Report::new(results.run_name.as_str());
    report.add_test_suite(suite);

    let mut buffer = Vec::new();
    report
        .serialize(&mut buffer)
        .map_err(|e| VhdlTestError::Report(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| VhdlTestError::Report(e.to_string()))
}
