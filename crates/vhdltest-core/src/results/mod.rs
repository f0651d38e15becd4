//! Test verdicts, the run aggregate and report writers.

pub mod junit;
pub mod test_result;
pub mod test_results;
pub mod trx;

pub use test_result::TestResult;
pub use test_results::{default_run_name, machine_name, ReportFormat, TestResults};
