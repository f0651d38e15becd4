//! VHDLTest core library.
//!
//! Classifies simulator output into severity-tagged lines, aggregates test
//! verdicts and writes TRX/JUnit reports. Simulator backends live in
//! `vhdltest-sim`.

pub mod console;
pub mod error;
pub mod results;
pub mod run;
pub mod telemetry;

pub use console::{
    results_summary_lines, run_results_lines, test_summary_line, CapturedOutput, ConsoleLine,
    OutputSink, Span, Tone,
};
pub use error::{Result, VhdlTestError};
pub use results::{default_run_name, machine_name, ReportFormat, TestResult, TestResults};
pub use run::{run_program, ProgramOutput, RunLine, RunLineRule, RunProcessor, RunResults, Severity};
pub use telemetry::init_tracing;

/// Version of the VHDLTest tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
