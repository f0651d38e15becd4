//! Build-then-test orchestration.

use crate::config::Options;
use crate::simulator::Simulator;
use tracing::info;
use vhdltest_core::{
    default_run_name, run_results_lines, test_summary_line, ConsoleLine, OutputSink, Result,
    TestResults, Tone, VhdlTestError,
};

/// Compile, then run every test in order.
///
/// A compile that reaches `Error` stops the run with
/// [`VhdlTestError::BuildFailed`] before any test starts. Failing tests are
/// recorded and never stop the loop.
pub async fn execute(
    run_name: &str,
    code_base: &str,
    options: &Options,
    simulator: &dyn Simulator,
    sink: &mut dyn OutputSink,
) -> Result<TestResults> {
    let mut results = TestResults::new(run_name, code_base);

    info!(simulator = simulator.name(), "building");
    sink.write_text(&format!("Building with {}...", simulator.name()));
    let build = simulator.compile(options, sink).await?;
    for line in run_results_lines(&build, options.verbose) {
        sink.write_line(&line);
    }
    let build_failed = build.is_error();
    results.set_build_results(build);
    if build_failed {
        info!(simulator = simulator.name(), "build failed");
        return Err(VhdlTestError::BuildFailed);
    }

    sink.write_line(&ConsoleLine::toned(Tone::Success, "Build Passed"));
    sink.write_blank();

    for test in options.tests() {
        info!(test = %test, "starting test");
        sink.write_text(&format!("Starting {test}"));

        let result = simulator.test(options, test, sink).await?;
        for line in run_results_lines(&result.run_results, options.verbose) {
            sink.write_line(&line);
        }
        sink.write_line(&test_summary_line(&result));
        sink.write_blank();

        info!(
            test = %test,
            passed = result.passed(),
            duration_secs = result.duration(),
            "test finished"
        );
        results.add_test(result);
    }

    Ok(results)
}

/// [`execute`] with the default run name, using the working directory as the
/// code base.
pub async fn execute_default(
    options: &Options,
    simulator: &dyn Simulator,
    sink: &mut dyn OutputSink,
) -> Result<TestResults> {
    let code_base = options.working_dir.display().to_string();
    execute(&default_run_name(), &code_base, options, simulator, sink).await
}
