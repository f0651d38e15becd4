//! Self-validation.
//!
//! Runs the bundled half/full-adder project through a child `vhdltest`
//! process and checks that passing and failing testbenches are reported as
//! such. The outcome is printed as a markdown report and can be saved as a
//! test-results file.

use crate::Cli;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tokio::process::Command;
use vhdltest_core::{
    machine_name, OutputSink, RunLine, RunResults, Severity, TestResult, TestResults, VERSION,
};

const FIXTURES: &[(&str, &str)] = &[
    ("validate.yaml", include_str!("validation/validate.yaml")),
    ("half_adder.vhd", include_str!("validation/half_adder.vhd")),
    ("full_adder.vhd", include_str!("validation/full_adder.vhd")),
    (
        "half_adder_pass_tb.vhd",
        include_str!("validation/half_adder_pass_tb.vhd"),
    ),
    (
        "half_adder_fail_tb.vhd",
        include_str!("validation/half_adder_fail_tb.vhd"),
    ),
    (
        "full_adder_pass_tb.vhd",
        include_str!("validation/full_adder_pass_tb.vhd"),
    ),
    (
        "full_adder_fail_tb.vhd",
        include_str!("validation/full_adder_fail_tb.vhd"),
    ),
];

const CLASS_NAME: &str = "VHDLTest.Validation";

/// What a validation check looks for in the child's log.
struct Check {
    name: &'static str,
    expected: [&'static str; 2],
}

const CHECKS: [Check; 2] = [
    Check {
        name: "TestPasses",
        expected: ["Passed full_adder_pass_tb", "Passed half_adder_pass_tb"],
    },
    Check {
        name: "TestFails",
        expected: ["Failed full_adder_fail_tb", "Failed half_adder_fail_tb"],
    },
];

/// Output of one child run.
struct ChildRun {
    exit_code: i32,
    log: String,
}

pub async fn run(cli: &Cli, sink: &mut dyn OutputSink) -> Result<()> {
    write_header(cli.depth, sink);

    let mut results = TestResults::new("Validation", "VHDLTest");
    for check in &CHECKS {
        let result = run_check(check, cli.simulator.as_deref(), sink).await?;
        results.add_test(result);
    }

    if let Some(path) = cli.results.as_deref() {
        results.save_results(path)?;
    }

    Ok(())
}

fn write_header(depth: u8, sink: &mut dyn OutputSink) {
    let heading = "#".repeat(usize::from(depth.max(1)));
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%SZ").to_string();

    sink.write_text(&format!("{heading} DEMAConsulting.VHDLTest"));
    sink.write_blank();
    sink.write_text(
        "| Information         | Value                                              |",
    );
    sink.write_text(
        "| :------------------ | :------------------------------------------------- |",
    );
    for (label, value) in [
        ("VHDLTest Version", VERSION.to_string()),
        ("Machine Name", machine_name()),
        ("OS Version", whoami::distro()),
        ("Time Stamp", timestamp),
    ] {
        sink.write_text(&format!("| {label:<19} | {value:<50} |"));
    }
    sink.write_blank();
    sink.write_text("Tests:");
    sink.write_blank();
}

async fn run_check(
    check: &Check,
    simulator: Option<&str>,
    sink: &mut dyn OutputSink,
) -> Result<TestResult> {
    let start = Utc::now();
    let timer = Instant::now();
    let child = run_child(simulator).await?;
    let duration = timer.elapsed().as_secs_f64();

    let succeeded =
        child.exit_code == 0 && check.expected.iter().all(|text| child.log.contains(text));
    tracing::info!(check = check.name, succeeded, "validation check finished");

    let line = if succeeded {
        sink.write_text(&format!("- {}: Passed", check.name));
        RunLine::new(Severity::Info, format!("{} Passed", check.name))
    } else {
        sink.write_error(&format!("- {}: Failed", check.name));
        RunLine::new(Severity::Error, format!("{} Failed", check.name))
    };

    let run_results = RunResults::new(
        line.severity,
        start,
        duration,
        child.exit_code,
        child.log,
        vec![line],
    );
    Ok(TestResult::new(
        CLASS_NAME,
        format!("VHDLTest_{}", check.name),
        run_results,
    ))
}

/// Extract the fixtures into a scratch directory and run this executable on
/// them.
async fn run_child(simulator: Option<&str>) -> Result<ChildRun> {
    let dir = tempfile::Builder::new()
        .prefix("vhdltest-validation")
        .tempdir()
        .context("Unable to create validation directory")?;
    extract_fixtures(dir.path())?;

    let exe = std::env::current_exe().context("Unable to locate the vhdltest executable")?;
    let mut command = Command::new(&exe);
    command
        .current_dir(dir.path())
        .args([
            "--log",
            "output.log",
            "--silent",
            "--config",
            "validate.yaml",
            "--exit-0",
        ])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());
    if let Some(simulator) = simulator {
        command.args(["--simulator", simulator]);
    }

    let status = command
        .status()
        .await
        .with_context(|| format!("Unable to start {}", exe.display()))?;
    let log = std::fs::read_to_string(dir.path().join("output.log")).unwrap_or_default();

    Ok(ChildRun {
        exit_code: status.code().unwrap_or(-1),
        log,
    })
}

fn extract_fixtures(dir: &Path) -> Result<()> {
    for (name, content) in FIXTURES {
        let target = dir.join(name);
        std::fs::write(&target, content)
            .with_context(|| format!("Unable to write {}", target.display()))?;
    }
    Ok(())
}
