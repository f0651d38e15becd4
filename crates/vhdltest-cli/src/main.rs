//! VHDLTest - VHDL Test Bench Runner
//!
//! The `vhdltest` command compiles the VHDL sources named in a YAML
//! configuration with a selected simulator, runs each testbench, and reports
//! pass/fail verdicts on the console and in TRX/JUnit results files.
//!
//! ## Exit codes
//!
//! - `0`: every test passed, or `--exit-0` was given and only tests failed
//! - `1`: a test failed, the build failed, or an error was reported

mod context;
mod validation;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use context::ConsoleSink;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use vhdltest_core::{
    init_tracing, results_summary_lines, OutputSink, TestResults, VhdlTestError, VERSION,
};
use vhdltest_sim::{execute_default, Options, SimulatorRegistry};

#[derive(Parser, Debug)]
#[command(name = "vhdltest")]
#[command(about = "VHDL Test Bench Runner", long_about = None)]
#[command(override_usage = "vhdltest [options] [--] [tests]...")]
#[command(disable_version_flag = true)]
pub(crate) struct Cli {
    /// Display version
    #[arg(short = 'v', long)]
    version: bool,

    /// Validate operation against the bundled adder project
    #[arg(long)]
    validate: bool,

    /// Markdown heading depth of the validation report
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=6))]
    depth: u8,

    /// Configuration file (YAML)
    #[arg(short, long, value_name = "CONFIG.YAML")]
    config: Option<PathBuf>,

    /// Suppress console output
    #[arg(long)]
    silent: bool,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// Mirror output to a log file
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Test results file; `.xml` writes JUnit, anything else TRX
    #[arg(short, long, value_name = "OUT.TRX")]
    results: Option<PathBuf>,

    /// Simulator to use (GHDL, ModelSim, QuestaSim, Vivado, ActiveHDL, NVC, Mock)
    #[arg(short, long, value_name = "NAME")]
    simulator: Option<String>,

    /// Exit with code 0 even if tests fail
    #[arg(short = '0', long = "exit-0")]
    exit_zero: bool,

    /// Kill a simulator invocation after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Emit JSON-formatted diagnostic log lines
    #[arg(long)]
    log_json: bool,

    /// Tests to run instead of those in the configuration file
    #[arg(value_name = "TESTS")]
    tests: Vec<String>,
}

fn banner() -> String {
    format!("VHDL Test Bench Runner (VHDLTest) {VERSION}")
}

/// Report an argument problem before a sink exists.
fn argument_error(message: &str) -> ExitCode {
    println!("{}", banner());
    println!();
    let mut sink = match ConsoleSink::new(false, false, None) {
        Ok(sink) => sink,
        Err(_) => return ExitCode::FAILURE,
    };
    sink.write_error(&format!("Error: {message}"));
    sink.write_blank();
    println!("{}", Cli::command().render_help());
    ExitCode::FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        return argument_error("No arguments specified");
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            println!("{}", banner());
            println!();
            // Help output goes to stdout; a failed print is not actionable.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            return argument_error(message);
        }
    };

    if cli.version {
        println!("{VERSION}");
        return ExitCode::SUCCESS;
    }

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.log_json, level);

    let mut sink = match ConsoleSink::new(cli.silent, cli.verbose, cli.log.as_deref()) {
        Ok(sink) => sink,
        Err(e) => return argument_error(&format!("{e:#}")),
    };
    sink.write_text(&banner());
    sink.write_blank();

    let mut tests_failed = false;
    if cli.validate {
        match validation::run(&cli, &mut sink).await {
            Ok(()) if sink.errors() == 0 => {
                sink.write_blank();
                sink.write_text("Validation Passed");
            }
            Ok(()) => {}
            Err(e) => report_error(&mut sink, &e),
        }
    } else {
        match run_tests(&cli, &mut sink).await {
            Ok(results) => tests_failed = results.failed_count() > 0,
            Err(e) => report_error(&mut sink, &e),
        }
    }

    let code = if tests_failed && !cli.exit_zero {
        1
    } else {
        sink.exit_code()
    };
    sink.flush();
    ExitCode::from(code)
}

fn report_error(sink: &mut ConsoleSink, error: &anyhow::Error) {
    tracing::debug!(error = ?error, "run aborted");
    sink.write_error(&format!("Error: {error:#}"));
    sink.write_blank();
}

/// Tests named on the command line, if any.
fn custom_tests(tests: &[String]) -> Option<Vec<String>> {
    if tests.is_empty() {
        None
    } else {
        Some(tests.to_vec())
    }
}

async fn run_tests(cli: &Cli, sink: &mut ConsoleSink) -> Result<TestResults> {
    let config = cli.config.as_deref().ok_or_else(|| {
        VhdlTestError::InvalidArgument("Configuration file not specified".to_string())
    })?;

    let registry = SimulatorRegistry::discover()?;
    let simulator = registry.get(cli.simulator.as_deref())?;

    let options = Options::from_config_file(config)?
        .with_custom_tests(custom_tests(&cli.tests))
        .with_verbose(cli.verbose)
        .with_timeout(cli.timeout.map(Duration::from_secs));

    let results = execute_default(&options, simulator, sink).await?;
    for line in results_summary_lines(&results) {
        sink.write_line(&line);
    }

    if let Some(path) = cli.results.as_deref() {
        results.save_results(path)?;
    }

    Ok(results)
}
