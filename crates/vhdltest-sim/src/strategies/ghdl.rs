//! GHDL backend.

use crate::config::{library_subdir, Options};
use crate::locate::find_simulator;
use crate::simulator::{arg_list, describe_run, ensure_library_dir, require_path, Simulator, SimulatorKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

const COMPILE_RULES: &[(Severity, &str)] = &[
    (Severity::Warning, r".*:\d+:\d+:warning:"),
    (Severity::Error, r".*:\d+:\d+: "),
    (Severity::Error, r".*:error:"),
    (Severity::Error, r".*: cannot open"),
];

const TEST_RULES: &[(Severity, &str)] = &[
    (Severity::Info, r".*:\(assertion note\):"),
    (Severity::Info, r".*:\(report note\):"),
    (Severity::Warning, r".*:\(assertion warning\):"),
    (Severity::Warning, r".*:\(report warning\):"),
    (Severity::Error, r".*:\(assertion error\):"),
    (Severity::Error, r".*:\(report error\):"),
    (Severity::Error, r".*:\(assertion failure\):"),
    (Severity::Error, r".*:\(report failure\):"),
    (Severity::Error, r".*:error:"),
];

const KIND: SimulatorKind = SimulatorKind::Ghdl;

/// GHDL, driven through `ghdl -a` and `ghdl -r`.
#[derive(Debug, Clone)]
pub struct GhdlSimulator {
    path: Option<PathBuf>,
    compile: RunProcessor,
    test: RunProcessor,
}

impl GhdlSimulator {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            path,
            compile: RunProcessor::from_patterns(COMPILE_RULES)?,
            test: RunProcessor::from_patterns(TEST_RULES)?,
        })
    }

    /// Locate GHDL via `VHDLTEST_GHDL_PATH` or `PATH`.
    pub fn discover() -> Result<Self> {
        Self::new(find_simulator("VHDLTEST_GHDL_PATH", "ghdl"))
    }

    pub fn compile_processor(&self) -> &RunProcessor {
        &self.compile
    }

    pub fn test_processor(&self) -> &RunProcessor {
        &self.test
    }
}

/// Response file listing every source, one per line.
pub fn compile_script(files: &[String]) -> String {
    files.iter().map(|file| format!("{file}\n")).collect()
}

pub fn compile_args() -> Vec<String> {
    let workdir = library_subdir(KIND.name());
    vec![
        "-a".to_string(),
        "--std=08".to_string(),
        format!("--workdir={workdir}"),
        format!("@{workdir}/compile.rsp"),
    ]
}

pub fn test_args(test: &str) -> Vec<String> {
    let mut args = arg_list(["-r", "--std=08"]);
    args.push(format!("--workdir={}", library_subdir(KIND.name())));
    args.push(test.to_string());
    args
}

#[async_trait]
impl Simulator for GhdlSimulator {
    fn kind(&self) -> SimulatorKind {
        KIND
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting GHDL compile...");
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = ensure_library_dir(options, KIND).await?;
        sink.write_verbose(&format!("  Library Directory: {}", lib_dir.display()));

        let script = lib_dir.join("compile.rsp");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, compile_script(&options.config.files)).await?;

        let application = sim_path.join("ghdl");
        let args = compile_args();
        describe_run(sink, &application, &options.working_dir, &args);
        self.compile
            .execute_with_timeout(&application, Some(&options.working_dir), &args, options.timeout)
            .await
    }

    async fn test(
        &self,
        options: &Options,
        test: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<TestResult> {
        sink.write_verbose(&format!("Starting GHDL test {test}..."));
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let application = sim_path.join("ghdl");
        let args = test_args(test);
        describe_run(sink, &application, &options.working_dir, &args);
        let results = self
            .test
            .execute_with_timeout(&application, Some(&options.working_dir), &args, options.timeout)
            .await?;
        Ok(TestResult::new(test, test, results))
    }
}
