//! ModelSim and QuestaSim backend.

use crate::config::Options;
use crate::locate::find_simulator;
use crate::simulator::{arg_list, describe_run, ensure_library_dir, require_path, Simulator, SimulatorKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

const COMPILE_RULES: &[(Severity, &str)] = &[(Severity::Error, ".*Error: ")];

const TEST_RULES: &[(Severity, &str)] = &[
    (Severity::Info, ".*Note: "),
    (Severity::Warning, ".*Warning: "),
    (Severity::Error, ".*Error: "),
    (Severity::Error, ".*Failure: "),
];

const KIND: SimulatorKind = SimulatorKind::ModelSim;

/// ModelSim/QuestaSim, driven through `vsim -c -do <script>`.
#[derive(Debug, Clone)]
pub struct ModelSimSimulator {
    path: Option<PathBuf>,
    compile: RunProcessor,
    test: RunProcessor,
}

impl ModelSimSimulator {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            path,
            compile: RunProcessor::from_patterns(COMPILE_RULES)?,
            test: RunProcessor::from_patterns(TEST_RULES)?,
        })
    }

    /// Locate `vsim` via `VHDLTEST_MODELSIM_PATH` or `PATH`.
    pub fn discover() -> Result<Self> {
        Self::new(find_simulator("VHDLTEST_MODELSIM_PATH", "vsim"))
    }

    pub fn compile_processor(&self) -> &RunProcessor {
        &self.compile
    }

    pub fn test_processor(&self) -> &RunProcessor {
        &self.test
    }
}

/// Compile script run from the library directory.
pub fn compile_script(files: &[String]) -> String {
    let mut script = String::from("onerror {exit -code 1}\nvlib work\nset worklib work\n");
    for file in files {
        script.push_str(&format!("vcom -2008 ../../{file}\n"));
    }
    script.push_str("exit -code 0\n");
    script
}

pub fn test_script(test: &str) -> String {
    format!(
        "onerror {{exit -code 1}}\nset worklib work\nvsim -quiet {test}\nrun -all\nendsim\nexit -code 0\n"
    )
}

#[async_trait]
impl Simulator for ModelSimSimulator {
    fn kind(&self) -> SimulatorKind {
        KIND
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting ModelSim compile...");
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = ensure_library_dir(options, KIND).await?;
        sink.write_verbose(&format!("  Library Directory: {}", lib_dir.display()));

        let script = lib_dir.join("compile.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, compile_script(&options.config.files)).await?;

        let application = sim_path.join("vsim");
        let args = arg_list(["-c", "-do", "compile.do"]);
        describe_run(sink, &application, &lib_dir, &args);
        self.compile
            .execute_with_timeout(&application, Some(&lib_dir), &args, options.timeout)
            .await
    }

    async fn test(
        &self,
        options: &Options,
        test: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<TestResult> {
        sink.write_verbose(&format!("Starting ModelSim test {test}..."));
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = options.library_dir(KIND.name());
        let script = lib_dir.join("test.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, test_script(test)).await?;

        let application = sim_path.join("vsim");
        let args = arg_list(["-c", "-do", "test.do"]);
        describe_run(sink, &application, &lib_dir, &args);
        let results = self
            .test
            .execute_with_timeout(&application, Some(&lib_dir), &args, options.timeout)
            .await?;
        Ok(TestResult::new(test, test, results))
    }
}
