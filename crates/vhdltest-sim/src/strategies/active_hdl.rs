//! Aldec Active-HDL backend.

use crate::config::{library_subdir, Options};
use crate::locate::find_simulator;
use crate::simulator::{describe_run, ensure_library_dir, require_path, Simulator, SimulatorKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

const SIM_APP: &str = "vsimsa";

const COMPILE_RULES: &[(Severity, &str)] = &[
    (Severity::Warning, r"KERNEL:\s*Warning:"),
    (Severity::Error, "Error:"),
    (Severity::Error, r"RUNTIME:\s*Fatal Error"),
];

// The Lattice Edition prints licence banners as kernel warnings; they are
// downgraded before the general kernel warning rule sees them.
const TEST_RULES: &[(Severity, &str)] = &[
    (
        Severity::Text,
        r"KERNEL:\s*Warning:\s*You are using the Active-HDL Lattice Edition",
    ),
    (
        Severity::Text,
        r"KERNEL:\s*Warning:\s*Contact Aldec for available upgrade options",
    ),
    (Severity::Warning, r"KERNEL:\s*Warning:"),
    (Severity::Warning, r"KERNEL:\s*WARNING:"),
    (Severity::Info, r"EXECUTION::\s*NOTE"),
    (Severity::Warning, r"EXECUTION::\s*WARNING"),
    (Severity::Error, r"EXECUTION::\s*ERROR"),
    (Severity::Error, r"EXECUTION::\s*FAILURE"),
    (Severity::Error, r"KERNEL:\s*ERROR"),
    (Severity::Error, r"RUNTIME:\s*Fatal Error:"),
    (Severity::Error, r"VSIM:\s*Error:"),
];

const KIND: SimulatorKind = SimulatorKind::ActiveHdl;

/// Active-HDL, driven through the `vsimsa` batch console.
#[derive(Debug, Clone)]
pub struct ActiveHdlSimulator {
    path: Option<PathBuf>,
    compile: RunProcessor,
    test: RunProcessor,
}

impl ActiveHdlSimulator {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            path,
            compile: RunProcessor::from_patterns(COMPILE_RULES)?,
            test: RunProcessor::from_patterns(TEST_RULES)?,
        })
    }

    /// Locate `vsimsa` via `VHDLTEST_ACTIVEHDL_PATH` or `PATH`.
    pub fn discover() -> Result<Self> {
        Self::new(find_simulator("VHDLTEST_ACTIVEHDL_PATH", SIM_APP))
    }

    pub fn compile_processor(&self) -> &RunProcessor {
        &self.compile
    }

    pub fn test_processor(&self) -> &RunProcessor {
        &self.test
    }
}

/// Compile script, run from the working directory.
pub fn compile_script(files: &[String]) -> String {
    let mut script = format!(
        "onerror {{exit -code 1}}\nalib work {}\nset worklib work\n",
        library_subdir(KIND.name())
    );
    for file in files {
        script.push_str(&format!("acom -2008 -dbg {file}\n"));
    }
    script
}

pub fn test_script(test: &str) -> String {
    format!(
        "onerror {{exit -code 1}}\nset worklib work\nasim {test}\nrun -all\nendsim\nexit -code 0\n"
    )
}

/// `vsimsa` arguments running a script from the library directory.
pub fn script_args(script: &str) -> Vec<String> {
    vec![
        "-do".to_string(),
        format!("{}/{script}", library_subdir(KIND.name())),
    ]
}

#[async_trait]
impl Simulator for ActiveHdlSimulator {
    fn kind(&self) -> SimulatorKind {
        KIND
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting ActiveHDL compile...");
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = ensure_library_dir(options, KIND).await?;
        sink.write_verbose(&format!("  Library Directory: {}", lib_dir.display()));

        let script = lib_dir.join("compile.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, compile_script(&options.config.files)).await?;

        let application = sim_path.join(SIM_APP);
        let args = script_args("compile.do");
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
        sink.write_verbose(&format!("Starting ActiveHDL test {test}..."));
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = options.library_dir(KIND.name());
        let script = lib_dir.join("test.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, test_script(test)).await?;

        let application = sim_path.join(SIM_APP);
        let args = script_args("test.do");
        describe_run(sink, &application, &options.working_dir, &args);
        let results = self
            .test
            .execute_with_timeout(&application, Some(&options.working_dir), &args, options.timeout)
            .await?;
        Ok(TestResult::new(test, test, results))
    }
}
