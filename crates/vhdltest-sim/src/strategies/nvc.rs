//! NVC backend.

use crate::config::{library_subdir, Options};
use crate::locate::find_simulator;
use crate::simulator::{describe_run, ensure_library_dir, require_path, Simulator, SimulatorKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

/// NVC reports compile and run diagnostics in the same format.
const RULES: &[(Severity, &str)] = &[
    (Severity::Info, ".* Note:"),
    (Severity::Warning, ".* Warning:"),
    (Severity::Error, ".* Error:"),
    (Severity::Error, ".* Failure:"),
    (Severity::Error, ".* Fatal:"),
];

const KIND: SimulatorKind = SimulatorKind::Nvc;

#[derive(Debug, Clone)]
pub struct NvcSimulator {
    path: Option<PathBuf>,
    compile: RunProcessor,
    test: RunProcessor,
}

impl NvcSimulator {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            path,
            compile: RunProcessor::from_patterns(RULES)?,
            test: RunProcessor::from_patterns(RULES)?,
        })
    }

    /// Locate `nvc` via `VHDLTEST_NVC_PATH` or `PATH`.
    pub fn discover() -> Result<Self> {
        Self::new(find_simulator("VHDLTEST_NVC_PATH", "nvc"))
    }

    pub fn compile_processor(&self) -> &RunProcessor {
        &self.compile
    }

    pub fn test_processor(&self) -> &RunProcessor {
        &self.test
    }
}

pub fn compile_script(files: &[String]) -> String {
    files.iter().map(|file| format!("{file}\n")).collect()
}

fn work_arg() -> String {
    format!("--work=work:{}/lib", library_subdir(KIND.name()))
}

pub fn compile_args() -> Vec<String> {
    vec![
        "--std=08".to_string(),
        work_arg(),
        "-a".to_string(),
        format!("@{}/compile.rsp", library_subdir(KIND.name())),
    ]
}

/// Elaborate and run in one invocation.
pub fn test_args(test: &str) -> Vec<String> {
    vec![
        "--std=2008".to_string(),
        work_arg(),
        "-e".to_string(),
        test.to_string(),
        "-r".to_string(),
        test.to_string(),
    ]
}

#[async_trait]
impl Simulator for NvcSimulator {
    fn kind(&self) -> SimulatorKind {
        KIND
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting NVC compile...");
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = ensure_library_dir(options, KIND).await?;
        sink.write_verbose(&format!("  Library Directory: {}", lib_dir.display()));

        let script = lib_dir.join("compile.rsp");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, compile_script(&options.config.files)).await?;

        let application = sim_path.join("nvc");
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
        sink.write_verbose(&format!("Starting NVC test {test}..."));
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let application = sim_path.join("nvc");
        let args = test_args(test);
        describe_run(sink, &application, &options.working_dir, &args);
        let results = self
            .test
            .execute_with_timeout(&application, Some(&options.working_dir), &args, options.timeout)
            .await?;
        Ok(TestResult::new(test, test, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        assert_eq!(
            compile_args(),
            vec![
                "--std=08",
                "--work=work:VHDLTest.out/NVC/lib",
                "-a",
                "@VHDLTest.out/NVC/compile.rsp"
            ]
        );
        assert_eq!(
            test_args("half_adder_pass_tb"),
            vec![
                "--std=2008",
                "--work=work:VHDLTest.out/NVC/lib",
                "-e",
                "half_adder_pass_tb",
                "-r",
                "half_adder_pass_tb"
            ]
        );
    }

    #[test]
    fn test_classification() {
        let sim = NvcSimulator::new(None).expect("rule tables compile");
        let test = sim.test_processor();
        assert_eq!(test.classify("** Note: 0ms+0: starting"), Severity::Info);
        assert_eq!(test.classify("** Warning: 5ns+0: slow"), Severity::Warning);
        assert_eq!(test.classify("** Error: 5ns+0: sum wrong"), Severity::Error);
        assert_eq!(test.classify("** Failure: 5ns+0: stop"), Severity::Error);
        assert_eq!(test.classify("** Fatal: bad design"), Severity::Error);
        assert_eq!(test.classify("Note: no leading space"), Severity::Text);
        assert_eq!(
            sim.compile_processor().classify("** Error: unknown unit"),
            Severity::Error
        );
    }

    #[test]
    fn test_compile_script() {
        let files = vec!["a.vhd".to_string(), "b.vhd".to_string()];
        assert_eq!(compile_script(&files), "a.vhd\nb.vhd\n");
    }
}
