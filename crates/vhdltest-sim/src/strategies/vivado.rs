//! Xilinx Vivado simulator backend.

use crate::config::Options;
use crate::locate::find_simulator;
use crate::simulator::{describe_run, ensure_library_dir, require_path, Simulator, SimulatorKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunProcessor, RunResults, Severity, TestResult};

const COMPILE_RULES: &[(Severity, &str)] = &[(Severity::Error, "Error: ")];

const TEST_RULES: &[(Severity, &str)] = &[
    (Severity::Info, "Note: "),
    (Severity::Warning, "Warning: "),
    (Severity::Error, "Error: "),
    (Severity::Error, "Failure: "),
];

const KIND: SimulatorKind = SimulatorKind::Vivado;

/// Vivado, driven through `xvhdl` (analysis) and `xelab` (elaborate and run).
#[derive(Debug, Clone)]
pub struct VivadoSimulator {
    path: Option<PathBuf>,
    compile: RunProcessor,
    test: RunProcessor,
}

impl VivadoSimulator {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            path,
            compile: RunProcessor::from_patterns(COMPILE_RULES)?,
            test: RunProcessor::from_patterns(TEST_RULES)?,
        })
    }

    /// Locate `vivado` via `VHDLTEST_VIVADO_PATH` or `PATH`.
    pub fn discover() -> Result<Self> {
        Self::new(find_simulator("VHDLTEST_VIVADO_PATH", "vivado"))
    }

    pub fn compile_processor(&self) -> &RunProcessor {
        &self.compile
    }

    pub fn test_processor(&self) -> &RunProcessor {
        &self.test
    }
}

/// `xvhdl` option file.
pub fn compile_script(files: &[String]) -> String {
    let mut script = String::from("-2008\n-nolog\n-work work\n");
    for file in files {
        script.push_str(&format!("../../{file}\n"));
    }
    script
}

/// `xelab` option file.
pub fn test_script(test: &str) -> String {
    format!("-nolog\n-standalone\n-runall\n{test}\n")
}

/// Program and arguments launching a Vivado tool with an option file.
///
/// The Windows tools are batch wrappers and must go through `cmd /c`.
pub fn tool_command(sim_path: &Path, tool: &str, script: &str, windows: bool) -> (PathBuf, Vec<String>) {
    let tool_path = sim_path.join(tool);
    if windows {
        (
            PathBuf::from("cmd"),
            vec![
                "/c".to_string(),
                tool_path.display().to_string(),
                "-file".to_string(),
                script.to_string(),
            ],
        )
    } else {
        (tool_path, vec!["-file".to_string(), script.to_string()])
    }
}

#[async_trait]
impl Simulator for VivadoSimulator {
    fn kind(&self) -> SimulatorKind {
        KIND
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults> {
        sink.write_verbose("Starting Vivado compile...");
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = ensure_library_dir(options, KIND).await?;
        sink.write_verbose(&format!("  Library Directory: {}", lib_dir.display()));

        let script = lib_dir.join("compile.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, compile_script(&options.config.files)).await?;

        let (application, args) = tool_command(sim_path, "xvhdl", "compile.do", cfg!(windows));
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
        sink.write_verbose(&format!("Starting Vivado test {test}..."));
        let sim_path = require_path(KIND, self.path())?;
        sink.write_verbose(&format!("  Simulator Path: {}", sim_path.display()));

        let lib_dir = options.library_dir(KIND.name());
        let script = lib_dir.join("test.do");
        sink.write_verbose(&format!("  Script File: {}", script.display()));
        tokio::fs::write(&script, test_script(test)).await?;

        let (application, args) = tool_command(sim_path, "xelab", "test.do", cfg!(windows));
        describe_run(sink, &application, &lib_dir, &args);
        let results = self
            .test
            .execute_with_timeout(&application, Some(&lib_dir), &args, options.timeout)
            .await?;
        Ok(TestResult::new(test, test, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts() {
        let files = vec!["full_adder.vhd".to_string()];
        assert_eq!(
            compile_script(&files),
            "-2008\n-nolog\n-work work\n../../full_adder.vhd\n"
        );
        assert_eq!(
            test_script("full_adder_pass_tb"),
            "-nolog\n-standalone\n-runall\nfull_adder_pass_tb\n"
        );
    }

    #[test]
    fn test_tool_command_unix() {
        let (program, args) = tool_command(Path::new("/opt/Xilinx/bin"), "xvhdl", "compile.do", false);
        assert_eq!(program, PathBuf::from("/opt/Xilinx/bin/xvhdl"));
        assert_eq!(args, vec!["-file", "compile.do"]);
    }

    #[test]
    fn test_tool_command_windows() {
        let (program, args) = tool_command(Path::new("bin"), "xelab", "test.do", true);
        assert_eq!(program, PathBuf::from("cmd"));
        assert_eq!(args[0], "/c");
        assert!(args[1].ends_with("xelab"));
        assert_eq!(&args[2..], ["-file", "test.do"]);
    }

    #[test]
    fn test_classification() {
        let sim = VivadoSimulator::new(None).expect("rule tables compile");
        assert_eq!(
            sim.compile_processor().classify("ERROR: [VRFC 10-91] x is not declared"),
            Severity::Text
        );
        assert_eq!(
            sim.compile_processor().classify("Error: x is not declared"),
            Severity::Error
        );
        let test = sim.test_processor();
        assert_eq!(test.classify("Note: starting"), Severity::Info);
        assert_eq!(test.classify("Warning: slow"), Severity::Warning);
        assert_eq!(test.classify("Failure: stop"), Severity::Error);
    }
}
