//! The simulator strategy interface.

use crate::config::Options;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use vhdltest_core::{OutputSink, Result, RunResults, TestResult, VhdlTestError};

/// Supported simulator backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulatorKind {
    Ghdl,
    ModelSim,
    Vivado,
    ActiveHdl,
    Nvc,
    Mock,
}

impl SimulatorKind {
    /// Backends probed, in order, when no simulator is named.
    pub const DISCOVERY_ORDER: [SimulatorKind; 5] = [
        SimulatorKind::Ghdl,
        SimulatorKind::ModelSim,
        SimulatorKind::Vivado,
        SimulatorKind::ActiveHdl,
        SimulatorKind::Nvc,
    ];

    pub const ALL: [SimulatorKind; 6] = [
        SimulatorKind::Ghdl,
        SimulatorKind::ModelSim,
        SimulatorKind::Vivado,
        SimulatorKind::ActiveHdl,
        SimulatorKind::Nvc,
        SimulatorKind::Mock,
    ];

    /// Display name, also used for the library directory.
    pub fn name(&self) -> &'static str {
        match self {
            SimulatorKind::Ghdl => "GHDL",
            SimulatorKind::ModelSim => "ModelSim",
            SimulatorKind::Vivado => "Vivado",
            SimulatorKind::ActiveHdl => "ActiveHDL",
            SimulatorKind::Nvc => "NVC",
            SimulatorKind::Mock => "Mock",
        }
    }

    /// Resolve a user-supplied name, ignoring case.
    ///
    /// `QuestaSim` selects the ModelSim backend.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("QuestaSim") {
            return Some(SimulatorKind::ModelSim);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A simulator backend.
///
/// Every backend owns a compile and a test rule table and knows how to build
/// its command lines. Calls are sequential; a backend's scratch files belong
/// to the single invocation in flight.
#[async_trait]
pub trait Simulator: Send + Sync {
    fn kind(&self) -> SimulatorKind;

    /// Installation directory, when located.
    fn path(&self) -> Option<&Path>;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn is_available(&self) -> bool {
        self.path().is_some()
    }

    /// Compile the configured sources.
    async fn compile(&self, options: &Options, sink: &mut dyn OutputSink) -> Result<RunResults>;

    /// Run one testbench.
    async fn test(
        &self,
        options: &Options,
        test: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<TestResult>;
}

/// The installation directory, or `SimulatorUnavailable`.
pub(crate) fn require_path<'a>(kind: SimulatorKind, path: Option<&'a Path>) -> Result<&'a Path> {
    path.ok_or_else(|| VhdlTestError::SimulatorUnavailable(kind.name().to_string()))
}

/// Create the library directory if needed.
pub(crate) async fn ensure_library_dir(options: &Options, kind: SimulatorKind) -> Result<PathBuf> {
    let dir = options.library_dir(kind.name());
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Echo an invocation to the verbose stream.
pub(crate) fn describe_run(
    sink: &mut dyn OutputSink,
    application: &Path,
    run_dir: &Path,
    args: &[String],
) {
    sink.write_verbose(&format!("  Run Directory: {}", run_dir.display()));
    sink.write_verbose(&format!(
        "  Run Command: {} {}",
        application.display(),
        args.join(" ")
    ));
}

/// Convert a list of literal arguments.
pub(crate) fn arg_list<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(SimulatorKind::from_name("ghdl"), Some(SimulatorKind::Ghdl));
        assert_eq!(SimulatorKind::from_name("GHDL"), Some(SimulatorKind::Ghdl));
        assert_eq!(
            SimulatorKind::from_name("activehdl"),
            Some(SimulatorKind::ActiveHdl)
        );
        assert_eq!(SimulatorKind::from_name("mock"), Some(SimulatorKind::Mock));
        assert_eq!(SimulatorKind::from_name("xsim"), None);
    }

    #[test]
    fn test_questasim_alias() {
        assert_eq!(
            SimulatorKind::from_name("questasim"),
            Some(SimulatorKind::ModelSim)
        );
    }

    #[test]
    fn test_discovery_order_excludes_mock() {
        assert!(!SimulatorKind::DISCOVERY_ORDER.contains(&SimulatorKind::Mock));
        assert_eq!(SimulatorKind::DISCOVERY_ORDER[0], SimulatorKind::Ghdl);
    }

    #[test]
    fn test_require_path() {
        let err = require_path(SimulatorKind::Nvc, None).expect_err("no path");
        assert_eq!(err.to_string(), "NVC Simulator not available");
        assert!(require_path(SimulatorKind::Nvc, Some(Path::new("/opt/nvc"))).is_ok());
    }
}
