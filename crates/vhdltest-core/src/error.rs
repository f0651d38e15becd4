//! Error taxonomy for VHDLTest.
//!
//! Test failures are not errors: a failing testbench is recorded as a
//! [`TestResult`](crate::TestResult) and the run continues. Everything here is
//! fatal to the operation that produced it.

use std::path::PathBuf;

/// VHDLTest errors.
#[derive(Debug, thiserror::Error)]
pub enum VhdlTestError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Simulator {0} not found")]
    UnknownSimulator(String),

    #[error("Simulator not found")]
    NoSimulator,

    #[error("{0} Simulator not available")]
    SimulatorUnavailable(String),

    #[error("Build Failed")]
    BuildFailed,

    #[error("failed to start {}: {source}", application.display())]
    ProcessStart {
        application: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} timed out after {seconds} seconds", application.display())]
    ProcessTimeout { application: PathBuf, seconds: u64 },

    #[error("invalid classification pattern {pattern:?}: {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("report error: {0}")]
    Report(String),

    #[error("invalid configuration document: {0}")]
    Yaml(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for VHDLTest operations.
pub type Result<T> = std::result::Result<T, VhdlTestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_errors_name_the_simulator() {
        let err = VhdlTestError::SimulatorUnavailable("GHDL".to_string());
        assert_eq!(err.to_string(), "GHDL Simulator not available");

        let err = VhdlTestError::UnknownSimulator("foo".to_string());
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_build_failed_display() {
        assert_eq!(VhdlTestError::BuildFailed.to_string(), "Build Failed");
    }

    #[test]
    fn test_process_start_includes_application() {
        let err = VhdlTestError::ProcessStart {
            application: PathBuf::from("/opt/ghdl/bin/ghdl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/ghdl/bin/ghdl"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_process_timeout_display() {
        let err = VhdlTestError::ProcessTimeout {
            application: PathBuf::from("vsim"),
            seconds: 30,
        };
        assert_eq!(err.to_string(), "vsim timed out after 30 seconds");
    }
}
