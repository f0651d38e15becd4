//! Configuration documents and resolved run options.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vhdltest_core::{Result, VhdlTestError};

/// Contents of a VHDLTest YAML configuration file.
///
/// ```yaml
/// files:
///   - half_adder.vhd
///   - half_adder_pass_tb.vhd
/// tests:
///   - half_adder_pass_tb
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConfigDocument {
    /// VHDL sources in compile order, relative to the configuration file.
    pub files: Vec<String>,

    /// Testbench names in execution order.
    pub tests: Vec<String>,
}

impl ConfigDocument {
    /// Parse a document. An empty document is rejected.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(VhdlTestError::Config(
                "Configuration document is empty".to_string(),
            ));
        }
        let doc: Option<ConfigDocument> =
            serde_yaml::from_str(content).map_err(|e| VhdlTestError::Yaml(e.to_string()))?;
        doc.ok_or_else(|| VhdlTestError::Config("Configuration document is empty".to_string()))
    }

    pub fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VhdlTestError::Config(format!(
                "Unable to read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&content).map_err(|e| match e {
            VhdlTestError::Config(_) => VhdlTestError::Config(format!(
                "Configuration document {} invalid",
                path.display()
            )),
            other => other,
        })
    }
}

/// Everything a simulator needs to build and run tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Absolute directory holding the configuration file.
    pub working_dir: PathBuf,

    pub config: ConfigDocument,

    /// Tests given on the command line; these replace the configured tests.
    pub custom_tests: Option<Vec<String>>,

    pub verbose: bool,

    /// Per-invocation limit for simulator processes.
    pub timeout: Option<Duration>,
}

impl Options {
    pub fn new(working_dir: impl Into<PathBuf>, config: ConfigDocument) -> Self {
        Self {
            working_dir: working_dir.into(),
            config,
            custom_tests: None,
            verbose: false,
            timeout: None,
        }
    }

    /// Load a configuration file; its directory becomes the working directory.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = ConfigDocument::read_file(path)?;
        let absolute = dunce::canonicalize(path)?;
        let working_dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                VhdlTestError::Config(format!("Invalid configuration file {}", absolute.display()))
            })?;
        Ok(Self::new(working_dir, config))
    }

    pub fn with_custom_tests(mut self, tests: Option<Vec<String>>) -> Self {
        self.custom_tests = tests;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Tests to run: the custom list when given, else the configured list.
    pub fn tests(&self) -> &[String] {
        self.custom_tests
            .as_deref()
            .unwrap_or(self.config.tests.as_slice())
    }

    /// Per-simulator scratch directory, `VHDLTest.out/<name>`.
    pub fn library_dir(&self, simulator: &str) -> PathBuf {
        self.working_dir.join(library_subdir(simulator))
    }
}

/// Library directory relative to the working directory.
pub fn library_subdir(simulator: &str) -> String {
    format!("VHDLTest.out/{simulator}")
}
