//! External program invocation.
//!
//! Runs a simulator binary to completion and captures its output. Both pipes
//! are drained concurrently, so a program that fills one pipe cannot stall
//! waiting on the other.

use crate::error::{Result, VhdlTestError};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramOutput {
    /// Exit code, or `-1` if the process was terminated by a signal.
    pub exit_code: i32,

    /// Standard output followed by standard error.
    pub output: String,
}

/// Run `application` with `args`, optionally in `working_dir`.
///
/// When `timeout` is set and expires, the child is killed and
/// [`VhdlTestError::ProcessTimeout`] is returned.
pub async fn run_program(
    application: &Path,
    working_dir: Option<&Path>,
    args: &[String],
    timeout: Option<Duration>,
) -> Result<ProgramOutput> {
    let mut command = Command::new(application);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    tracing::debug!(application = %application.display(), ?args, "starting program");

    let child = command.spawn().map_err(|source| VhdlTestError::ProcessStart {
        application: application.to_path_buf(),
        source,
    })?;

    // Dropping the future on timeout drops the child, which kills it.
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| VhdlTestError::ProcessTimeout {
                application: application.to_path_buf(),
                seconds: limit.as_secs(),
            })??,
        None => child.wait_with_output().await?,
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    tracing::debug!(application = %application.display(), exit_code, "program finished");

    Ok(ProgramOutput {
        exit_code,
        output: text,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_stdout_precedes_stderr() {
        let out = run_program(
            Path::new("sh"),
            None,
            &sh("echo err 1>&2; echo out"),
            None,
        )
        .await
        .expect("sh runs");
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_exit_code_is_reported() {
        let out = run_program(Path::new("sh"), None, &sh("exit 3"), None)
            .await
            .expect("sh runs");
        assert_eq!(out.exit_code, 3);
    }

    #[tokio::test]
    async fn test_working_directory_is_applied() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "present").expect("write marker");
        let out = run_program(Path::new("sh"), Some(dir.path()), &sh("cat marker.txt"), None)
            .await
            .expect("sh runs");
        assert_eq!(out.output, "present");
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_start() {
        let err = run_program(Path::new("/nonexistent/vhdltest-sim"), None, &[], None)
            .await
            .expect_err("missing program");
        assert!(matches!(err, VhdlTestError::ProcessStart { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_program() {
        let err = run_program(
            Path::new("sh"),
            None,
            &sh("sleep 5"),
            Some(Duration::from_millis(100)),
        )
        .await
        .expect_err("times out");
        assert!(matches!(err, VhdlTestError::ProcessTimeout { .. }));
    }
}
