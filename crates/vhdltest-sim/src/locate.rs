//! Simulator discovery.
//!
//! A simulator is found through its `VHDLTEST_<NAME>_PATH` override first,
//! then by searching `PATH` for its main executable. The located path is the
//! directory containing the executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Locate a simulator installation directory.
pub fn find_simulator(env_var: &str, application: &str) -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(env_var) {
        tracing::debug!(env_var, path = ?path, "simulator path from environment");
        return Some(PathBuf::from(path));
    }

    let found = where_is(application, std::env::var_os("PATH"))?;
    found.parent().map(Path::to_path_buf)
}

/// Search a `PATH`-style list for `application`.
pub fn where_is(application: &str, search_path: Option<OsString>) -> Option<PathBuf> {
    let search_path = search_path?;

    let mut dirs: Vec<PathBuf> = Vec::new();
    if cfg!(windows) {
        if let Ok(current) = std::env::current_dir() {
            dirs.push(current);
        }
    }
    for dir in std::env::split_paths(&search_path) {
        if dir.as_os_str().to_string_lossy().trim().is_empty() || dirs.contains(&dir) {
            continue;
        }
        dirs.push(dir);
    }

    let candidates = candidate_names(application);
    dirs.iter()
        .flat_map(|dir| candidates.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// File names that satisfy a search for `application` on this platform.
fn candidate_names(application: &str) -> Vec<String> {
    if cfg!(windows) {
        let path_ext = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        path_ext
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!("{application}{ext}"))
            .collect()
    } else {
        vec![application.to_string()]
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_where_is_finds_executable() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        std::fs::write(second.path().join("ghdl"), "#!/bin/sh\n").expect("write fake ghdl");

        let search = std::env::join_paths([first.path(), second.path()]).expect("join paths");
        let found = where_is("ghdl", Some(search)).expect("ghdl found");
        assert_eq!(found, second.path().join("ghdl"));
    }

    #[test]
    fn test_where_is_first_directory_wins() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        std::fs::write(first.path().join("nvc"), "").expect("write");
        std::fs::write(second.path().join("nvc"), "").expect("write");

        let search = std::env::join_paths([first.path(), second.path()]).expect("join paths");
        assert_eq!(
            where_is("nvc", Some(search)),
            Some(first.path().join("nvc"))
        );
    }

    #[test]
    fn test_where_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let search = std::env::join_paths([dir.path()]).expect("join paths");
        assert_eq!(where_is("vsimsa", Some(search)), None);
        assert_eq!(where_is("vsimsa", None), None);
    }

    #[test]
    fn test_directories_are_not_matches() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("vsim")).expect("mkdir");
        let search = std::env::join_paths([dir.path()]).expect("join paths");
        assert_eq!(where_is("vsim", Some(search)), None);
    }
}
