//! Local path helpers
//!
//! Paths in the configuration file are relative to the directory holding it
//! and may start with `~`.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the home directory (test isolation).
pub const MUPSHIP_TEST_HOME_VAR: &str = "MUPSHIP_TEST_HOME";

/// Home directory used for `~` expansion.
///
/// `MUPSHIP_TEST_HOME` wins over `dirs::home_dir()` so tests can run in
/// isolation on every platform.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var(MUPSHIP_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Expand a leading `~` to the home directory.
///
/// Returns the path unchanged when it has no tilde or the home directory
/// cannot be determined.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s != "~" && !s.starts_with("~/") {
        return path.to_path_buf();
    }
    match home_dir() {
        Some(home) if s == "~" => home,
        Some(home) => home.join(&s[2..]),
        None => path.to_path_buf(),
    }
}

/// Resolve `path` against `base`, expanding `~` first.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// `path` made absolute against the working directory.
///
/// Relative paths would make build locations depend on where the command
/// was started from. Falls back to `path` if the working directory is gone.
pub fn absolutize(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    std::path::absolute(&path).unwrap_or(path)
}

/// Quote a string for a POSIX shell command line
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
