//! Configuration paths and executable resolution
//!
//! Instance executables follow the host convention: `impl0.exe` on Windows,
//! `./impl0` elsewhere, both relative to the configured instance directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "uad-harness";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/uad-harness/`
/// - macOS: `~/Library/Application Support/uad-harness/`
/// - Windows: `%APPDATA%\uad-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Local executable path for an instance name under `dir`
pub fn local_executable(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

/// Search a `PATH`-style directory list for an instance executable
pub fn search_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    which::which_in(name, path_var, cwd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        }
    }

    #[test]
    fn test_local_executable_uses_platform_suffix() {
        let path = local_executable(Path::new("."), "impl0");
        let file = path.file_name().unwrap().to_string_lossy().into_owned();
        if cfg!(windows) {
            assert_eq!(file, "impl0.exe");
        } else {
            assert_eq!(file, "impl0");
            assert_eq!(path, Path::new("./impl0"));
        }
    }
}
