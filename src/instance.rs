//! Instances under test and how their names map to executables

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::common::paths;

/// One simulated IP block, addressed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    name: String,
    target: PathBuf,
}

impl Instance {
    /// Create an instance with an explicit executable
    pub fn new(name: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }

    /// Resolve an instance name to its executable.
    ///
    /// Order: explicit `[targets]` entry, `instance_dir/<name><EXE_SUFFIX>`,
    /// then a PATH lookup when `search_path` is enabled. An unresolvable
    /// name keeps the local candidate and fails its liveness probe later.
    pub fn resolve(name: &str, config: &Config) -> Self {
        Self::resolve_with_path(name, config, std::env::var_os("PATH").as_deref())
    }

    fn resolve_with_path(name: &str, config: &Config, path_var: Option<&OsStr>) -> Self {
        if let Some(target) = config.targets.get(name) {
            return Self::new(name, target.clone());
        }

        let local = paths::local_executable(&config.instance_dir, name);
        if !local.exists() && config.search_path {
            if let Some(found) = paths::search_path(name, path_var) {
                tracing::debug!(instance = name, path = %found.display(), "resolved via PATH");
                return Self::new(name, found);
            }
        }

        Self::new(name, local)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}
