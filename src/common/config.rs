//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::Result;
use crate::register::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Instances exercised by `run`, in order
    #[serde(default = "default_instances")]
    pub instances: Vec<String>,

    /// Directory holding the instance executables
    #[serde(default = "default_instance_dir")]
    pub instance_dir: PathBuf,

    /// Fall back to a PATH lookup when the local executable is missing
    #[serde(default)]
    pub search_path: bool,

    /// Explicit executable paths by instance name
    #[serde(default)]
    pub targets: HashMap<String, PathBuf>,

    /// Settle and pacing delays
    #[serde(default)]
    pub timing: Timing,

    /// CSR read retry settings
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instances: default_instances(),
            instance_dir: default_instance_dir(),
            search_path: false,
            targets: HashMap::new(),
            timing: Timing::default(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_instances() -> Vec<String> {
    (0..6).map(|i| format!("impl{}", i)).collect()
}

fn default_instance_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Delay settings in milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timing {
    /// Wait after each reset/enable/disable before touching registers
    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    /// Pause between consecutive instances
    #[serde(default = "default_inter_instance")]
    pub inter_instance_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_ms: default_settle(),
            inter_instance_ms: default_inter_instance(),
        }
    }
}

impl Timing {
    /// No delays at all; for in-memory models that settle instantly
    pub fn immediate() -> Self {
        Self {
            settle_ms: 0,
            inter_instance_ms: 0,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn inter_instance(&self) -> Duration {
        Duration::from_millis(self.inter_instance_ms)
    }
}

fn default_settle() -> u64 {
    50
}
fn default_inter_instance() -> u64 {
    50
}

/// CSR read retry settings
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Total read attempts (values below 1 are treated as 1)
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay between failed attempts
    #[serde(default = "default_retry_delay")]
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_retry_delay(),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        RetryPolicy::new(settings.attempts, Duration::from_millis(settings.delay_ms))
    }
}

fn default_attempts() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    20
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Retry policy for CSR reads
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }
}
