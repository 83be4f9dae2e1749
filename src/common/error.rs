//! Error types for the harness CLI
//!
//! Register-level failures never surface here: reads degrade to `None` and
//! writes to `false`. These errors cover what can go wrong around a run
//! (configuration, command-line input, output).

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Input Errors ===
    #[error("Invalid numeric literal '{0}'. Use decimal (42) or hexadecimal (0x2a)")]
    InvalidLiteral(String),

    // === Instance Errors ===
    #[error("Instance '{name}' is unreachable at {target}. Check that the executable exists")]
    Unreachable { name: String, target: String },

    #[error("{action} failed on instance '{name}'")]
    OperationFailed { action: String, name: String },

    #[error("{0} instance(s) failed or were skipped")]
    RunFailed(usize),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unreachable-instance error
    pub fn unreachable(name: &str, target: &std::path::Path) -> Self {
        Self::Unreachable {
            name: name.to_string(),
            target: target.display().to_string(),
        }
    }

    /// Create an operation failed error
    pub fn operation_failed(action: &str, name: &str) -> Self {
        Self::OperationFailed {
            action: action.to_string(),
            name: name.to_string(),
        }
    }
}
