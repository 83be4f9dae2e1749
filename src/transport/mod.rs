//! Transport to an instance under test
//!
//! A transport performs exactly one invocation per call. It never retries
//! and never interprets output beyond separating "printed something" from
//! "printed nothing"; parsing and retry policy belong to the register client.

mod command;
mod process;

pub use command::{ChannelCommand, ControlAction};
pub use process::ProcessTransport;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Failure of a single invocation
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to launch '{target}': {reason}")]
    Launch { target: String, reason: String },

    #[error("command exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("command produced no output")]
    NoOutput,
}

/// Text captured from a query command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput(String);

impl RawOutput {
    /// Wrap captured text; `None` when it is blank
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Output with surrounding whitespace removed
    pub fn text(&self) -> &str {
        self.0.trim()
    }
}

/// Capability to run protocol commands against an instance executable
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a command judged only by its exit status
    async fn execute_action(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<(), TransportError>;

    /// Run a command whose standard output carries a value
    async fn execute_query(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<RawOutput, TransportError>;
}
