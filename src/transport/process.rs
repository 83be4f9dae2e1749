//! Child-process transport
//!
//! Spawns the instance executable once per command and waits for it to exit.
//! There is no timeout: a hung instance blocks the run.

use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

use super::{ChannelCommand, RawOutput, Transport, TransportError};

/// Transport that launches the instance executable as a child process
#[derive(Debug, Default, Clone)]
pub struct ProcessTransport;

impl ProcessTransport {
    pub fn new() -> Self {
        Self
    }

    async fn invoke(&self, target: &Path, command: &ChannelCommand) -> Result<Output, TransportError> {
        tracing::debug!(path = %target.display(), %command, "invoking instance");

        let output = Command::new(target)
            .args(command.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TransportError::Launch {
                target: target.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(code = ?output.status.code(), %stderr, "instance reported failure");
            return Err(TransportError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn execute_action(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<(), TransportError> {
        self.invoke(target, command).await.map(|_| ())
    }

    async fn execute_query(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<RawOutput, TransportError> {
        let output = self.invoke(target, command).await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::trace!(%stdout, "instance output");
        RawOutput::new(stdout).ok_or(TransportError::NoOutput)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::transport::ControlAction;

    #[tokio::test]
    async fn test_missing_executable_is_launch_error() {
        let transport = ProcessTransport::new();
        let err = transport
            .execute_action(
                Path::new("/nonexistent/uad-impl"),
                &ChannelCommand::Control(ControlAction::Reset),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let transport = ProcessTransport::new();
        let err = transport
            .execute_action(
                Path::new("false"),
                &ChannelCommand::Control(ControlAction::Reset),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::NonZeroExit { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_query_without_output() {
        let transport = ProcessTransport::new();
        let err = transport
            .execute_query(Path::new("true"), &ChannelCommand::ReadConfig { address: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::NoOutput));
    }

    #[tokio::test]
    async fn test_query_captures_stdout() {
        // echo prints its arguments: "cfg --address 0x0"
        let transport = ProcessTransport::new();
        let out = transport
            .execute_query(Path::new("echo"), &ChannelCommand::ReadConfig { address: 0 })
            .await
            .unwrap();
        assert_eq!(out.text(), "cfg --address 0x0");
    }
}
