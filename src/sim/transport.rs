//! In-memory transport backed by [`IpBlock`] models
//!
//! Each registered target path owns one model. Unknown targets behave like a
//! missing executable, and rejected commands like a non-zero exit.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::block::{Faults, IpBlock};
use crate::register::CSR_ADDRESS;
use crate::transport::{ChannelCommand, RawOutput, Transport, TransportError};

#[derive(Debug, Default)]
struct Slot {
    block: IpBlock,
    commands: Vec<ChannelCommand>,
}

/// Transport that answers from simulated blocks instead of child processes
#[derive(Debug, Default)]
pub struct ModelTransport {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl ModelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a healthy model at `target`
    pub fn add(&self, target: impl Into<PathBuf>) {
        self.add_with_faults(target, Faults::default());
    }

    /// Register a model with injected faults at `target`
    pub fn add_with_faults(&self, target: impl Into<PathBuf>, faults: Faults) {
        let slot = Slot {
            block: IpBlock::with_faults(faults),
            commands: Vec::new(),
        };
        self.lock().insert(target.into(), slot);
    }

    /// Commands received by `target`, in order
    pub fn commands(&self, target: &Path) -> Vec<ChannelCommand> {
        self.lock()
            .get(target)
            .map(|slot| slot.commands.clone())
            .unwrap_or_default()
    }

    /// Number of CSR reads attempted against `target`, failed ones included
    pub fn csr_reads(&self, target: &Path) -> usize {
        self.commands(target)
            .iter()
            .filter(|c| matches!(c, ChannelCommand::ReadConfig { address } if *address == CSR_ADDRESS))
            .count()
    }

    /// Snapshot of the model at `target`
    pub fn block(&self, target: &Path) -> Option<IpBlock> {
        self.lock().get(target).map(|slot| slot.block.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dispatch(&self, target: &Path, command: &ChannelCommand) -> Result<Option<u32>, TransportError> {
        let mut slots = self.lock();
        let slot = slots.get_mut(target).ok_or_else(|| TransportError::Launch {
            target: target.display().to_string(),
            reason: "no such simulated instance".to_string(),
        })?;

        slot.commands.push(*command);
        slot.block
            .handle(command)
            .map_err(|e| TransportError::NonZeroExit {
                code: Some(1),
                stderr: e.to_string(),
            })
    }
}

#[async_trait]
impl Transport for ModelTransport {
    async fn execute_action(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<(), TransportError> {
        self.dispatch(target, command).map(|_| ())
    }

    async fn execute_query(
        &self,
        target: &Path,
        command: &ChannelCommand,
    ) -> Result<RawOutput, TransportError> {
        self.dispatch(target, command)?
            .and_then(|value| RawOutput::new(format!("{:#x}\n", value)))
            .ok_or(TransportError::NoOutput)
    }
}
