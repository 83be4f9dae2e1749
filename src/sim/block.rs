//! Behavioural model of one IP block
//!
//! Control bits live in the CSR; BUFFER_COUNT and OVERFLOW are derived from
//! the sample buffer on every read. Writing CLEAR_BUFFER empties the buffer
//! and drops OVERFLOW in the same write; the strobe never reads back as set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::register::csr::{is_set, set_field, CsrField, CSR_ADDRESS};
use crate::transport::{ChannelCommand, ControlAction};

/// Samples the buffer holds before OVERFLOW latches
pub const BUFFER_DEPTH: usize = 255;

/// Address of the datapath gain coefficient
pub const COEFFICIENT_ADDRESS: u32 = 0x4;

/// CSR bits that software can write and read back
const CONTROL_MASK: u32 =
    CsrField::Enable.mask() | CsrField::Bypass.mask() | CsrField::Halt.mask();

/// Misbehaviour to inject into a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faults {
    /// Enable requests are acknowledged but have no effect
    #[serde(default)]
    pub ignore_enable: bool,

    /// Number of upcoming CSR reads that fail
    #[serde(default)]
    pub failing_reads: u32,

    /// Every command fails
    #[serde(default)]
    pub offline: bool,
}

/// Reasons a command is rejected by the model
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimError {
    #[error("instance offline")]
    Offline,

    #[error("CSR read failed (injected)")]
    InjectedReadFailure,

    #[error("datapath disabled")]
    Disabled,
}

/// State of one simulated IP block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpBlock {
    #[serde(default)]
    control: u32,
    #[serde(default)]
    registers: BTreeMap<u32, u32>,
    #[serde(default)]
    buffer: Vec<u32>,
    #[serde(default)]
    overflow: bool,
    #[serde(default)]
    pub faults: Faults,
}

impl IpBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Apply one protocol command; queries yield `Some(value)`, actions `None`
    pub fn handle(&mut self, command: &ChannelCommand) -> Result<Option<u32>, SimError> {
        if self.faults.offline {
            return Err(SimError::Offline);
        }

        match *command {
            ChannelCommand::Control(action) => {
                self.control_action(action);
                Ok(None)
            }
            ChannelCommand::ReadConfig { address } => self.read(address).map(Some),
            ChannelCommand::WriteConfig { address, data } => {
                self.write(address, data);
                Ok(None)
            }
            ChannelCommand::Signal { data } => self.signal(data).map(Some),
        }
    }

    /// Current CSR value as software sees it
    pub fn csr(&self) -> u32 {
        let count = self.buffer.len().min(0xff) as u32;
        let csr = set_field(self.control, CsrField::BufferCount, count);
        set_field(csr, CsrField::Overflow, u32::from(self.overflow))
    }

    fn control_action(&mut self, action: ControlAction) {
        match action {
            ControlAction::Reset => {
                let faults = std::mem::take(&mut self.faults);
                *self = Self::with_faults(faults);
            }
            ControlAction::Enable => {
                if !self.faults.ignore_enable {
                    self.control = set_field(self.control, CsrField::Enable, 1);
                }
            }
            ControlAction::Disable => {
                self.control = set_field(self.control, CsrField::Enable, 0);
            }
        }
    }

    fn read(&mut self, address: u32) -> Result<u32, SimError> {
        if address != CSR_ADDRESS {
            return Ok(self.registers.get(&address).copied().unwrap_or(0));
        }
        if self.faults.failing_reads > 0 {
            self.faults.failing_reads -= 1;
            return Err(SimError::InjectedReadFailure);
        }
        Ok(self.csr())
    }

    fn write(&mut self, address: u32, data: u32) {
        if address != CSR_ADDRESS {
            self.registers.insert(address, data);
            return;
        }

        let mut control = data & CONTROL_MASK;
        if self.faults.ignore_enable && !is_set(self.control, CsrField::Enable) {
            control = set_field(control, CsrField::Enable, 0);
        }
        self.control = control;

        if is_set(data, CsrField::ClearBuffer) {
            self.buffer.clear();
            self.overflow = false;
        }
    }

    fn signal(&mut self, sample: u32) -> Result<u32, SimError> {
        if !is_set(self.control, CsrField::Enable) {
            return Err(SimError::Disabled);
        }

        if is_set(self.control, CsrField::Halt) {
            if self.buffer.len() < BUFFER_DEPTH {
                self.buffer.push(sample);
            } else {
                self.overflow = true;
            }
            return Ok(0);
        }

        if is_set(self.control, CsrField::Bypass) {
            return Ok(sample);
        }

        let gain = self
            .registers
            .get(&COEFFICIENT_ADDRESS)
            .copied()
            .unwrap_or(1);
        Ok(sample.wrapping_mul(gain))
    }
}
