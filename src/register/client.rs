//! Typed register access to one instance
//!
//! Every call is a fresh round trip through the transport; nothing is cached.
//! Reads return `None` when the value is unknown (transport failure or
//! unparseable output) and writes return whether the invocation succeeded.

use std::time::Duration;

use super::csr::CSR_ADDRESS;
use super::RetryPolicy;
use crate::common::parse_int_literal;
use crate::instance::Instance;
use crate::transport::{ChannelCommand, ControlAction, Transport};

/// Settle time after a control action
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

/// Register client bound to one instance
pub struct RegisterClient<'a> {
    transport: &'a dyn Transport,
    instance: &'a Instance,
    settle: Duration,
}

impl<'a> RegisterClient<'a> {
    pub fn new(transport: &'a dyn Transport, instance: &'a Instance) -> Self {
        Self {
            transport,
            instance,
            settle: DEFAULT_SETTLE,
        }
    }

    /// Override the delay that follows reset/enable/disable
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn instance(&self) -> &Instance {
        self.instance
    }

    /// Read a register once
    pub async fn read_register(&self, address: u32) -> Option<u32> {
        self.query(ChannelCommand::ReadConfig { address }).await
    }

    /// Write a register once; `true` if the instance accepted the command.
    /// The write is not verified.
    pub async fn write_register(&self, address: u32, value: u32) -> bool {
        let command = ChannelCommand::WriteConfig {
            address,
            data: value,
        };
        match self
            .transport
            .execute_action(self.instance.target(), &command)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(instance = self.instance.name(), %command, error = %e, "register write failed");
                false
            }
        }
    }

    /// Read the CSR, retrying failed reads per `policy`.
    ///
    /// Returns the first successful read; makes at most `policy.attempts()` reads.
    pub async fn read_csr(&self, policy: RetryPolicy) -> Option<u32> {
        let attempts = policy.attempts();
        for attempt in 1..=attempts {
            if let Some(value) = self.read_register(CSR_ADDRESS).await {
                return Some(value);
            }
            if attempt < attempts {
                tracing::debug!(
                    instance = self.instance.name(),
                    attempt,
                    "CSR read failed, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
            }
        }
        None
    }

    pub async fn write_csr(&self, value: u32) -> bool {
        self.write_register(CSR_ADDRESS, value).await
    }

    /// Push one sample through the datapath and return the instance's response
    pub async fn drive_signal(&self, sample: u32) -> Option<u32> {
        self.query(ChannelCommand::Signal { data: sample }).await
    }

    pub async fn reset(&self) {
        self.control(ControlAction::Reset).await;
    }

    pub async fn enable(&self) {
        self.control(ControlAction::Enable).await;
    }

    pub async fn disable(&self) {
        self.control(ControlAction::Disable).await;
    }

    /// Issue a control action and wait for the instance to settle.
    ///
    /// The settle delay applies even when the action fails.
    pub async fn control(&self, action: ControlAction) -> bool {
        let command = ChannelCommand::Control(action);
        let ok = match self
            .transport
            .execute_action(self.instance.target(), &command)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(instance = self.instance.name(), %action, error = %e, "control action failed");
                false
            }
        };
        self.settle().await;
        ok
    }

    /// Wait out the instance's settle time
    pub async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }

    async fn query(&self, command: ChannelCommand) -> Option<u32> {
        let output = match self
            .transport
            .execute_query(self.instance.target(), &command)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(instance = self.instance.name(), %command, error = %e, "query failed");
                return None;
            }
        };

        let value = parse_int_literal(output.text());
        if value.is_none() {
            tracing::warn!(
                instance = self.instance.name(),
                %command,
                output = output.text(),
                "unparseable response"
            );
        }
        value
    }
}
