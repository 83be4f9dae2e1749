//! Functional scenario battery for one live instance
//!
//! Scenarios run in a fixed order. A failed precondition marks that
//! scenario skipped and the battery moves on; nothing here aborts early.

use crate::register::csr::{get_field, is_set, set_field, CsrField};
use crate::register::{RegisterClient, RetryPolicy};

use super::report::{Observation, Scenario, ScenarioResult, SkipReason};

/// Sample pushed through the datapath in bypass mode
pub const BYPASS_SAMPLE: u32 = 0x1234;

/// Samples driven while halted; one more than the 8-bit count can report
pub const BUFFER_SAMPLES: u32 = 256;

/// Data register used for the read-back check
pub const DATA_REGISTER: u32 = 0x4;

/// Pattern written to [`DATA_REGISTER`]
pub const DATA_PATTERN: u32 = 0x1234_5678;

/// Runs the scenario battery against one instance
pub struct TestOrchestrator<'a> {
    client: RegisterClient<'a>,
    policy: RetryPolicy,
}

impl<'a> TestOrchestrator<'a> {
    pub fn new(client: RegisterClient<'a>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Run every scenario in order
    pub async fn run(&self) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(Scenario::ALL.len());
        for scenario in Scenario::ALL {
            let result = self.run_scenario(scenario).await;
            match &result.observation {
                Observation::Skipped { reason } => tracing::warn!(
                    instance = self.client.instance().name(),
                    %scenario,
                    %reason,
                    "scenario skipped"
                ),
                _ => tracing::info!(
                    instance = self.client.instance().name(),
                    %scenario,
                    verdict = %result.verdict(),
                    "scenario finished"
                ),
            }
            results.push(result);
        }
        results
    }

    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioResult {
        match scenario {
            Scenario::EnableDisable => self.enable_disable().await,
            Scenario::Bypass => self.bypass().await,
            Scenario::Buffer => self.buffer().await,
            Scenario::RegisterReadWrite => self.register_read_write().await,
        }
    }

    /// reset → enable → check ENABLE, then disable → check it cleared
    pub async fn enable_disable(&self) -> ScenarioResult {
        self.client.reset().await;
        self.client.enable().await;

        let csr_after_enable = self.client.read_csr(self.policy).await;
        let enabled = csr_after_enable.map(|csr| is_set(csr, CsrField::Enable));

        let (csr_after_disable, disabled) = if enabled == Some(true) {
            self.client.disable().await;
            let csr = self.client.read_csr(self.policy).await;
            (csr, csr.map(|csr| !is_set(csr, CsrField::Enable)))
        } else {
            (None, None)
        };

        ScenarioResult::new(
            Scenario::EnableDisable,
            Observation::EnableDisable {
                csr_after_enable,
                enabled,
                csr_after_disable,
                disabled,
            },
        )
    }

    /// Pass one sample through with BYPASS set, then clear BYPASS
    pub async fn bypass(&self) -> ScenarioResult {
        let csr = match self.enabled_csr().await {
            Ok(csr) => csr,
            Err(reason) => return ScenarioResult::skipped(Scenario::Bypass, reason),
        };

        let with_bypass = set_field(csr, CsrField::Bypass, 1);
        self.client.write_csr(with_bypass).await;
        let csr_with_bypass = self.client.read_csr(self.policy).await;
        let response = self.client.drive_signal(BYPASS_SAMPLE).await;

        self.client
            .write_csr(set_field(with_bypass, CsrField::Bypass, 0))
            .await;
        let csr_after_clear = self.client.read_csr(self.policy).await;

        ScenarioResult::new(
            Scenario::Bypass,
            Observation::Bypass {
                sample: BYPASS_SAMPLE,
                csr_with_bypass,
                response,
                csr_after_clear,
            },
        )
    }

    /// Halt, fill the buffer past its depth, then strobe CLEAR_BUFFER
    pub async fn buffer(&self) -> ScenarioResult {
        let csr = match self.enabled_csr().await {
            Ok(csr) => csr,
            Err(reason) => return ScenarioResult::skipped(Scenario::Buffer, reason),
        };

        let halted = set_field(csr, CsrField::Halt, 1);
        self.client.write_csr(halted).await;
        let csr_halted = self.client.read_csr(self.policy).await;

        for sample in 0..BUFFER_SAMPLES {
            // responses are irrelevant while halted
            let _ = self.client.drive_signal(sample).await;
        }

        let full = self.client.read_csr(self.policy).await;

        self.client
            .write_csr(set_field(halted, CsrField::ClearBuffer, 1))
            .await;
        // CLEAR_BUFFER is assumed to self-clear within one settle period
        self.client.settle().await;
        let cleared = self.client.read_csr(self.policy).await;

        self.client
            .write_csr(set_field(halted, CsrField::Halt, 0))
            .await;

        ScenarioResult::new(
            Scenario::Buffer,
            Observation::Buffer {
                csr_halted,
                samples_driven: BUFFER_SAMPLES,
                buffer_count: full.map(|csr| get_field(csr, CsrField::BufferCount)),
                overflow: full.map(|csr| is_set(csr, CsrField::Overflow)),
                count_after_clear: cleared.map(|csr| get_field(csr, CsrField::BufferCount)),
                overflow_after_clear: cleared.map(|csr| is_set(csr, CsrField::Overflow)),
            },
        )
    }

    /// Write a pattern to a data register and capture what reads back
    pub async fn register_read_write(&self) -> ScenarioResult {
        let write_accepted = self.client.write_register(DATA_REGISTER, DATA_PATTERN).await;
        let read_back = self.client.read_register(DATA_REGISTER).await;

        ScenarioResult::new(
            Scenario::RegisterReadWrite,
            Observation::RegisterReadWrite {
                address: DATA_REGISTER,
                written: DATA_PATTERN,
                write_accepted,
                read_back,
            },
        )
    }

    /// Enable the instance and confirm it with a fresh CSR read
    async fn enabled_csr(&self) -> Result<u32, SkipReason> {
        self.client.enable().await;
        match self.client.read_csr(self.policy).await {
            Some(csr) if is_set(csr, CsrField::Enable) => Ok(csr),
            Some(_) => Err(SkipReason::NotEnabled),
            None => Err(SkipReason::CsrUnreadable),
        }
    }
}
