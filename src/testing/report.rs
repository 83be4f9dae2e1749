//! Scenario results and per-instance reports
//!
//! The orchestrator only records what it observed. Verdicts are derived
//! afterwards from those observations, so a report is always complete even
//! when the instance misbehaves.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::instance::Instance;
use crate::register::csr::{is_set, CsrField};

/// The fixed battery of scenarios, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    EnableDisable,
    Bypass,
    Buffer,
    RegisterReadWrite,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::EnableDisable,
        Scenario::Bypass,
        Scenario::Buffer,
        Scenario::RegisterReadWrite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::EnableDisable => "enable/disable",
            Scenario::Bypass => "bypass",
            Scenario::Buffer => "buffer/halt/overflow",
            Scenario::RegisterReadWrite => "register r/w",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a scenario did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// ENABLE read back as clear
    NotEnabled,
    /// The precondition CSR read failed
    CsrUnreadable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotEnabled => f.write_str("instance not enabled"),
            SkipReason::CsrUnreadable => f.write_str("CSR unreadable"),
        }
    }
}

/// Values captured by one scenario. `None` means "could not be determined".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    EnableDisable {
        csr_after_enable: Option<u32>,
        enabled: Option<bool>,
        csr_after_disable: Option<u32>,
        /// `None` when the instance never enabled, so disable was not attempted
        disabled: Option<bool>,
    },
    Bypass {
        sample: u32,
        /// CSR read back right after BYPASS was written
        csr_with_bypass: Option<u32>,
        response: Option<u32>,
        csr_after_clear: Option<u32>,
    },
    Buffer {
        /// CSR read back right after HALT was written
        csr_halted: Option<u32>,
        samples_driven: u32,
        buffer_count: Option<u32>,
        overflow: Option<bool>,
        count_after_clear: Option<u32>,
        overflow_after_clear: Option<bool>,
    },
    RegisterReadWrite {
        address: u32,
        written: u32,
        write_accepted: bool,
        read_back: Option<u32>,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Outcome judged from an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Skipped,
    Unknown,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Skipped => f.write_str("SKIP"),
            Verdict::Unknown => f.write_str("UNKNOWN"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// One scenario run against one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub observation: Observation,
}

impl ScenarioResult {
    pub fn new(scenario: Scenario, observation: Observation) -> Self {
        Self {
            scenario,
            observation,
        }
    }

    pub fn skipped(scenario: Scenario, reason: SkipReason) -> Self {
        Self::new(scenario, Observation::Skipped { reason })
    }

    /// Judge the observation against the expected register semantics
    pub fn verdict(&self) -> Verdict {
        match &self.observation {
            Observation::Skipped { .. } => Verdict::Skipped,

            Observation::EnableDisable {
                enabled, disabled, ..
            } => match (enabled, disabled) {
                (Some(false), _) | (_, Some(false)) => Verdict::Fail,
                (Some(true), Some(true)) => Verdict::Pass,
                _ => Verdict::Unknown,
            },

            Observation::Bypass {
                sample,
                csr_with_bypass,
                response,
                csr_after_clear,
            } => match (csr_with_bypass, response, csr_after_clear) {
                (Some(csr), _, _) if !is_set(*csr, CsrField::Bypass) => Verdict::Fail,
                (_, Some(value), _) if value != sample => Verdict::Fail,
                (_, _, Some(csr)) if is_set(*csr, CsrField::Bypass) => Verdict::Fail,
                (Some(_), Some(_), Some(_)) => Verdict::Pass,
                _ => Verdict::Unknown,
            },

            Observation::Buffer {
                csr_halted,
                samples_driven,
                buffer_count,
                overflow,
                count_after_clear,
                overflow_after_clear,
            } => match (buffer_count, overflow, count_after_clear, overflow_after_clear) {
                _ if csr_halted.is_some_and(|csr| !is_set(csr, CsrField::Halt)) => Verdict::Fail,
                (Some(0), _, _, _) if *samples_driven > 0 => Verdict::Fail,
                (_, _, Some(count), _) if *count != 0 => Verdict::Fail,
                (_, _, _, Some(true)) => Verdict::Fail,
                // OVERFLOW may only latch once the count field is saturated
                (Some(count), Some(true), _, _) if *count < 0xff => Verdict::Fail,
                (Some(_), Some(_), Some(_), Some(_)) if csr_halted.is_some() => Verdict::Pass,
                _ => Verdict::Unknown,
            },

            Observation::RegisterReadWrite {
                written, read_back, ..
            } => match read_back {
                Some(value) if value == written => Verdict::Pass,
                Some(_) => Verdict::Fail,
                None => Verdict::Unknown,
            },
        }
    }
}

/// Every scenario result for one instance, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub instance: String,
    pub target: PathBuf,
    /// `false` when the liveness probe failed; `results` is then empty
    pub alive: bool,
    pub results: Vec<ScenarioResult>,
}

impl InstanceReport {
    /// Report for an instance that failed its liveness probe
    pub fn skipped(instance: &Instance) -> Self {
        Self {
            instance: instance.name().to_string(),
            target: instance.target().to_path_buf(),
            alive: false,
            results: Vec::new(),
        }
    }

    pub fn completed(instance: &Instance, results: Vec<ScenarioResult>) -> Self {
        Self {
            instance: instance.name().to_string(),
            target: instance.target().to_path_buf(),
            alive: true,
            results,
        }
    }

    pub fn is_skipped(&self) -> bool {
        !self.alive
    }

    pub fn result(&self, scenario: Scenario) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.scenario == scenario)
    }

    /// Worst verdict across the instance; `Skipped` for an unreachable instance
    pub fn verdict(&self) -> Verdict {
        if self.is_skipped() {
            return Verdict::Skipped;
        }
        self.results
            .iter()
            .map(ScenarioResult::verdict)
            .map(|v| if v == Verdict::Skipped { Verdict::Unknown } else { v })
            .max()
            .unwrap_or(Verdict::Unknown)
    }
}
