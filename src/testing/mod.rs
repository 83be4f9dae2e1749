//! Scenario orchestration
//!
//! The liveness probe gates each instance, the orchestrator runs the fixed
//! scenario battery, and the runner strings instances together into reports.

mod orchestrator;
mod probe;
mod report;
mod runner;

pub use orchestrator::{
    TestOrchestrator, BUFFER_SAMPLES, BYPASS_SAMPLE, DATA_PATTERN, DATA_REGISTER,
};
pub use probe::is_alive;
pub use report::{InstanceReport, Observation, Scenario, ScenarioResult, SkipReason, Verdict};
pub use runner::Runner;
