//! Runs the scenario battery across the configured instances
//!
//! Instances are handled one at a time. Each is gated on the liveness probe;
//! an unreachable instance gets a skipped report with no scenario results.

use crate::common::config::{Config, Timing};
use crate::instance::Instance;
use crate::register::{RegisterClient, RetryPolicy};
use crate::transport::Transport;

use super::orchestrator::TestOrchestrator;
use super::probe::is_alive;
use super::report::InstanceReport;

/// Sequential runner over a fixed instance list
pub struct Runner<'a> {
    transport: &'a dyn Transport,
    timing: Timing,
    policy: RetryPolicy,
}

impl<'a> Runner<'a> {
    pub fn new(transport: &'a dyn Transport, config: &Config) -> Self {
        Self {
            transport,
            timing: config.timing.clone(),
            policy: config.retry_policy(),
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Test every instance in order and collect one report per instance
    pub async fn run(&self, instances: &[Instance]) -> Vec<InstanceReport> {
        let mut reports = Vec::with_capacity(instances.len());
        for instance in instances {
            reports.push(self.run_instance(instance).await);
            tokio::time::sleep(self.timing.inter_instance()).await;
        }
        reports
    }

    /// Probe one instance and, if alive, run the full battery
    pub async fn run_instance(&self, instance: &Instance) -> InstanceReport {
        tracing::info!(
            instance = instance.name(),
            path = %instance.target().display(),
            "testing instance"
        );

        let client =
            RegisterClient::new(self.transport, instance).with_settle(self.timing.settle());

        if !is_alive(&client).await {
            tracing::warn!(instance = instance.name(), "instance unreachable, skipping");
            return InstanceReport::skipped(instance);
        }

        let results = TestOrchestrator::new(client, self.policy).run().await;
        let report = InstanceReport::completed(instance, results);
        tracing::info!(instance = instance.name(), verdict = %report.verdict(), "instance done");
        report
    }
}
