//! End-to-end tests against real instance executables
//!
//! Every instance is a symlink to the `mock_ip` binary inside a temporary
//! directory. The mock keeps its state beside the path it was invoked as, so
//! each symlink behaves as an independent IP block across process calls.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use uad::common::config::{Config, Timing};
use uad::sim::Faults;
use uad::testing::{Observation, Runner, Scenario, SkipReason, Verdict};
use uad::transport::ProcessTransport;
use uad::Instance;

/// Test context owning a directory of instance executables
struct TestContext {
    dir: TempDir,
    config_file: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_file = dir.path().join("config.toml");
        fs::write(
            &config_file,
            format!(
                "instance_dir = {:?}\n\n[timing]\nsettle_ms = 5\ninter_instance_ms = 0\n",
                dir.path().display().to_string()
            ),
        )
        .expect("Failed to write config");

        Self { dir, config_file }
    }

    /// Create an instance executable named `name`
    fn add_instance(&self, name: &str) -> PathBuf {
        let link = self.dir.path().join(name);
        std::os::unix::fs::symlink(env!("CARGO_BIN_EXE_mock_ip"), &link)
            .expect("Failed to symlink mock instance");
        link
    }

    /// Create an instance whose model starts with injected faults
    fn add_faulty_instance(&self, name: &str, faults: Faults) -> PathBuf {
        let link = self.add_instance(name);
        let state = serde_json::json!({ "faults": faults });
        fs::write(state_file(&link), state.to_string()).expect("Failed to seed state");
        link
    }

    fn config(&self) -> Config {
        Config {
            instance_dir: self.dir.path().to_path_buf(),
            timing: Timing {
                settle_ms: 5,
                inter_instance_ms: 0,
            },
            ..Config::default()
        }
    }

    fn instance(&self, name: &str) -> Instance {
        Instance::resolve(name, &self.config())
    }

    fn run_uad(&self, args: &[&str]) -> UadOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_uad"))
            .arg("--config")
            .arg(&self.config_file)
            .args(args)
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run uad");

        UadOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }

    fn run_uad_ok(&self, args: &[&str]) -> String {
        let output = self.run_uad(args);
        assert!(
            output.success,
            "uad {:?} failed:\nstdout: {}\nstderr: {}",
            args, output.stdout, output.stderr
        );
        output.stdout
    }
}

struct UadOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

fn state_file(link: &Path) -> PathBuf {
    let mut name = link.as_os_str().to_owned();
    name.push(".state.json");
    PathBuf::from(name)
}

#[tokio::test]
async fn test_runner_against_process_instances() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");
    ctx.add_instance("impl1");

    let instances = vec![ctx.instance("impl0"), ctx.instance("missing"), ctx.instance("impl1")];
    let transport = ProcessTransport::new();
    let reports = Runner::new(&transport, &ctx.config()).run(&instances).await;

    assert_eq!(reports.len(), 3);
    for report in [&reports[0], &reports[2]] {
        assert!(!report.is_skipped());
        for result in &report.results {
            assert_eq!(result.verdict(), Verdict::Pass, "{}: {:?}", report.instance, result);
        }
    }

    assert!(reports[1].is_skipped());
    assert!(reports[1].results.is_empty());
}

#[tokio::test]
async fn test_overflow_boundary_through_processes() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");

    let transport = ProcessTransport::new();
    let report = Runner::new(&transport, &ctx.config())
        .run_instance(&ctx.instance("impl0"))
        .await;

    let buffer = report.result(Scenario::Buffer).expect("buffer scenario ran");
    assert_eq!(
        buffer.observation,
        Observation::Buffer {
            csr_halted: Some(0x21),
            samples_driven: 256,
            buffer_count: Some(255),
            overflow: Some(true),
            count_after_clear: Some(0),
            overflow_after_clear: Some(false),
        }
    );

    let register = report.result(Scenario::RegisterReadWrite).unwrap();
    assert!(matches!(
        register.observation,
        Observation::RegisterReadWrite {
            read_back: Some(0x1234_5678),
            ..
        }
    ));
}

#[tokio::test]
async fn test_instance_that_never_enables() {
    let ctx = TestContext::new();
    ctx.add_faulty_instance(
        "impl0",
        Faults {
            ignore_enable: true,
            ..Faults::default()
        },
    );

    let transport = ProcessTransport::new();
    let report = Runner::new(&transport, &ctx.config())
        .run_instance(&ctx.instance("impl0"))
        .await;

    assert!(!report.is_skipped());
    assert_eq!(report.results.len(), 4);
    assert_eq!(
        report.result(Scenario::EnableDisable).unwrap().verdict(),
        Verdict::Fail
    );
    for scenario in [Scenario::Bypass, Scenario::Buffer] {
        assert_eq!(
            report.result(scenario).unwrap().observation,
            Observation::Skipped {
                reason: SkipReason::NotEnabled
            }
        );
    }
    assert_eq!(
        report.result(Scenario::RegisterReadWrite).unwrap().verdict(),
        Verdict::Pass
    );
}

#[tokio::test]
async fn test_offline_instance_is_skipped() {
    let ctx = TestContext::new();
    ctx.add_faulty_instance(
        "impl0",
        Faults {
            offline: true,
            ..Faults::default()
        },
    );

    let transport = ProcessTransport::new();
    let report = Runner::new(&transport, &ctx.config())
        .run_instance(&ctx.instance("impl0"))
        .await;

    assert!(report.is_skipped());
    assert!(report.results.is_empty());
}

#[test]
fn test_cli_run_json() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");

    let stdout = ctx.run_uad_ok(&["run", "impl0", "impl1", "--json"]);
    let reports: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(reports[0]["instance"], "impl0");
    assert_eq!(reports[0]["alive"], true);
    assert_eq!(reports[0]["results"].as_array().unwrap().len(), 4);
    assert_eq!(reports[0]["results"][1]["observation"]["response"], 0x1234);

    assert_eq!(reports[1]["instance"], "impl1");
    assert_eq!(reports[1]["alive"], false);
    assert!(reports[1]["results"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_summary_table() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");

    let stdout = ctx.run_uad_ok(&["run", "impl0", "impl1"]);
    assert!(stdout.contains("SUMMARY"));
    assert!(stdout.contains("impl0"));
    assert!(stdout.contains("ENABLE"));
    assert!(stdout.contains("unreachable"));
    assert!(stdout.contains("1/2 instances passed"));
}

#[test]
fn test_cli_strict_fails_on_unreachable() {
    let ctx = TestContext::new();
    let output = ctx.run_uad(&["run", "impl7", "--strict"]);
    assert!(!output.success);
    assert!(output.stderr.contains("failed or were skipped"));
}

#[test]
fn test_cli_register_access() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");

    ctx.run_uad_ok(&["write", "impl0", "0x4", "0x12345678"]);
    let stdout = ctx.run_uad_ok(&["read", "impl0", "4"]);
    assert_eq!(stdout.trim(), "0x12345678");

    ctx.run_uad_ok(&["control", "impl0", "enable"]);
    let stdout = ctx.run_uad_ok(&["read", "impl0", "0x0"]);
    assert!(stdout.contains("0x1"));
    assert!(stdout.contains("Decoded: ENABLE"));
}

#[test]
fn test_cli_probe() {
    let ctx = TestContext::new();
    ctx.add_instance("impl0");

    assert!(ctx.run_uad_ok(&["probe", "impl0"]).contains("impl0 is alive"));

    let output = ctx.run_uad(&["probe", "impl5"]);
    assert!(!output.success);
    assert!(output.stderr.contains("unreachable"));
}

#[test]
fn test_cli_decode() {
    let ctx = TestContext::new();
    let stdout = ctx.run_uad_ok(&["decode", "0x1ff31"]);
    assert!(stdout.contains("BUFFER_COUNT   255"));
    assert!(stdout.contains("Decoded: ENABLE, BYPASS, HALT, OVERFLOW"));

    let output = ctx.run_uad(&["decode", "banana"]);
    assert!(!output.success);
}

#[test]
fn test_mock_rejects_signal_while_disabled() {
    let ctx = TestContext::new();
    let link = ctx.add_instance("impl0");

    let output = Command::new(&link)
        .args(["sig", "--data", "0x1234"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("datapath disabled"));
}
