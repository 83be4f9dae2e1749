//! Human-readable and JSON rendering of run reports

use colored::{ColoredString, Colorize};

use crate::common::Result;
use crate::register::csr::{decode_active_flags, format_value, get_field, CsrField};
use crate::testing::{InstanceReport, Observation, Scenario, Verdict};

/// Print the per-instance summary table
pub fn print_summary(reports: &[InstanceReport]) {
    println!("\n{}", "===== SUMMARY =====".blue().bold());

    let header = format!(
        "{:<10} {:<12} {:<24} {:<12} {:<24} {:<8} {:<8} {:<8} {:<8}",
        "Instance",
        "CSR Enabled",
        "Decoded",
        "CSR Disabled",
        "Decoded",
        "Bypass",
        "Buffer",
        "Reg R/W",
        "Result"
    );
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for report in reports {
        if report.is_skipped() {
            println!(
                "{:<10} {}",
                report.instance,
                format!("unreachable ({})", report.target.display()).yellow()
            );
            continue;
        }

        let (en_val, dis_val) = match report.result(Scenario::EnableDisable).map(|r| &r.observation) {
            Some(Observation::EnableDisable {
                csr_after_enable,
                csr_after_disable,
                ..
            }) => (*csr_after_enable, *csr_after_disable),
            _ => (None, None),
        };

        println!(
            "{:<10} {:<12} {:<24} {:<12} {:<24} {} {} {} {}",
            report.instance,
            format_value(en_val),
            decode_active_flags(en_val).to_string(),
            format_value(dis_val),
            decode_active_flags(dis_val).to_string(),
            scenario_cell(report, Scenario::Bypass),
            scenario_cell(report, Scenario::Buffer),
            scenario_cell(report, Scenario::RegisterReadWrite),
            verdict_cell(report.verdict()),
        );
    }

    let passed = reports
        .iter()
        .filter(|r| r.verdict() == Verdict::Pass)
        .count();
    println!(
        "\n{} {}/{} instances passed",
        "===== ALL TESTS COMPLETE =====".blue().bold(),
        passed,
        reports.len()
    );
}

/// Print reports as pretty JSON
pub fn print_json(reports: &[InstanceReport]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

/// Print every field of a CSR value
pub fn print_csr(value: u32) {
    println!("CSR: {:#010x}", value);
    for field in CsrField::ALL {
        println!("  {:<14} {}", field.name(), get_field(value, field));
    }
    println!("Decoded: {}", decode_active_flags(Some(value)));
}

fn scenario_cell(report: &InstanceReport, scenario: Scenario) -> ColoredString {
    match report.result(scenario) {
        Some(result) => verdict_cell(result.verdict()),
        None => format!("{:<8}", "-").dimmed(),
    }
}

fn verdict_cell(verdict: Verdict) -> ColoredString {
    let text = format!("{:<8}", verdict.to_string());
    match verdict {
        Verdict::Pass => text.green(),
        Verdict::Fail => text.red().bold(),
        Verdict::Unknown => text.yellow(),
        Verdict::Skipped => text.dimmed(),
    }
}
