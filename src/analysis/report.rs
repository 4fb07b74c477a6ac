//! Report generation for status-report analysis.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::FullMetricsReport;

/// Generate JSON report
pub fn generate_json_report(report: &FullMetricsReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Generate human-readable text report
pub fn generate_text_report(report: &FullMetricsReport, output_path: &Path) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    // Header
    lines.push("=".repeat(80));
    lines.push("                     CLUSTER STATUS REPORT ANALYSIS".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    // Metadata
    lines.push(format!("Analysis Date: {}", report.metadata.analysis_timestamp));
    lines.push(format!("Report Log: {}", report.metadata.report_log));
    lines.push(format!("Reports: {}", report.metadata.total_reports));
    lines.push(format!("Nodes: {}", report.metadata.total_nodes));
    if let (Some(first), Some(last)) = (report.metadata.first_report, report.metadata.last_report) {
        lines.push(format!(
            "Time Range: {} .. {}",
            first.to_rfc3339(),
            last.to_rfc3339()
        ));
    }
    lines.push(String::new());

    // Leader elections
    if let Some(ref elections) = report.election_analysis {
        lines.push("=".repeat(80));
        lines.push("                           LEADER ELECTIONS".to_string());
        lines.push("=".repeat(80));
        lines.push(String::new());

        lines.push(format!(
            "Leader changes observed: {}",
            elections.total_leader_changes
        ));

        if !elections.leader_changes.is_empty() {
            for change in &elections.leader_changes {
                lines.push(format!(
                    "  {}  {} -> {}",
                    change.timestamp.to_rfc3339(),
                    change.previous_leader,
                    change.new_leader
                ));
            }
        }
        lines.push(String::new());

        if let Some(ref stats) = elections.stats {
            lines.push(format!("Completed election cycles: {}", stats.cycles));
            lines.push(format!("  Average duration: {:.1}ms", stats.mean_ms));
            lines.push(format!("  Median: {:.1}ms", stats.median_ms));
            lines.push(format!("  95th percentile: {:.1}ms", stats.p95_ms));
            lines.push(format!("  Longest: {:.1}ms", stats.max_ms));
            lines.push(String::new());

            lines.push("Cycle durations (ms):".to_string());
            for (i, duration_ms) in elections.durations_ms.iter().enumerate() {
                lines.push(format!("  {}. {:.1}", i + 1, duration_ms));
            }
        } else {
            lines.push("No completed election cycles detected.".to_string());
            lines.push(
                "At least two leader changes are needed to measure one cycle.".to_string(),
            );
        }
        lines.push(String::new());
    }

    // Latency
    if let Some(ref latency) = report.latency_analysis {
        lines.push("=".repeat(80));
        lines.push("                             NODE LATENCY".to_string());
        lines.push("=".repeat(80));
        lines.push(String::new());

        lines.push("Mean latency by node (highest first):".to_string());
        for (i, node) in latency.by_node.iter().enumerate() {
            lines.push(format!(
                "  {}. {}: {:.1}ms mean, {:.1}ms max ({} reports)",
                i + 1,
                node.node_id,
                node.mean_latency_ms,
                node.max_latency_ms,
                node.reports
            ));
        }
        lines.push(String::new());
    }

    // Lamport clock
    if let Some(ref lamport) = report.lamport_analysis {
        lines.push("=".repeat(80));
        lines.push("                            LAMPORT CLOCK".to_string());
        lines.push("=".repeat(80));
        lines.push(String::new());

        lines.push(format!("Peak Lamport value: {}", lamport.peak));
        lines.push(format!(
            "Distinct timestamps tracked: {}",
            lamport.max_over_time.len()
        ));
        if let (Some(first), Some(last)) =
            (lamport.max_over_time.first(), lamport.max_over_time.last())
        {
            lines.push(format!(
                "Clock front: {} at {} .. {} at {}",
                first.max_lamport,
                first.timestamp.to_rfc3339(),
                last.max_lamport,
                last.timestamp.to_rfc3339()
            ));
        }
        lines.push(String::new());
    }

    // Footer
    lines.push("=".repeat(80));

    let content = lines.join("\n");
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &FullMetricsReport) {
    println!("\n=== CLUSTER STATUS ANALYSIS SUMMARY ===\n");
    println!("Reports: {}", report.metadata.total_reports);
    println!("Nodes: {}", report.metadata.total_nodes);

    if let Some(ref elections) = report.election_analysis {
        println!("\nLeader Elections:");
        println!("  Leader changes: {}", elections.total_leader_changes);
        match elections.stats {
            Some(ref stats) => {
                println!("  Completed cycles: {}", stats.cycles);
                println!("  Average duration: {:.1}ms", stats.mean_ms);
                println!("  Longest: {:.1}ms", stats.max_ms);
            }
            None => println!("  No completed election cycles detected."),
        }
    }

    if let Some(ref latency) = report.latency_analysis {
        if let Some(slowest) = latency.by_node.first() {
            println!("\nNode Latency:");
            println!(
                "  Slowest node: {} ({:.1}ms mean)",
                slowest.node_id, slowest.mean_latency_ms
            );
            println!("  Nodes tracked: {}", latency.by_node.len());
        }
    }

    if let Some(ref lamport) = report.lamport_analysis {
        println!("\nLamport Clock:");
        println!("  Peak value: {}", lamport.peak);
        println!("  Timestamps tracked: {}", lamport.max_over_time.len());
    }

    println!();
}
