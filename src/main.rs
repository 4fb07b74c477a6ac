//! Status-report analysis CLI for distributed leader-election clusters.
//!
//! Loads a cluster's periodic status-report log and derives leader-election,
//! latency, and Lamport clock series from it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};

use clustermetrics::analysis::{
    self,
    types::{
        ElectionReport, FullMetricsReport, LamportReport, LatencyReport, ReportMetadata,
        StatusReport,
    },
};
use clustermetrics::store;

#[derive(Parser)]
#[command(name = "metrics-analyzer")]
#[command(about = "Status report analysis for distributed leader-election clusters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the report log: a metrics CSV file or a directory of per-node CSVs
    #[arg(short, long, default_value = "metrics.csv")]
    input: PathBuf,

    /// Output directory for reports
    #[arg(short, long, default_value = "analysis_output")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run full analysis (elections + latency + lamport)
    Full {
        /// Skip election analysis
        #[arg(long)]
        no_elections: bool,

        /// Skip latency analysis
        #[arg(long)]
        no_latency: bool,

        /// Skip Lamport clock analysis
        #[arg(long)]
        no_lamport: bool,
    },

    /// Analyze leader elections only
    Elections {
        /// Include the individual leader-change events in the output
        #[arg(long)]
        detailed: bool,
    },

    /// Analyze node latency only
    Latency {
        /// Include the full per-node latency series in the output
        #[arg(long)]
        detailed: bool,
    },

    /// Analyze Lamport clock progression only
    Lamport,

    /// Show summary statistics
    Summary,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    // Set thread pool size
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    // Load the report log and establish the timestamp ordering every
    // analysis pass relies on.
    log::info!("Loading report log from {}...", cli.input.display());
    let reports = load_reports(&cli.input)?;
    log::info!(
        "Loaded {} reports from {} nodes",
        reports.len(),
        count_nodes(&reports)
    );

    // Create output directory
    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory: {}", cli.output.display()))?;

    match cli.command {
        Commands::Full {
            no_elections,
            no_latency,
            no_lamport,
        } => {
            log::info!("Running full analysis...");

            let report = FullMetricsReport {
                metadata: create_metadata(&cli.input, &reports),
                election_analysis: (!no_elections).then(|| build_election_report(&reports, true)),
                latency_analysis: (!no_latency).then(|| build_latency_report(&reports, false)),
                lamport_analysis: (!no_lamport).then(|| build_lamport_report(&reports)),
            };

            analysis::generate_json_report(&report, &cli.output.join("full_report.json"))?;
            analysis::generate_text_report(&report, &cli.output.join("report.txt"))?;
            analysis::print_summary(&report);

            log::info!("Analysis complete. Reports written to {}", cli.output.display());
        }
        Commands::Elections { detailed } => {
            let report = FullMetricsReport {
                metadata: create_metadata(&cli.input, &reports),
                election_analysis: Some(build_election_report(&reports, detailed)),
                latency_analysis: None,
                lamport_analysis: None,
            };

            analysis::generate_json_report(&report, &cli.output.join("election_report.json"))?;
            analysis::generate_text_report(&report, &cli.output.join("election_report.txt"))?;
            analysis::print_summary(&report);
        }
        Commands::Latency { detailed } => {
            let report = FullMetricsReport {
                metadata: create_metadata(&cli.input, &reports),
                election_analysis: None,
                latency_analysis: Some(build_latency_report(&reports, detailed)),
                lamport_analysis: None,
            };

            analysis::generate_json_report(&report, &cli.output.join("latency_report.json"))?;
            analysis::generate_text_report(&report, &cli.output.join("latency_report.txt"))?;
            analysis::print_summary(&report);
        }
        Commands::Lamport => {
            let report = FullMetricsReport {
                metadata: create_metadata(&cli.input, &reports),
                election_analysis: None,
                latency_analysis: None,
                lamport_analysis: Some(build_lamport_report(&reports)),
            };

            analysis::generate_json_report(&report, &cli.output.join("lamport_report.json"))?;
            analysis::generate_text_report(&report, &cli.output.join("lamport_report.txt"))?;
            analysis::print_summary(&report);
        }
        Commands::Summary => {
            // Quick look at the loaded data without running analyses
            let leaders: HashSet<&str> = reports.iter().map(|r| r.leader.as_str()).collect();

            println!("\n=== REPORT LOG SUMMARY ===\n");
            println!("Report log: {}", cli.input.display());
            println!();
            println!("Reports: {}", reports.len());
            println!("Nodes: {}", count_nodes(&reports));
            println!("Observed leaders: {}", leaders.len());
            if let (Some(first), Some(last)) = (reports.first(), reports.last()) {
                println!(
                    "Time range: {} .. {}",
                    first.timestamp.to_rfc3339(),
                    last.timestamp.to_rfc3339()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Load one CSV file or a directory of per-node CSVs, then sort by timestamp.
fn load_reports(input: &Path) -> Result<Vec<StatusReport>> {
    let mut reports = if input.is_dir() {
        store::load_report_dir(input)?
    } else {
        store::load_report_log(input)?
    };
    store::sort_reports(&mut reports);
    Ok(reports)
}

fn count_nodes(reports: &[StatusReport]) -> usize {
    reports
        .iter()
        .map(|r| r.node_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn build_election_report(reports: &[StatusReport], detailed: bool) -> ElectionReport {
    log::info!("Analyzing leader elections...");
    let changes = analysis::detect_leader_changes(reports);
    let durations = analysis::extract_election_durations(reports);

    ElectionReport {
        total_leader_changes: changes.len(),
        leader_changes: if detailed { changes } else { Vec::new() },
        durations_ms: durations.iter().map(analysis::election::duration_ms).collect(),
        stats: analysis::election_stats(&durations),
    }
}

fn build_latency_report(reports: &[StatusReport], detailed: bool) -> LatencyReport {
    log::info!("Analyzing node latency...");
    LatencyReport {
        by_node: analysis::mean_latency_by_node(reports),
        series: if detailed {
            analysis::latency_over_time(reports)
        } else {
            Default::default()
        },
    }
}

fn build_lamport_report(reports: &[StatusReport]) -> LamportReport {
    log::info!("Analyzing Lamport clock progression...");
    let max_over_time = analysis::max_lamport_over_time(reports);
    let peak = max_over_time.iter().map(|p| p.max_lamport).max().unwrap_or(0);

    LamportReport {
        max_over_time,
        peak,
    }
}

fn create_metadata(input: &Path, reports: &[StatusReport]) -> ReportMetadata {
    ReportMetadata {
        analysis_timestamp: chrono::Utc::now().to_rfc3339(),
        report_log: input.display().to_string(),
        total_reports: reports.len(),
        total_nodes: count_nodes(reports),
        first_report: reports.first().map(|r| r.timestamp),
        last_report: reports.last().map(|r| r.timestamp),
    }
}
