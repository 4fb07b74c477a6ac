//! Core data types for cluster status-report analysis.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp of a status report, as recorded by the metrics collector.
pub type ReportTime = DateTime<Utc>;

/// One periodic status report emitted by a cluster node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub timestamp: ReportTime,
    /// Composite identifier derived from the reporting node's address and port.
    pub node_id: String,
    pub node_ip: String,
    pub node_port: u16,
    /// Round-trip latency observed by the node at report time.
    pub latency_ms: f64,
    /// The node's Lamport clock value at report time.
    pub lamport: u64,
    /// Node ID this report believes currently holds cluster leadership.
    pub leader: String,
}

/// Build the composite node identifier used throughout the analysis.
pub fn node_identity(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// A leader change detected on the merged report timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderChange {
    pub timestamp: ReportTime,
    pub previous_leader: String,
    pub new_leader: String,
}

/// One latency observation for a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyPoint {
    pub timestamp: ReportTime,
    pub latency_ms: f64,
}

/// Per-node latency summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLatencySummary {
    pub node_id: String,
    pub mean_latency_ms: f64,
    pub max_latency_ms: f64,
    pub reports: usize,
}

/// Maximum Lamport clock value observed across all nodes at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LamportPoint {
    pub timestamp: ReportTime,
    pub max_lamport: u64,
}

/// Aggregate statistics over the election duration samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionStats {
    pub cycles: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

/// Leader election section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionReport {
    /// Total leader changes observed on the merged timeline.
    pub total_leader_changes: usize,
    /// The change events themselves. May be cleared for compact output.
    pub leader_changes: Vec<LeaderChange>,
    /// Completed cycle durations in detection order.
    pub durations_ms: Vec<f64>,
    /// Aggregate statistics; `None` when no cycle completed.
    pub stats: Option<ElectionStats>,
}

/// Latency section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Per-node summaries, highest mean latency first.
    pub by_node: Vec<NodeLatencySummary>,
    /// Full per-node series. May be cleared for compact output.
    pub series: BTreeMap<String, Vec<LatencyPoint>>,
}

/// Lamport clock section of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LamportReport {
    /// The global logical-clock front over time.
    pub max_over_time: Vec<LamportPoint>,
    /// Highest Lamport value seen anywhere in the log.
    pub peak: u64,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub analysis_timestamp: String,
    pub report_log: String,
    pub total_reports: usize,
    pub total_nodes: usize,
    pub first_report: Option<ReportTime>,
    pub last_report: Option<ReportTime>,
}

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullMetricsReport {
    pub metadata: ReportMetadata,
    pub election_analysis: Option<ElectionReport>,
    pub latency_analysis: Option<LatencyReport>,
    pub lamport_analysis: Option<LamportReport>,
}
