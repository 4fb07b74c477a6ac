//! Status-report analysis for distributed leader-election clusters.
//!
//! This module derives summary series from a timestamp-ordered status-report
//! log: leader-change events and election cycle durations, per-node latency,
//! and the global Lamport clock front.

pub mod types;
pub mod election;
pub mod series;
pub mod report;

pub use types::*;
pub use election::{detect_leader_changes, election_stats, extract_election_durations};
pub use series::{latency_over_time, max_lamport_over_time, mean_latency_by_node};
pub use report::{generate_json_report, generate_text_report, print_summary};
