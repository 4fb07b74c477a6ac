//! # ClusterMetrics - status report analysis for distributed leader-election clusters
//!
//! This library ingests the periodic status reports emitted by nodes in a
//! distributed cluster and derives summary time series from them. Each
//! report carries a timestamp, the reporting node's address and port, its
//! observed latency, its Lamport clock value, and the node it currently
//! believes is the cluster leader.
//!
//! ## Overview
//!
//! The report log is a merged CSV capture of every node's reports. Loading
//! and ordering it is the job of the [`store`] module; the [`analysis`]
//! module then derives:
//!
//! - **Leader elections**: leader-change events on the merged timeline and
//!   the durations between consecutive changes, a proxy for how long the
//!   cluster spends destabilized during a leadership transition
//! - **Node latency**: per-node latency series and mean latency per node
//! - **Lamport clock**: the maximum logical-clock value per timestamp,
//!   tracking the global clock front
//!
//! Results are written as JSON and text reports by [`analysis::report`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clustermetrics::{analysis, store};
//!
//! let mut reports = store::load_report_log(std::path::Path::new("metrics.csv"))?;
//! store::sort_reports(&mut reports);
//!
//! let durations = analysis::extract_election_durations(&reports);
//! println!("completed election cycles: {}", durations.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! The store signals typed [`store::StoreError`] conditions (unavailable
//! log, malformed record with line position) so analysis is never reached
//! with bad input. The analysis functions themselves are total over ordered
//! input and return plain values. The CLI converts everything to
//! `color_eyre` reports with context.

pub mod analysis;
pub mod store;
