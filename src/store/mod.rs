//! Report log store.
//!
//! Loads the persisted status-report log (CSV) into typed [`StatusReport`]
//! records, derives the composite node identifier from address and port,
//! merges multi-file captures, and hands analysis a timestamp-ordered
//! sequence. Malformed input is rejected here so the analysis passes never
//! see it.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;

use crate::analysis::types::{node_identity, ReportTime, StatusReport};

/// Expected column order of a report log.
pub const REPORT_LOG_COLUMNS: [&str; 6] = [
    "timestamp",
    "node_ip",
    "node_port",
    "latency_ms",
    "lamport",
    "leader",
];

/// Errors signaled by the report store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The report log cannot be found or opened.
    #[error("report log unavailable: {path}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row in the report log does not parse as a status report.
    #[error("malformed record at {path}:{line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A read failed after the log was opened.
    #[error("i/o error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a report-log timestamp.
///
/// Accepts RFC 3339 ("2024-05-03T12:00:00.125Z") and the space-separated
/// form ("2024-05-03 12:00:00.125") that collectors commonly emit.
pub fn parse_timestamp(s: &str) -> Option<ReportTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parse one CSV row into a status report.
fn parse_record(line: &str) -> Result<StatusReport, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != REPORT_LOG_COLUMNS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            REPORT_LOG_COLUMNS.len(),
            fields.len()
        ));
    }

    let timestamp = parse_timestamp(fields[0])
        .ok_or_else(|| format!("unparseable timestamp '{}'", fields[0]))?;

    let node_ip = fields[1];
    if node_ip.is_empty() {
        return Err("empty node_ip field".to_string());
    }

    let node_port: u16 = fields[2]
        .parse()
        .map_err(|_| format!("invalid node_port '{}'", fields[2]))?;

    let latency_ms: f64 = fields[3]
        .parse()
        .map_err(|_| format!("invalid latency_ms '{}'", fields[3]))?;

    let lamport: u64 = fields[4]
        .parse()
        .map_err(|_| format!("invalid lamport '{}'", fields[4]))?;

    let leader = fields[5];
    if leader.is_empty() {
        return Err("empty leader field".to_string());
    }

    Ok(StatusReport {
        timestamp,
        node_id: node_identity(node_ip, node_port),
        node_ip: node_ip.to_string(),
        node_port,
        latency_ms,
        lamport,
        leader: leader.to_string(),
    })
}

/// Load a single report log file.
///
/// A leading header row is skipped; every other non-empty line must parse,
/// otherwise the load fails with the offending line number.
pub fn load_report_log(path: &Path) -> Result<Vec<StatusReport>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    let mut reports = Vec::new();

    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Header row: the first column name instead of a timestamp.
        if index == 0 && trimmed.split(',').next().map(str::trim) == Some("timestamp") {
            continue;
        }

        let report = parse_record(trimmed).map_err(|reason| StoreError::MalformedRecord {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;
        reports.push(report);
    }

    log::debug!("Loaded {} reports from {}", reports.len(), path.display());
    Ok(reports)
}

/// Load and merge every `*.csv` report log in a directory, in parallel.
pub fn load_report_dir(dir: &Path) -> Result<Vec<StatusReport>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|source| StoreError::DataUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "csv"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(StoreError::DataUnavailable {
            path: dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no .csv report logs in directory",
            ),
        });
    }

    log::info!(
        "Loading {} report logs from {} in parallel...",
        paths.len(),
        dir.display()
    );

    let per_file: Vec<Vec<StatusReport>> = paths
        .par_iter()
        .map(|p| load_report_log(p))
        .collect::<Result<_, _>>()?;

    let reports: Vec<StatusReport> = per_file.into_iter().flatten().collect();
    log::info!("Loaded {} reports total", reports.len());
    Ok(reports)
}

/// Sort reports non-decreasingly by timestamp.
///
/// The sort is stable, so reports carrying the same timestamp keep their
/// input order. Analysis assumes this ordering; call it after every load or
/// merge.
pub fn sort_reports(reports: &mut [StatusReport]) {
    reports.sort_by_key(|r| r.timestamp);
}
