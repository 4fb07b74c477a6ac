//! Leader-change detection and election interval extraction.
//!
//! Works on the report stream merged across every node and ordered by
//! timestamp. A change is any report whose observed leader differs from the
//! report scanned immediately before it, so interleaved reports from two
//! nodes that disagree about the leader register as changes even without a
//! cluster-wide transition. Consumers depend on exactly this merged-timeline
//! behavior.

use chrono::Duration;

use super::types::{ElectionStats, LeaderChange, StatusReport};

/// Extract election duration samples from a timestamp-ordered report sequence.
///
/// The first detected leader change opens a measurement cycle without
/// emitting anything; every later change emits the time elapsed since the
/// change before it and re-anchors the cycle at its own timestamp. The
/// result is the sequence of gaps between consecutive changes, in detection
/// order.
///
/// The caller must order `reports` non-decreasingly by timestamp (ties keep
/// their input order); every emitted duration is then non-negative. Fewer
/// than two changes across the whole input yield an empty result, which
/// means "no completed election cycle", not an error.
pub fn extract_election_durations(reports: &[StatusReport]) -> Vec<Duration> {
    let mut previous_leader: Option<&str> = None;
    let mut cycle_start = None;
    let mut output = Vec::new();

    for report in reports {
        let Some(prev) = previous_leader else {
            // First report only seeds the comparison baseline.
            previous_leader = Some(&report.leader);
            continue;
        };

        if report.leader != prev {
            match cycle_start {
                None => cycle_start = Some(report.timestamp),
                Some(start) => {
                    output.push(report.timestamp - start);
                    cycle_start = Some(report.timestamp);
                }
            }
        }

        previous_leader = Some(&report.leader);
    }

    output
}

/// Extract the leader-change events themselves, with both identities.
///
/// Same scan as [`extract_election_durations`]; exposed separately so
/// reports can show who handed leadership to whom.
pub fn detect_leader_changes(reports: &[StatusReport]) -> Vec<LeaderChange> {
    let mut previous_leader: Option<&str> = None;
    let mut changes = Vec::new();

    for report in reports {
        if let Some(prev) = previous_leader {
            if report.leader != prev {
                changes.push(LeaderChange {
                    timestamp: report.timestamp,
                    previous_leader: prev.to_string(),
                    new_leader: report.leader.clone(),
                });
            }
        }
        previous_leader = Some(&report.leader);
    }

    changes
}

/// Aggregate statistics over the duration samples, in milliseconds.
///
/// Returns `None` when no cycle completed.
pub fn election_stats(durations: &[Duration]) -> Option<ElectionStats> {
    if durations.is_empty() {
        return None;
    }

    let ms: Vec<f64> = durations.iter().map(duration_ms).collect();
    let max_ms = ms.iter().cloned().fold(0.0, f64::max);

    Some(ElectionStats {
        cycles: ms.len(),
        mean_ms: mean(&ms),
        median_ms: median(&ms),
        p95_ms: percentile(&ms, 95.0),
        max_ms,
    })
}

/// Milliseconds represented by a sample, fractional part included.
pub fn duration_ms(d: &Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1000.0,
        // Past the microsecond range; millisecond precision is plenty there.
        None => d.num_milliseconds() as f64,
    }
}

/// Calculate mean of a slice
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate median of a slice
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Calculate percentile of a slice
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
