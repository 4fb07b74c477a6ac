//! Derived summary series over the status-report log.
//!
//! Latency and Lamport clock aggregations that accompany the election
//! analysis. All functions take the already-loaded report slice and return
//! owned series; nothing here mutates or re-sorts the input.

use std::collections::{BTreeMap, HashMap};

use super::types::{LamportPoint, LatencyPoint, NodeLatencySummary, ReportTime, StatusReport};

/// Group latency observations by node, preserving report order per node.
pub fn latency_over_time(reports: &[StatusReport]) -> BTreeMap<String, Vec<LatencyPoint>> {
    let mut series: BTreeMap<String, Vec<LatencyPoint>> = BTreeMap::new();

    for report in reports {
        series
            .entry(report.node_id.clone())
            .or_default()
            .push(LatencyPoint {
                timestamp: report.timestamp,
                latency_ms: report.latency_ms,
            });
    }

    series
}

/// Per-node latency summaries, highest mean latency first.
pub fn mean_latency_by_node(reports: &[StatusReport]) -> Vec<NodeLatencySummary> {
    let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
    for report in reports {
        samples
            .entry(&report.node_id)
            .or_default()
            .push(report.latency_ms);
    }

    let mut summaries: Vec<NodeLatencySummary> = samples
        .into_iter()
        .map(|(node_id, values)| {
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let max = values.iter().cloned().fold(f64::MIN, f64::max);
            NodeLatencySummary {
                node_id: node_id.to_string(),
                mean_latency_ms: mean,
                max_latency_ms: max,
                reports: count,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.mean_latency_ms
            .partial_cmp(&a.mean_latency_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

/// Maximum Lamport clock value per distinct timestamp, ascending in time.
///
/// Tracks the global logical-clock front rather than any single node's view.
pub fn max_lamport_over_time(reports: &[StatusReport]) -> Vec<LamportPoint> {
    let mut maxima: BTreeMap<ReportTime, u64> = BTreeMap::new();

    for report in reports {
        maxima
            .entry(report.timestamp)
            .and_modify(|m| *m = (*m).max(report.lamport))
            .or_insert(report.lamport);
    }

    maxima
        .into_iter()
        .map(|(timestamp, max_lamport)| LamportPoint {
            timestamp,
            max_lamport,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::analysis::types::node_identity;

    fn report(offset_ms: i64, ip: &str, latency_ms: f64, lamport: u64) -> StatusReport {
        let base = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();
        StatusReport {
            timestamp: base + Duration::milliseconds(offset_ms),
            node_id: node_identity(ip, 50051),
            node_ip: ip.to_string(),
            node_port: 50051,
            latency_ms,
            lamport,
            leader: "3".to_string(),
        }
    }

    #[test]
    fn test_latency_over_time_groups_by_node() {
        let reports = vec![
            report(0, "10.0.0.1", 5.0, 1),
            report(0, "10.0.0.2", 9.0, 1),
            report(10, "10.0.0.1", 6.0, 2),
        ];
        let series = latency_over_time(&reports);

        assert_eq!(series.len(), 2);
        let a = &series["10.0.0.1:50051"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].latency_ms, 5.0);
        assert_eq!(a[1].latency_ms, 6.0);
        assert_eq!(series["10.0.0.2:50051"].len(), 1);
    }

    #[test]
    fn test_mean_latency_sorted_descending() {
        let reports = vec![
            report(0, "10.0.0.1", 2.0, 1),
            report(10, "10.0.0.1", 4.0, 2),
            report(0, "10.0.0.2", 20.0, 1),
            report(10, "10.0.0.2", 10.0, 2),
        ];
        let summaries = mean_latency_by_node(&reports);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].node_id, "10.0.0.2:50051");
        assert!((summaries[0].mean_latency_ms - 15.0).abs() < 0.001);
        assert!((summaries[0].max_latency_ms - 20.0).abs() < 0.001);
        assert_eq!(summaries[0].reports, 2);
        assert_eq!(summaries[1].node_id, "10.0.0.1:50051");
        assert!((summaries[1].mean_latency_ms - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_max_lamport_per_timestamp() {
        let reports = vec![
            report(0, "10.0.0.1", 5.0, 3),
            report(0, "10.0.0.2", 5.0, 7),
            report(10, "10.0.0.1", 5.0, 4),
        ];
        let points = max_lamport_over_time(&reports);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].max_lamport, 7);
        assert_eq!(points[1].max_lamport, 4);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn test_empty_input() {
        assert!(latency_over_time(&[]).is_empty());
        assert!(mean_latency_by_node(&[]).is_empty());
        assert!(max_lamport_over_time(&[]).is_empty());
    }
}
