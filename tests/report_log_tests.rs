//! End-to-end tests over on-disk report log fixtures: load through the
//! store, run the analyses, and check the generated reports.

use std::fs;
use std::io::Write;

use clustermetrics::analysis::{self, types::FullMetricsReport};
use clustermetrics::store::{self, StoreError};
use tempfile::tempdir;

const METRICS_CSV: &str = "\
timestamp,node_ip,node_port,latency_ms,lamport,leader
2024-05-03T12:00:00.000Z,25.0.0.10,50051,5.0,1,3
2024-05-03T12:00:00.000Z,25.0.0.11,50052,9.0,2,3
2024-05-03T12:00:01.000Z,25.0.0.10,50051,6.0,3,3
2024-05-03T12:00:02.500Z,25.0.0.11,50052,8.0,5,1
2024-05-03T12:00:03.000Z,25.0.0.10,50051,7.0,6,1
2024-05-03T12:00:04.500Z,25.0.0.11,50052,22.0,8,3
";

#[test]
fn test_load_and_extract_election_durations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    fs::write(&path, METRICS_CSV).unwrap();

    let mut reports = store::load_report_log(&path).unwrap();
    store::sort_reports(&mut reports);

    assert_eq!(reports.len(), 6);
    assert_eq!(reports[0].node_id, "25.0.0.10:50051");

    // Leader changes at 12:00:02.500 (3 -> 1) and 12:00:04.500 (1 -> 3):
    // one completed cycle of two seconds.
    let durations = analysis::extract_election_durations(&reports);
    assert_eq!(durations.len(), 1);
    assert_eq!(durations[0].num_milliseconds(), 2000);

    let changes = analysis::detect_leader_changes(&reports);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].previous_leader, "3");
    assert_eq!(changes[0].new_leader, "1");
}

#[test]
fn test_load_and_derive_series() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    fs::write(&path, METRICS_CSV).unwrap();

    let mut reports = store::load_report_log(&path).unwrap();
    store::sort_reports(&mut reports);

    let by_node = analysis::mean_latency_by_node(&reports);
    assert_eq!(by_node.len(), 2);
    // 25.0.0.11 averages (9 + 8 + 22) / 3 = 13.0, above 25.0.0.10's 6.0.
    assert_eq!(by_node[0].node_id, "25.0.0.11:50052");
    assert!((by_node[0].mean_latency_ms - 13.0).abs() < 0.001);
    assert!((by_node[0].max_latency_ms - 22.0).abs() < 0.001);
    assert_eq!(by_node[1].node_id, "25.0.0.10:50051");
    assert!((by_node[1].mean_latency_ms - 6.0).abs() < 0.001);

    let lamport = analysis::max_lamport_over_time(&reports);
    // Five distinct timestamps; the shared first timestamp keeps the max.
    assert_eq!(lamport.len(), 5);
    assert_eq!(lamport[0].max_lamport, 2);
    assert_eq!(lamport.last().unwrap().max_lamport, 8);
}

#[test]
fn test_directory_load_merges_per_node_logs() {
    let dir = tempdir().unwrap();

    let mut node_a = fs::File::create(dir.path().join("node1.csv")).unwrap();
    writeln!(node_a, "timestamp,node_ip,node_port,latency_ms,lamport,leader").unwrap();
    writeln!(node_a, "2024-05-03T12:00:00Z,25.0.0.10,50051,5.0,1,3").unwrap();
    writeln!(node_a, "2024-05-03T12:00:02Z,25.0.0.10,50051,6.0,3,1").unwrap();

    let mut node_b = fs::File::create(dir.path().join("node2.csv")).unwrap();
    writeln!(node_b, "timestamp,node_ip,node_port,latency_ms,lamport,leader").unwrap();
    writeln!(node_b, "2024-05-03T12:00:01Z,25.0.0.11,50052,9.0,2,3").unwrap();
    writeln!(node_b, "2024-05-03T12:00:03Z,25.0.0.11,50052,8.0,4,1").unwrap();

    // A stray non-CSV file is ignored.
    fs::write(dir.path().join("notes.txt"), "not a report log").unwrap();

    let mut reports = store::load_report_dir(dir.path()).unwrap();
    store::sort_reports(&mut reports);

    assert_eq!(reports.len(), 4);
    let nodes: Vec<&str> = reports.iter().map(|r| r.node_id.as_str()).collect();
    assert_eq!(
        nodes,
        vec![
            "25.0.0.10:50051",
            "25.0.0.11:50052",
            "25.0.0.10:50051",
            "25.0.0.11:50052",
        ]
    );

    // The merged timeline sees 3 -> 1 once; only one change, no closed cycle.
    assert!(analysis::extract_election_durations(&reports).is_empty());
    assert_eq!(analysis::detect_leader_changes(&reports).len(), 1);
}

#[test]
fn test_missing_log_is_data_unavailable() {
    let dir = tempdir().unwrap();

    let err = store::load_report_log(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, StoreError::DataUnavailable { .. }));

    let err = store::load_report_dir(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, StoreError::DataUnavailable { .. }));

    // A directory with no CSVs is also unavailable data, not an empty result.
    let err = store::load_report_dir(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::DataUnavailable { .. }));
}

#[test]
fn test_malformed_record_reports_line_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    fs::write(
        &path,
        "timestamp,node_ip,node_port,latency_ms,lamport,leader\n\
         2024-05-03T12:00:00Z,25.0.0.10,50051,5.0,1,3\n\
         2024-05-03T12:00:01Z,25.0.0.10,not-a-port,5.0,2,3\n",
    )
    .unwrap();

    let err = store::load_report_log(&path).unwrap_err();
    match err {
        StoreError::MalformedRecord { line, reason, .. } => {
            assert_eq!(line, 3);
            assert!(reason.contains("node_port"));
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn test_header_only_log_yields_empty_valid_result() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    fs::write(&path, "timestamp,node_ip,node_port,latency_ms,lamport,leader\n").unwrap();

    let reports = store::load_report_log(&path).unwrap();
    assert!(reports.is_empty());

    // Empty input flows through the whole pipeline as a valid no-data case.
    assert!(analysis::extract_election_durations(&reports).is_empty());
    assert!(analysis::election_stats(&[]).is_none());
}

#[test]
fn test_generated_reports_cover_empty_election_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    // One leader change only: a cycle opens but never completes.
    fs::write(
        &path,
        "timestamp,node_ip,node_port,latency_ms,lamport,leader\n\
         2024-05-03T12:00:00Z,25.0.0.10,50051,5.0,1,3\n\
         2024-05-03T12:00:01Z,25.0.0.10,50051,6.0,2,1\n",
    )
    .unwrap();

    let mut reports = store::load_report_log(&path).unwrap();
    store::sort_reports(&mut reports);

    let changes = analysis::detect_leader_changes(&reports);
    let durations = analysis::extract_election_durations(&reports);
    let full = FullMetricsReport {
        metadata: clustermetrics::analysis::types::ReportMetadata {
            analysis_timestamp: "2024-05-03T13:00:00Z".to_string(),
            report_log: path.display().to_string(),
            total_reports: reports.len(),
            total_nodes: 1,
            first_report: reports.first().map(|r| r.timestamp),
            last_report: reports.last().map(|r| r.timestamp),
        },
        election_analysis: Some(clustermetrics::analysis::types::ElectionReport {
            total_leader_changes: changes.len(),
            leader_changes: changes,
            durations_ms: durations
                .iter()
                .map(analysis::election::duration_ms)
                .collect(),
            stats: analysis::election_stats(&durations),
        }),
        latency_analysis: None,
        lamport_analysis: None,
    };

    let json_path = dir.path().join("out").join("report.json");
    let text_path = dir.path().join("out").join("report.txt");
    fs::create_dir_all(dir.path().join("out")).unwrap();
    analysis::generate_json_report(&full, &json_path).unwrap();
    analysis::generate_text_report(&full, &text_path).unwrap();

    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("Leader changes observed: 1"));
    assert!(text.contains("No completed election cycles detected."));

    let parsed: FullMetricsReport =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let elections = parsed.election_analysis.unwrap();
    assert_eq!(elections.total_leader_changes, 1);
    assert!(elections.durations_ms.is_empty());
    assert!(elections.stats.is_none());
}
