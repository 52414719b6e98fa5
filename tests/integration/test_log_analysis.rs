//! Integration tests for access log analysis

use crate::fixtures::{TWO_LINE_LOG, write_file_sync};
use filestat::services::log_analysis::MATCHED_LINES_CAP;
use filestat::{LogFilterOptions, LogFormat};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

const MIXED_LOG: &str = r#"192.168.1.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 1024 "-" "curl/8.0"
192.168.1.2 - - [10/Oct/2023:13:55:37 +0000] "POST /api/login HTTP/1.1" 401 64 "-" "Mozilla/5.0"
{"ip":"10.0.0.9","method":"GET","endpoint":"/api/items","status":500,"size":10}
this line is not a log entry
192.168.1.1 - - [10/Oct/2023:13:55:39 +0000] "GET /index.html HTTP/1.1" 304 -
192.168.1.3 - - [10/Oct/2023:13:55:40 +0000] "DELETE /api/items/7 HTTP/1.1" 404 0
"#;

fn options() -> LogFilterOptions {
    LogFilterOptions::default()
}

#[test]
fn two_line_scenario() {
    let summary = filestat::analyze_log_lines(TWO_LINE_LOG, LogFormat::Auto, &options()).unwrap();

    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.unique_ips, 1);
    assert!((summary.error_rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(summary.total_bytes, 100);

    let expected: BTreeMap<String, u64> = [("/b".to_string(), 1)].into_iter().collect();
    assert_eq!(summary.top_errors, expected);
}

#[test]
fn structured_line_is_tallied() {
    let line = r#"{"ip":"9.9.9.9","status":500,"endpoint":"/x","size":10}"#;
    let summary = filestat::analyze_log_lines([line], LogFormat::Auto, &options()).unwrap();

    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.status_code_stats[&500], 1);
    assert_eq!(summary.total_bytes, 10);
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.top_errors["/x"], 1);
}

#[test]
fn unparseable_lines_still_count_pattern_matches() {
    let opts = LogFilterOptions {
        pattern_regex: Some("TIMEOUT".to_string()),
        ..options()
    };
    let lines = [
        "upstream timeout while reading",
        r#"1.2.3.4 - - [x] "GET /a HTTP/1.1" 200 100"#,
    ];
    let summary = filestat::analyze_log_lines(lines, LogFormat::Auto, &opts).unwrap();

    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.regex_match_count, 1);
    assert_eq!(summary.matched_lines, vec!["upstream timeout while reading"]);
}

#[test]
fn empty_stream_has_zero_error_rate() {
    let summary =
        filestat::analyze_log_lines(["", "garbage", "{}x"], LogFormat::Auto, &options()).unwrap();

    assert_eq!(summary.total_requests, 0);
    assert!(summary.error_rate.abs() < f64::EPSILON);
    assert_eq!(summary.unique_ips, 0);
}

#[test]
fn unique_ips_ignore_repeats() {
    let lines: Vec<String> = (0..50)
        .map(|i| format!(r#"10.0.0.{} - - [x] "GET /p HTTP/1.1" 200 1"#, i % 3))
        .collect();
    let summary = filestat::analyze_log_lines(&lines, LogFormat::Common, &options()).unwrap();

    assert_eq!(summary.total_requests, 50);
    assert_eq!(summary.unique_ips, 3);
    assert_eq!(summary.ip_stats.values().sum::<u64>(), 50);
}

#[test]
fn matched_lines_are_capped() {
    let lines: Vec<String> = (0..150).map(|i| format!("match {i}")).collect();
    let opts = LogFilterOptions {
        pattern_regex: Some("match".to_string()),
        ..options()
    };
    let summary = filestat::analyze_log_lines(&lines, LogFormat::Auto, &opts).unwrap();

    assert_eq!(summary.regex_match_count, 150);
    assert_eq!(summary.matched_lines.len(), MATCHED_LINES_CAP);
    assert_eq!(summary.matched_lines[0], "match 0");
}

#[test]
fn status_and_error_filters_apply_after_parsing() {
    let lines: Vec<&str> = MIXED_LOG.lines().collect();

    let errors_only = LogFilterOptions {
        error_only: true,
        ..options()
    };
    let summary = filestat::analyze_log_lines(&lines, LogFormat::Auto, &errors_only).unwrap();
    assert_eq!(summary.total_requests, 3);
    assert_eq!(summary.error_count, 3);
    assert!((summary.error_rate - 1.0).abs() < f64::EPSILON);

    let only_200 = LogFilterOptions {
        status_codes: vec![200, 304],
        ..options()
    };
    let summary = filestat::analyze_log_lines(&lines, LogFormat::Auto, &only_200).unwrap();
    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.unique_ips, 1);
    assert_eq!(summary.endpoint_stats["/index.html"], 2);
}

#[test]
fn analyzes_file_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("access.log");
    // CRLF endings and an invalid UTF-8 byte must not break parsing.
    let mut contents = MIXED_LOG.replace('\n', "\r\n").into_bytes();
    contents.extend_from_slice(b"\xff\xfe broken bytes\n");
    write_file_sync(&path, &contents).unwrap();

    let summary = filestat::analyze_log_file(&path, LogFormat::Auto, &options()).unwrap();

    assert_eq!(summary.total_requests, 5);
    assert_eq!(summary.total_bytes, 1024 + 64 + 10);
    assert_eq!(summary.unique_ips, 4);
    assert_eq!(summary.error_count, 3);
    assert!((summary.error_rate - 0.6).abs() < 1e-9);
    assert_eq!(summary.method_stats["GET"], 3);
    assert_eq!(summary.status_code_stats[&304], 1);
    assert_eq!(summary.top_errors["/api/login"], 1);
}

#[test]
fn declared_format_restricts_grammar() {
    let lines: Vec<&str> = MIXED_LOG.lines().collect();

    let json_only = filestat::analyze_log_lines(&lines, LogFormat::Json, &options()).unwrap();
    assert_eq!(json_only.total_requests, 1);

    let combined = filestat::analyze_log_lines(&lines, LogFormat::Combined, &options()).unwrap();
    assert_eq!(combined.total_requests, 2);
}

#[test]
fn raised_cancel_flag_aborts() {
    let opts = LogFilterOptions {
        cancel_flag: Some(Arc::new(AtomicBool::new(true))),
        ..options()
    };
    let result = filestat::analyze_log_lines(TWO_LINE_LOG, LogFormat::Auto, &opts);
    assert!(matches!(result, Err(filestat::Error::Cancelled)));
}
