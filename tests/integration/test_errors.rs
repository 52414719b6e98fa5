//! Integration test for error handling

use crate::fixtures::write_file_sync;
use filestat::{DirectoryOptions, Error, LogFilterOptions, LogFormat};
use tempfile::TempDir;

#[test]
fn test_nonexistent_root() {
    let result = filestat::analyze_directory("/nonexistent/path/12345", &DirectoryOptions::default());

    match result {
        Err(Error::InvalidInput(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_file_as_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plain.txt");
    write_file_sync(&file, b"not a directory").unwrap();

    match filestat::analyze_directory(&file, &DirectoryOptions::default()) {
        Err(Error::InvalidInput(msg)) => assert!(msg.contains("not a directory")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_invalid_glob_fails_before_walking() {
    let temp_dir = TempDir::new().unwrap();
    let opts = DirectoryOptions {
        include_patterns: vec!["src/[".to_string()],
        ..DirectoryOptions::default()
    };

    let result = filestat::analyze_directory(temp_dir.path(), &opts);
    assert!(matches!(result, Err(Error::InvalidPattern { .. })));
}

#[test]
fn test_missing_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = filestat::analyze_log_file(
        temp_dir.path().join("missing.log"),
        LogFormat::Auto,
        &LogFilterOptions::default(),
    );

    match result {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_invalid_regex() {
    let opts = LogFilterOptions {
        pattern_regex: Some("(unclosed".to_string()),
        ..LogFilterOptions::default()
    };

    match filestat::analyze_log_lines(["x"], LogFormat::Auto, &opts) {
        Err(Error::InvalidPattern { pattern, message }) => {
            assert_eq!(pattern, "(unclosed");
            assert!(!message.is_empty());
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::InvalidPattern {
        pattern: "[".to_string(),
        message: "bad".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid pattern '[': bad");
    assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");

    let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(std::error::Error::source(&io).is_some());
}
