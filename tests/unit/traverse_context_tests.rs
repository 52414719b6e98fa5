//! Unit tests for traversal error mapping

use filestat::DirectoryOptions;
use filestat::services::traverse::TraversalContext;
use std::io;
use std::path::Path;
use tempfile::TempDir;

fn context(root: &Path) -> TraversalContext {
    TraversalContext::new(root, &DirectoryOptions::default()).unwrap()
}

#[test]
fn permission_denied_maps_to_eacces() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(temp_dir.path());
    let locked = temp_dir.path().join("locked");

    ctx.record_error(&locked, &io::Error::from(io::ErrorKind::PermissionDenied));

    let errors = &ctx.summary().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "EACCES");
    assert!(errors[0].path.ends_with("locked"));
    assert!(!errors[0].message.is_empty());
}

#[test]
fn error_kinds_map_to_codes() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(temp_dir.path());

    ctx.record_error(Path::new("gone"), &io::Error::from(io::ErrorKind::NotFound));
    ctx.record_error(Path::new("odd"), &io::Error::other("device hiccup"));

    let codes: Vec<_> = ctx.summary().errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, ["ENOENT", "IO"]);
    assert_eq!(ctx.summary().errors[1].message, "device hiccup");
}

#[test]
fn recorded_errors_survive_finish() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(temp_dir.path());
    ctx.record_error(Path::new("x"), &io::Error::from(io::ErrorKind::PermissionDenied));

    let summary = ctx.finish();
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.total_files, 0);
}
