//! Unit tests for hidden-entry and glob filtering

use filestat::services::traverse::filter::EntryFilter;
use filestat::{DirectoryOptions, Error};

fn filter(include: &[&str], exclude: &[&str], skip_hidden: bool) -> EntryFilter {
    let opts = DirectoryOptions {
        include_patterns: include.iter().map(|s| s.to_string()).collect(),
        exclude_patterns: exclude.iter().map(|s| s.to_string()).collect(),
        skip_hidden,
        ..DirectoryOptions::default()
    };
    EntryFilter::from_options(&opts).expect("patterns should compile")
}

#[test]
fn hidden_entries_are_skipped_by_default() {
    let f = filter(&[], &[], true);
    assert!(!f.allows_entry(".git", ".git"));
    assert!(!f.allows_entry(".env", "config/.env"));
    assert!(f.allows_entry("src", "src"));

    let show_all = filter(&[], &[], false);
    assert!(show_all.allows_entry(".git", ".git"));
}

#[test]
fn exclude_matches_name_or_relative_path() {
    let f = filter(&[], &["node_modules", "build/*.o"], false);

    assert!(!f.allows_entry("node_modules", "web/node_modules"));
    assert!(!f.allows_entry("main.o", "build/main.o"));
    assert!(f.allows_entry("main.o", "src/main.o"));
    assert!(f.allows_entry("build", "build"));
}

#[test]
fn include_only_restricts_files() {
    let f = filter(&["*.rs"], &[], false);

    assert!(f.allows_file("lib.rs", "src/lib.rs"));
    assert!(!f.allows_file("README.md", "README.md"));

    let everything = filter(&[], &[], false);
    assert!(everything.allows_file("README.md", "README.md"));
}

#[test]
fn invalid_glob_is_reported() {
    let opts = DirectoryOptions {
        exclude_patterns: vec!["[".to_string()],
        ..DirectoryOptions::default()
    };

    match EntryFilter::from_options(&opts) {
        Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "["),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}
