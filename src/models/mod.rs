//! Data models shared by the aggregators and the renderers

use crate::services::classify::{AgeBucket, SizeBucket};
use crate::services::top_k::{LargestFirst, NewestFirst, OldestFirst, TopK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// A regular file discovered during traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub size: u64,
    pub extension: String,
    pub last_modified: SystemTime,
}

impl FileRecord {
    /// Modification time as whole seconds since the Unix epoch (negative if earlier).
    #[must_use]
    pub fn modified_epoch_secs(&self) -> i64 {
        match self.last_modified.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
        }
    }
}

/// Per-extension counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionStats {
    pub count: u64,
    pub total_size: u64,
}

/// A non-fatal problem encountered while walking the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

/// Point-in-time traversal progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub elapsed_ms: u64,
    pub files_processed: u64,
    pub bytes_processed: u64,
    pub directories_processed: u64,
}

/// Statistics accumulated over a directory tree
#[derive(Debug, Clone)]
pub struct DirectorySummary {
    pub root: String,
    pub total_files: u64,
    pub total_directories: u64,
    pub total_size: u64,
    pub type_distribution: BTreeMap<String, ExtensionStats>,
    pub size_histogram: [u64; SizeBucket::COUNT],
    pub age_distribution: [u64; AgeBucket::COUNT],
    pub largest_files: TopK<FileRecord, LargestFirst>,
    pub oldest_files: TopK<FileRecord, OldestFirst>,
    pub newest_files: TopK<FileRecord, NewestFirst>,
    pub errors: Vec<ErrorItem>,
    /// The "now" every file age was measured against.
    pub reference_time: SystemTime,
}

impl DirectorySummary {
    #[must_use]
    pub fn new(root: impl Into<String>, reference_time: SystemTime) -> Self {
        Self {
            root: root.into(),
            total_files: 0,
            total_directories: 0,
            total_size: 0,
            type_distribution: BTreeMap::new(),
            size_histogram: [0; SizeBucket::COUNT],
            age_distribution: [0; AgeBucket::COUNT],
            largest_files: TopK::new(),
            oldest_files: TopK::new(),
            newest_files: TopK::new(),
            errors: Vec::new(),
            reference_time,
        }
    }

    /// Size histogram in bucket order.
    pub fn size_buckets(&self) -> impl Iterator<Item = (SizeBucket, u64)> + '_ {
        SizeBucket::ALL
            .iter()
            .map(|bucket| (*bucket, self.size_histogram[bucket.index()]))
    }

    /// Age histogram in bucket order.
    pub fn age_buckets(&self) -> impl Iterator<Item = (AgeBucket, u64)> + '_ {
        AgeBucket::ALL
            .iter()
            .map(|bucket| (*bucket, self.age_distribution[bucket.index()]))
    }

    /// Combine two summaries computed over disjoint parts of a tree.
    ///
    /// The receiver keeps its own root and reference time.
    pub fn merge(&mut self, other: DirectorySummary) {
        self.total_files += other.total_files;
        self.total_directories += other.total_directories;
        self.total_size += other.total_size;

        for (ext, stats) in other.type_distribution {
            let entry = self.type_distribution.entry(ext).or_default();
            entry.count += stats.count;
            entry.total_size += stats.total_size;
        }

        for (mine, theirs) in self.size_histogram.iter_mut().zip(other.size_histogram) {
            *mine += theirs;
        }
        for (mine, theirs) in self
            .age_distribution
            .iter_mut()
            .zip(other.age_distribution)
        {
            *mine += theirs;
        }

        self.largest_files.merge(other.largest_files);
        self.oldest_files.merge(other.oldest_files);
        self.newest_files.merge(other.newest_files);
        self.errors.extend(other.errors);
    }
}

/// One parsed access-log line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub ip: String,
    pub timestamp: String,
    pub method: String,
    pub endpoint: String,
    pub status_code: u16,
    pub body_bytes_sent: u64,
    pub referer: String,
    pub user_agent: String,
}

impl LogRecord {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// Statistics accumulated over a log stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub total_requests: u64,
    pub total_bytes: u64,
    pub unique_ips: u64,
    pub ip_stats: BTreeMap<String, u64>,
    pub endpoint_stats: BTreeMap<String, u64>,
    pub status_code_stats: BTreeMap<u16, u64>,
    pub method_stats: BTreeMap<String, u64>,
    pub error_count: u64,
    pub error_rate: f64,
    /// Endpoint -> number of responses with status >= 400
    pub top_errors: BTreeMap<String, u64>,
    pub matched_lines: Vec<String>,
    pub regex_match_count: u64,
}

impl LogSummary {
    /// Combine two summaries computed over disjoint parts of a stream.
    ///
    /// Derived fields are recomputed; `matched_lines` stays capped at `match_cap`.
    pub fn merge(&mut self, other: LogSummary, match_cap: usize) {
        self.total_requests += other.total_requests;
        self.total_bytes += other.total_bytes;
        self.error_count += other.error_count;
        self.regex_match_count += other.regex_match_count;

        add_counts(&mut self.ip_stats, other.ip_stats);
        add_counts(&mut self.endpoint_stats, other.endpoint_stats);
        add_counts(&mut self.status_code_stats, other.status_code_stats);
        add_counts(&mut self.method_stats, other.method_stats);
        add_counts(&mut self.top_errors, other.top_errors);

        let room = match_cap.saturating_sub(self.matched_lines.len());
        self.matched_lines
            .extend(other.matched_lines.into_iter().take(room));

        self.unique_ips = self.ip_stats.len() as u64;
        self.error_rate = error_rate(self.error_count, self.total_requests);
    }
}

/// Errors divided by requests, `0.0` when there were no requests.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn error_rate(errors: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        errors as f64 / total as f64
    }
}

fn add_counts<K: Ord>(into: &mut BTreeMap<K, u64>, from: BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}
