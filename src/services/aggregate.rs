//! Streaming aggregation of discovered files into a [`DirectorySummary`]

use crate::models::{DirectorySummary, ErrorItem, FileRecord};
use crate::services::classify::{age_bucket, size_bucket};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Folds [`FileRecord`]s one at a time into a summary it exclusively owns.
#[derive(Debug)]
pub struct DirectoryAggregator {
    summary: DirectorySummary,
    min_size_threshold: u64,
}

impl DirectoryAggregator {
    #[must_use]
    pub fn new(root: impl Into<String>, reference_time: SystemTime, min_size_threshold: u64) -> Self {
        Self {
            summary: DirectorySummary::new(root, reference_time),
            min_size_threshold,
        }
    }

    /// Whether a file of this size takes part in the statistics at all.
    #[must_use]
    pub fn accepts_size(&self, size: u64) -> bool {
        size >= self.min_size_threshold
    }

    /// Fold one file into the running statistics.
    ///
    /// Returns `false` (and changes nothing) when the file is below the size threshold.
    pub fn fold(&mut self, record: FileRecord) -> bool {
        if !self.accepts_size(record.size) {
            log::trace!(
                "Below size threshold: {} ({} < {})",
                record.path,
                record.size,
                self.min_size_threshold
            );
            return false;
        }

        let summary = &mut self.summary;
        summary.total_files += 1;
        summary.total_size += record.size;

        let ext = summary
            .type_distribution
            .entry(record.extension.clone())
            .or_default();
        ext.count += 1;
        ext.total_size += record.size;

        let size_slot = size_bucket(record.size).index();
        let age_slot = age_bucket(summary.reference_time, record.last_modified).index();
        summary.size_histogram[size_slot] += 1;
        summary.age_distribution[age_slot] += 1;

        log::trace!("Folded {} ({} bytes)", record.path, record.size);

        summary.largest_files.offer(record.clone());
        summary.oldest_files.offer(record.clone());
        summary.newest_files.offer(record);
        true
    }

    /// Count a subdirectory discovered below the root.
    pub fn record_directory(&mut self) {
        self.summary.total_directories += 1;
    }

    pub fn record_error(&mut self, error: ErrorItem) {
        self.summary.errors.push(error);
    }

    #[must_use]
    pub fn summary(&self) -> &DirectorySummary {
        &self.summary
    }

    #[must_use]
    pub fn finish(self) -> DirectorySummary {
        self.summary
    }
}

/// Sort a count map by count descending (key ascending on ties) and keep the top `n`.
#[must_use]
pub fn top_n_by_count<K: Clone + Ord>(map: &BTreeMap<K, u64>, n: Option<usize>) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();

    // BTreeMap iteration is key-ordered and sort_by is stable, so ties stay key-ascending.
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    if let Some(n) = n {
        entries.truncate(n);
    }

    entries
}
