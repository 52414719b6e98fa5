//! Per-call traversal state shared by every strategy

use super::StrategyKind;
use super::filter::EntryFilter;
use super::progress::{ProgressCounters, ProgressThrottler};
use crate::models::{DirectorySummary, ErrorItem, FileRecord};
use crate::services::aggregate::DirectoryAggregator;
use crate::services::classify::normalize_extension;
use crate::{DirectoryOptions, Error, ProgressNotifier, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Outcome of visiting one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// The entry is a directory the strategy should descend into.
    Descend,
    /// Nothing further to do for this entry.
    Done,
}

/// Directory identity used to cut symlink cycles (device, inode)
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct FileId {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn file_id_from_metadata(metadata: &fs::Metadata) -> Option<FileId> {
    Some(FileId {
        dev: metadata.dev(),
        ino: metadata.ino(),
    })
}

#[cfg(not(unix))]
fn file_id_from_metadata(_metadata: &fs::Metadata) -> Option<FileId> {
    None
}

/// Traversal context: options, filters, the aggregator and progress state
pub struct TraversalContext {
    root: PathBuf,
    max_depth: Option<u32>,
    follow_symlinks: bool,
    filter: EntryFilter,
    aggregator: DirectoryAggregator,
    visited_dirs: HashSet<FileId>,
    strategy: StrategyKind,
    cancel_flag: Option<Arc<AtomicBool>>,
    counters: ProgressCounters,
    throttler: ProgressThrottler,
    notifier: Option<ProgressNotifier>,
    start_instant: Instant,
}

impl TraversalContext {
    /// Prepare a traversal rooted at `root`.
    ///
    /// # Errors
    /// `Error::InvalidPattern` if an include/exclude glob does not compile.
    pub fn new(root: &Path, opts: &DirectoryOptions) -> Result<Self> {
        let filter = EntryFilter::from_options(opts)?;
        let reference_time = opts.reference_time.unwrap_or_else(SystemTime::now);

        let mut visited_dirs = HashSet::new();
        if opts.follow_symlinks
            && let Ok(metadata) = fs::metadata(root)
            && let Some(id) = file_id_from_metadata(&metadata)
        {
            visited_dirs.insert(id);
        }

        Ok(Self {
            root: root.to_path_buf(),
            max_depth: opts.max_depth,
            follow_symlinks: opts.follow_symlinks,
            filter,
            aggregator: DirectoryAggregator::new(
                normalize_path(root),
                reference_time,
                opts.min_size_threshold,
            ),
            visited_dirs,
            strategy: StrategyKind::Legacy,
            cancel_flag: opts.cancel_flag.clone(),
            counters: ProgressCounters::default(),
            throttler: ProgressThrottler::with_interval(opts.progress_interval),
            notifier: opts.progress_notifier.clone(),
            start_instant: Instant::now(),
        })
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn summary(&self) -> &DirectorySummary {
        self.aggregator.summary()
    }

    /// Return `Err(Error::Cancelled)` once the caller has raised the cancel flag.
    pub fn check_cancelled(&self) -> Result<()> {
        match &self.cancel_flag {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    /// Whether a directory at `depth` (root is 0) may be descended into.
    #[must_use]
    pub fn within_depth(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }

    /// Classify one entry found inside a directory and fold it if it is a file.
    ///
    /// `depth` is the depth of the entry itself; children of the root are at depth 1.
    pub fn visit(&mut self, path: &Path, depth: u32) -> Visit {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative = self.relative_path(path);

        if !self.filter.allows_entry(&name, &relative) {
            log::trace!("Filtered out: {relative}");
            return Visit::Done;
        }

        let mut metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) => {
                self.record_error(path, &e);
                return Visit::Done;
            }
        };

        if metadata.is_symlink() {
            if !self.follow_symlinks {
                log::trace!("Not following symlink: {}", path.display());
                return Visit::Done;
            }
            metadata = match fs::metadata(path) {
                Ok(m) => m,
                Err(e) => {
                    self.record_error(path, &e);
                    return Visit::Done;
                }
            };
        }

        if metadata.is_dir() {
            let dir_id = if self.follow_symlinks {
                file_id_from_metadata(&metadata)
            } else {
                None
            };

            // A link back to a walked directory is neither counted nor descended.
            if let Some(id) = dir_id
                && self.visited_dirs.contains(&id)
            {
                log::debug!("Directory already visited, skipping: {}", path.display());
                return Visit::Done;
            }

            self.aggregator.record_directory();

            if !self.within_depth(depth) {
                log::trace!("Depth limit reached at {}", path.display());
                return Visit::Done;
            }

            if let Some(id) = dir_id {
                self.visited_dirs.insert(id);
            }

            return Visit::Descend;
        }

        if metadata.is_file() && self.filter.allows_file(&name, &relative) {
            self.fold_file(path, &metadata);
        }

        Visit::Done
    }

    fn fold_file(&mut self, path: &Path, metadata: &fs::Metadata) {
        let size = metadata.len();
        if !self.aggregator.accepts_size(size) {
            return;
        }

        let last_modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                self.record_error(path, &e);
                return;
            }
        };

        let record = FileRecord {
            path: normalize_path(path),
            size,
            extension: normalize_extension(path),
            last_modified,
        };

        if self.aggregator.fold(record) {
            self.counters.files += 1;
            self.counters.bytes = self.counters.bytes.saturating_add(size);
            self.maybe_emit_progress();
        }
    }

    /// Record a non-fatal error encountered during traversal
    pub fn record_error(&mut self, path: &Path, error: &io::Error) {
        let code = match error.kind() {
            io::ErrorKind::NotFound => "ENOENT",
            io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        log::warn!("Skipping {}: {error}", path.display());

        self.aggregator.record_error(ErrorItem {
            path: normalize_path(path),
            code: code.to_string(),
            message: error.to_string(),
        });
    }

    /// Register a fully processed directory and consider emitting progress.
    pub fn register_directory_progress(&mut self) {
        self.counters.directories += 1;
        self.maybe_emit_progress();
    }

    fn maybe_emit_progress(&mut self) {
        if self.notifier.is_none() {
            return;
        }

        let now = Instant::now();
        let elapsed_ms = self.elapsed_ms(now);
        if let Some(snapshot) = self.throttler.consider(now, self.counters, elapsed_ms)
            && let Some(notifier) = &self.notifier
        {
            notifier(&snapshot);
        }
    }

    fn elapsed_ms(&self, now: Instant) -> u64 {
        let millis = now
            .checked_duration_since(self.start_instant)
            .unwrap_or_default()
            .as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map_or_else(|_| normalize_path(path), normalize_path)
    }

    /// Emit the final progress snapshot and hand back the summary.
    #[must_use]
    pub fn finish(mut self) -> DirectorySummary {
        if let Some(notifier) = &self.notifier {
            let now = Instant::now();
            let elapsed_ms = self.elapsed_ms(now);
            let snapshot = self.throttler.force_emit(now, self.counters, elapsed_ms);
            notifier(&snapshot);
        }

        self.aggregator.finish()
    }
}

/// Normalize path for cross-platform display
/// On Windows: Convert backslashes to forward slashes for consistency
/// On Unix: Use path as-is (backslash is a valid filename character)
#[cfg(windows)]
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(not(windows))]
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
