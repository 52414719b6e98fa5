//! File and Log Statistics Library
//!
//! This library collects descriptive statistics over two kinds of input:
//! directory trees (file counts, extension mix, size and age histograms,
//! largest/oldest/newest files) and web server access logs (request, status,
//! method and endpoint tallies, error rates, pattern search). Both pipelines
//! stream their records through an aggregator that keeps bounded state and
//! hand back an immutable summary for rendering.

pub mod cli;
pub mod models;
pub mod services;

pub use models::{DirectorySummary, ErrorItem, FileRecord, LogRecord, LogSummary, ProgressSnapshot};
pub use services::log_analysis::{LogFilterOptions, LogFormat};
pub use services::traverse::StrategyKind;

use std::fmt;
use std::path::Path;
use std::result;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    InvalidPattern { pattern: String, message: String },
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern '{pattern}': {message}")
            }
            Error::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Callback receiving throttled progress snapshots during traversal
pub type ProgressNotifier = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Options for analyzing a directory tree
#[derive(Clone)]
pub struct DirectoryOptions {
    /// Deepest directory level to descend into (root is 0); `None` is unlimited.
    pub max_depth: Option<u32>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Files strictly smaller than this are ignored entirely.
    pub min_size_threshold: u64,
    pub skip_hidden: bool,
    pub follow_symlinks: bool,
    pub strategy_override: Option<StrategyKind>,
    /// Instant file ages are measured against; defaults to the start of the call.
    pub reference_time: Option<SystemTime>,
    pub progress_interval: Duration,
    pub progress_notifier: Option<ProgressNotifier>,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            min_size_threshold: 0,
            skip_hidden: true,
            follow_symlinks: false,
            strategy_override: None,
            reference_time: None,
            progress_interval: Duration::from_secs(2),
            progress_notifier: None,
            cancel_flag: None,
        }
    }
}

impl fmt::Debug for DirectoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryOptions")
            .field("max_depth", &self.max_depth)
            .field("include_patterns", &self.include_patterns)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("min_size_threshold", &self.min_size_threshold)
            .field("skip_hidden", &self.skip_hidden)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("strategy_override", &self.strategy_override)
            .field("reference_time", &self.reference_time)
            .field("progress_interval", &self.progress_interval)
            .field("progress_notifier", &self.progress_notifier.is_some())
            .field("cancel_flag", &self.cancel_flag)
            .finish()
    }
}

/// Walk a directory tree and return its statistics
///
/// # Arguments
/// * `root` - The directory to analyze
/// * `opts` - Traversal and filtering options
///
/// # Errors
/// `InvalidInput` if `root` is missing or not a directory, `InvalidPattern` for
/// a malformed include/exclude glob, `Cancelled` if the cancel flag was raised.
/// Inaccessible entries below the root are reported in `DirectorySummary::errors`.
pub fn analyze_directory<P: AsRef<Path>>(
    root: P,
    opts: &DirectoryOptions,
) -> Result<DirectorySummary> {
    let root = root.as_ref();
    let root_display = services::traverse::normalize_path(root);

    if !root.exists() {
        return Err(Error::InvalidInput(format!(
            "Path does not exist: {root_display}"
        )));
    }

    if !root.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Path is not a directory: {root_display}"
        )));
    }

    let mut context = services::traverse::TraversalContext::new(root, opts)?;
    let dispatcher = services::traverse::TraversalDispatcher::for_options(opts);
    dispatcher.traverse(root, &mut context)?;

    let strategy = context.strategy();
    let summary = context.finish();
    log::debug!(
        "Analyzed {root_display} ({strategy}): {} files, {} directories, {} bytes, {} warnings",
        summary.total_files,
        summary.total_directories,
        summary.total_size,
        summary.errors.len()
    );

    Ok(summary)
}

/// Analyze an access log file line by line
///
/// # Errors
/// `Io` if the file cannot be opened or read, `InvalidPattern` for a malformed
/// search pattern, `Cancelled` if the cancel flag was raised.
pub fn analyze_log_file<P: AsRef<Path>>(
    path: P,
    format: LogFormat,
    opts: &LogFilterOptions,
) -> Result<LogSummary> {
    services::log_analysis::LogAnalyzer::new(format, opts)?.analyze_file(path)
}

/// Analyze an in-memory sequence of log lines
///
/// # Errors
/// `InvalidPattern` for a malformed search pattern, `Cancelled` if the cancel
/// flag was raised.
pub fn analyze_log_lines<I, S>(lines: I, format: LogFormat, opts: &LogFilterOptions) -> Result<LogSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    services::log_analysis::LogAnalyzer::new(format, opts)?.analyze_lines(lines)
}
