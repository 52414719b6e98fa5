//! Access log analysis: line parsing, filtering, pattern search and tallying.

pub mod parse;

use crate::models::{LogRecord, LogSummary, error_rate};
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

/// Maximum number of pattern-matching lines retained verbatim.
pub const MATCHED_LINES_CAP: usize = 100;

/// Declared log format; `Auto` picks a grammar per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Auto,
    Common,
    Combined,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Auto => "auto",
            LogFormat::Common => "common",
            LogFormat::Combined => "combined",
            LogFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(LogFormat::Auto),
            "common" | "apache" | "clf" => Ok(LogFormat::Common),
            "combined" | "nginx" => Ok(LogFormat::Combined),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format '{s}'")),
        }
    }
}

/// Filters and search settings for a log analysis
#[derive(Debug, Clone, Default)]
pub struct LogFilterOptions {
    /// Not applied yet: timestamps are kept as raw text.
    pub start_time: Option<SystemTime>,
    /// Not applied yet: timestamps are kept as raw text.
    pub end_time: Option<SystemTime>,
    /// Keep only these status codes; empty keeps all.
    pub status_codes: Vec<u16>,
    /// Case-insensitive regex searched in every raw line.
    pub pattern_regex: Option<String>,
    /// Keep only responses with status >= 400.
    pub error_only: bool,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

/// Streams lines through the parsers and folds the survivors into a [`LogSummary`].
#[derive(Debug)]
pub struct LogAnalyzer {
    format: LogFormat,
    status_codes: HashSet<u16>,
    error_only: bool,
    pattern: Option<Regex>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl LogAnalyzer {
    /// Validate options and compile the search pattern.
    ///
    /// # Errors
    /// `Error::InvalidPattern` if `pattern_regex` is not a valid regex.
    pub fn new(format: LogFormat, opts: &LogFilterOptions) -> Result<Self> {
        let pattern = match opts.pattern_regex.as_deref() {
            Some(raw) if !raw.is_empty() => Some(
                RegexBuilder::new(raw)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::InvalidPattern {
                        pattern: raw.to_string(),
                        message: e.to_string(),
                    })?,
            ),
            _ => None,
        };

        if opts.start_time.is_some() || opts.end_time.is_some() {
            log::warn!("Time range filtering is not supported; start/end times are ignored");
        }

        Ok(Self {
            format,
            status_codes: opts.status_codes.iter().copied().collect(),
            error_only: opts.error_only,
            pattern,
            cancel_flag: opts.cancel_flag.clone(),
        })
    }

    /// Analyze the file at `path`, decoding invalid UTF-8 lossily.
    ///
    /// # Errors
    /// `Error::Io` if the file cannot be opened or a read fails,
    /// `Error::Cancelled` if the cancel flag was raised.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<LogSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            log::error!("Could not open log file {}: {e}", path.display());
            Error::Io(e)
        })?;

        let mut reader = BufReader::new(file);
        let mut accumulator = LogAccumulator::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            self.check_cancelled()?;

            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            let line = String::from_utf8_lossy(&buf);
            self.ingest(&mut accumulator, &line);
        }

        Ok(accumulator.finish())
    }

    /// Analyze an in-memory sequence of lines.
    ///
    /// # Errors
    /// `Error::Cancelled` if the cancel flag was raised.
    pub fn analyze_lines<I, S>(&self, lines: I) -> Result<LogSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accumulator = LogAccumulator::default();

        for line in lines {
            self.check_cancelled()?;
            self.ingest(&mut accumulator, line.as_ref());
        }

        Ok(accumulator.finish())
    }

    /// Fold one raw line: pattern search first, then parse, filter and tally.
    pub fn ingest(&self, accumulator: &mut LogAccumulator, raw: &str) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(pattern) = &self.pattern
            && pattern.is_match(line)
        {
            accumulator.record_match(line);
        }

        let Some(record) = parse::parse_line(self.format, line) else {
            accumulator.skipped_lines += 1;
            return;
        };

        if self.passes_filters(&record) {
            accumulator.tally(&record);
        }
    }

    /// Every active filter must accept the record.
    #[must_use]
    pub fn passes_filters(&self, record: &LogRecord) -> bool {
        if self.error_only && !record.is_error() {
            return false;
        }

        self.status_codes.is_empty() || self.status_codes.contains(&record.status_code)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel_flag {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Mutable fold state for one analysis.
#[derive(Debug, Default)]
pub struct LogAccumulator {
    summary: LogSummary,
    distinct_ips: HashSet<String>,
    skipped_lines: u64,
}

impl LogAccumulator {
    pub fn record_match(&mut self, line: &str) {
        self.summary.regex_match_count += 1;
        if self.summary.matched_lines.len() < MATCHED_LINES_CAP {
            self.summary.matched_lines.push(line.to_string());
        }
    }

    pub fn tally(&mut self, record: &LogRecord) {
        let summary = &mut self.summary;
        summary.total_requests += 1;
        summary.total_bytes += record.body_bytes_sent;

        if !self.distinct_ips.contains(&record.ip) {
            self.distinct_ips.insert(record.ip.clone());
        }

        *summary.ip_stats.entry(record.ip.clone()).or_insert(0) += 1;
        *summary
            .endpoint_stats
            .entry(record.endpoint.clone())
            .or_insert(0) += 1;
        *summary
            .status_code_stats
            .entry(record.status_code)
            .or_insert(0) += 1;
        *summary.method_stats.entry(record.method.clone()).or_insert(0) += 1;

        if record.is_error() {
            summary.error_count += 1;
            *summary.top_errors.entry(record.endpoint.clone()).or_insert(0) += 1;
        }
    }

    /// Derive rates and cardinalities and hand back the finished summary.
    #[must_use]
    pub fn finish(self) -> LogSummary {
        let mut summary = self.summary;
        summary.unique_ips = self.distinct_ips.len() as u64;
        summary.error_rate = error_rate(summary.error_count, summary.total_requests);

        log::debug!(
            "Log analysis: {} requests tallied, {} lines skipped, {} pattern matches",
            summary.total_requests,
            self.skipped_lines,
            summary.regex_match_count
        );

        summary
    }
}
