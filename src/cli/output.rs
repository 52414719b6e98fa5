//! Report rendering for CLI output

use crate::models::{DirectorySummary, FileRecord, LogSummary};
use crate::services::aggregate::top_n_by_count;
use crate::services::format::{format_percent, format_size};
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::time::{Duration, SystemTime};

/// Number of rows shown for "top N" views
pub const TOP_ROWS: usize = 10;

/// Number of warnings listed individually in text output
const MAX_LISTED_ERRORS: usize = 5;

const BANNER: &str = "========================================";

/// Turns a finished summary into a printable document
pub trait ReportRenderer {
    fn render_directory(&self, summary: &DirectorySummary) -> String;
    fn render_log(&self, summary: &LogSummary) -> String;
}

/// Human-readable aligned text
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

/// Pretty-printed JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

/// Pick a renderer for the requested output mode
#[must_use]
pub fn renderer_for(json: bool) -> Box<dyn ReportRenderer> {
    if json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TextRenderer)
    }
}

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "{title:^40}");
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');
}

fn age_days(reference: SystemTime, modified: SystemTime) -> u64 {
    reference
        .duration_since(modified)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        / 86_400
}

fn write_file_list<'a>(
    out: &mut String,
    title: &str,
    files: impl IntoIterator<Item = &'a FileRecord>,
    reference: SystemTime,
) {
    let _ = writeln!(out, "{title}:");
    for file in files {
        let _ = writeln!(
            out,
            "  {:>12}  {:>6} days  {}",
            format_size(file.size),
            age_days(reference, file.last_modified),
            file.path
        );
    }
    out.push('\n');
}

impl ReportRenderer for TextRenderer {
    fn render_directory(&self, summary: &DirectorySummary) -> String {
        let mut out = String::new();
        banner(&mut out, "FILE SYSTEM ANALYSIS REPORT");

        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "  Root:              {}", summary.root);
        let _ = writeln!(out, "  Total Files:       {}", summary.total_files);
        let _ = writeln!(out, "  Total Directories: {}", summary.total_directories);
        let _ = writeln!(out, "  Total Size:        {}", format_size(summary.total_size));
        out.push('\n');

        let _ = writeln!(out, "File Type Distribution (Top {TOP_ROWS}):");
        let mut types: Vec<_> = summary.type_distribution.iter().collect();
        types.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        for (ext, stats) in types.into_iter().take(TOP_ROWS) {
            let _ = writeln!(
                out,
                "  {ext:<15}: {} files ({})",
                stats.count,
                format_size(stats.total_size)
            );
        }
        out.push('\n');

        let _ = writeln!(out, "Size Distribution:");
        for (bucket, count) in summary.size_buckets() {
            let _ = writeln!(out, "  {:<15}: {count} files", bucket.label());
        }
        out.push('\n');

        let _ = writeln!(out, "Age Distribution:");
        for (bucket, count) in summary.age_buckets() {
            let _ = writeln!(out, "  {:<15}: {count} files", bucket.label());
        }
        out.push('\n');

        let reference = summary.reference_time;
        write_file_list(&mut out, "Largest Files", summary.largest_files.sorted(), reference);
        write_file_list(&mut out, "Oldest Files", summary.oldest_files.sorted(), reference);
        write_file_list(&mut out, "Newest Files", summary.newest_files.sorted(), reference);

        if !summary.errors.is_empty() {
            let _ = writeln!(out, "Warnings: {} entries could not be read", summary.errors.len());
            for error in summary.errors.iter().take(MAX_LISTED_ERRORS) {
                let _ = writeln!(out, "  {} [{}]: {}", error.path, error.code, error.message);
            }
            if summary.errors.len() > MAX_LISTED_ERRORS {
                let _ = writeln!(
                    out,
                    "  ... and {} more",
                    summary.errors.len() - MAX_LISTED_ERRORS
                );
            }
        }

        out
    }

    fn render_log(&self, summary: &LogSummary) -> String {
        let mut out = String::new();
        banner(&mut out, "LOG ANALYSIS REPORT");

        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "  Total Requests:    {}", summary.total_requests);
        let _ = writeln!(out, "  Total Data Sent:   {}", format_size(summary.total_bytes));
        let _ = writeln!(out, "  Unique IPs:        {}", summary.unique_ips);
        let _ = writeln!(out, "  Error Rate:        {}", format_percent(summary.error_rate));
        out.push('\n');

        let _ = writeln!(out, "HTTP Status Distribution:");
        for (status, count) in &summary.status_code_stats {
            let _ = writeln!(out, "  {status}: {count} requests");
        }
        out.push('\n');

        let _ = writeln!(out, "HTTP Method Breakdown:");
        for (method, count) in &summary.method_stats {
            let _ = writeln!(out, "  {method:<10}: {count}");
        }
        out.push('\n');

        let sections = [
            ("Top Endpoints", &summary.endpoint_stats),
            ("Top IP Addresses", &summary.ip_stats),
            ("Top Error Endpoints", &summary.top_errors),
        ];
        for (title, map) in sections {
            let _ = writeln!(out, "{title}:");
            for (key, count) in top_n_by_count(map, Some(TOP_ROWS)) {
                let _ = writeln!(out, "  {key:<30}: {count}");
            }
            out.push('\n');
        }

        if summary.regex_match_count > 0 {
            let _ = writeln!(out, "Regex Pattern Matches: {}", summary.regex_match_count);
            for line in summary.matched_lines.iter().take(TOP_ROWS) {
                let _ = writeln!(out, "  {line}");
            }
        }

        out
    }
}

fn file_json(file: &FileRecord) -> Value {
    json!({
        "path": file.path,
        "size": file.size,
        "extension": file.extension,
        "modified": file.modified_epoch_secs(),
    })
}

fn ranked_json<K: Clone + Ord + ToString>(
    map: &std::collections::BTreeMap<K, u64>,
    key_name: &str,
) -> Value {
    Value::Array(
        top_n_by_count(map, Some(TOP_ROWS))
            .into_iter()
            .map(|(key, count)| {
                let mut row = serde_json::Map::new();
                row.insert(key_name.to_string(), Value::String(key.to_string()));
                row.insert("count".to_string(), Value::from(count));
                Value::Object(row)
            })
            .collect(),
    )
}

impl ReportRenderer for JsonRenderer {
    fn render_directory(&self, summary: &DirectorySummary) -> String {
        let type_distribution: serde_json::Map<String, Value> = summary
            .type_distribution
            .iter()
            .map(|(ext, stats)| {
                (
                    ext.clone(),
                    json!({ "count": stats.count, "size": stats.total_size }),
                )
            })
            .collect();

        let output = json!({
            "root": summary.root,
            "summary": {
                "total_files": summary.total_files,
                "total_directories": summary.total_directories,
                "total_size": summary.total_size,
            },
            "type_distribution": type_distribution,
            "size_distribution": summary
                .size_buckets()
                .map(|(bucket, count)| json!({ "label": bucket.label(), "count": count }))
                .collect::<Vec<_>>(),
            "age_distribution": summary
                .age_buckets()
                .map(|(bucket, count)| json!({ "label": bucket.label(), "count": count }))
                .collect::<Vec<_>>(),
            "largest_files": summary.largest_files.sorted().into_iter().map(file_json).collect::<Vec<_>>(),
            "oldest_files": summary.oldest_files.sorted().into_iter().map(file_json).collect::<Vec<_>>(),
            "newest_files": summary.newest_files.sorted().into_iter().map(file_json).collect::<Vec<_>>(),
            "error_count": summary.errors.len(),
            "errors": summary.errors,
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_log(&self, summary: &LogSummary) -> String {
        let output = json!({
            "summary": {
                "total_requests": summary.total_requests,
                "total_bytes": summary.total_bytes,
                "unique_ips": summary.unique_ips,
                "error_count": summary.error_count,
                "error_rate": summary.error_rate,
            },
            "status_codes": summary.status_code_stats,
            "methods": summary.method_stats,
            "top_endpoints": ranked_json(&summary.endpoint_stats, "endpoint"),
            "top_ips": ranked_json(&summary.ip_stats, "ip"),
            "top_errors": summary.top_errors,
            "pattern_matches": {
                "count": summary.regex_match_count,
                "lines": summary.matched_lines,
            },
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
