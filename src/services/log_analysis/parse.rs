//! Line grammars for access logs.
//!
//! Each grammar is a [`LineParser`] variant returning `Option<LogRecord>`;
//! [`parse_line`] picks the candidate parsers for a line with a cheap
//! structural check and takes the first one that succeeds.

use super::LogFormat;
use crate::models::LogRecord;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// `<addr> <ident> <user> [<ts>] "<method> <path> <proto>" <status> <bytes|-> ["<referer>" "<ua>"]`
static ACCESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+) \S+ \S+ \[([^\]]+)\] "(\S+) (\S+) \S+" (\d+) (\d+|-)(?: "([^"]*)" "([^"]*)")?"#,
    )
    .expect("access log grammar is a valid regex")
});

/// The closed set of line grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineParser {
    /// One JSON object per line.
    Structured,
    /// Apache/Nginx common log format; a combined-format trailer is accepted.
    Common,
    /// Apache/Nginx combined log format; the referer/user-agent trailer is required.
    Combined,
}

impl LineParser {
    /// Parsers to try, in order, for `line` under the declared `format`.
    #[must_use]
    pub fn candidates(format: LogFormat, line: &str) -> &'static [LineParser] {
        match format {
            LogFormat::Auto if line.starts_with('{') => &[LineParser::Structured, LineParser::Common],
            LogFormat::Auto | LogFormat::Common => &[LineParser::Common],
            LogFormat::Combined => &[LineParser::Combined],
            LogFormat::Json => &[LineParser::Structured],
        }
    }

    #[must_use]
    pub fn parse(self, line: &str) -> Option<LogRecord> {
        match self {
            LineParser::Structured => parse_structured(line),
            LineParser::Common => parse_access(line, false),
            LineParser::Combined => parse_access(line, true),
        }
    }
}

/// Parse one raw line, returning `None` when no candidate grammar accepts it.
#[must_use]
pub fn parse_line(format: LogFormat, line: &str) -> Option<LogRecord> {
    if line.is_empty() {
        return None;
    }

    LineParser::candidates(format, line)
        .iter()
        .find_map(|parser| parser.parse(line))
}

fn parse_access(line: &str, require_trailer: bool) -> Option<LogRecord> {
    let caps = ACCESS_LINE.captures(line)?;

    if require_trailer && caps.get(7).is_none() {
        return None;
    }

    let status_code = caps[5].parse::<u16>().ok()?;
    let body_bytes_sent = match &caps[6] {
        "-" => 0,
        bytes => bytes.parse::<u64>().ok()?,
    };

    let capture = |idx: usize| caps.get(idx).map_or_else(String::new, |m| m.as_str().to_string());

    Some(LogRecord {
        ip: caps[1].to_string(),
        timestamp: caps[2].to_string(),
        method: caps[3].to_string(),
        endpoint: caps[4].to_string(),
        status_code,
        body_bytes_sent,
        referer: capture(7),
        user_agent: capture(8),
    })
}

fn parse_structured(line: &str) -> Option<LogRecord> {
    let value: Value = serde_json::from_str(line).ok()?;
    let obj = value.as_object()?;

    let status_code = u16::try_from(number_field(obj, &["status", "status_code"])).ok()?;

    Some(LogRecord {
        ip: text_field(obj, &["ip"]),
        timestamp: text_field(obj, &["timestamp", "time"]),
        method: text_field(obj, &["method"]),
        endpoint: text_field(obj, &["endpoint", "url"]),
        status_code,
        body_bytes_sent: number_field(obj, &["size", "bytes"]),
        referer: text_field(obj, &["referer"]),
        user_agent: text_field(obj, &["user_agent"]),
    })
}

/// First present key wins; absent keys and nulls become an empty string.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match keys.iter().find_map(|k| obj.get(*k)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// First present key wins; absent or non-numeric values become zero.
///
/// Integral floats such as `500.0` are accepted.
fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> u64 {
    match keys.iter().find_map(|k| obj.get(*k)) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| integral_f64(n.as_f64()?)).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn integral_f64(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}
