//! Pure classification of file sizes, file ages and extensions into fixed buckets

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Label used for files whose name carries no extension.
pub const NO_EXTENSION: &str = "no-extension";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Size histogram buckets, ordered smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeBucket {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 5] = [
        SizeBucket::Tiny,
        SizeBucket::Small,
        SizeBucket::Medium,
        SizeBucket::Large,
        SizeBucket::Huge,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Tiny => "0-1KB",
            SizeBucket::Small => "1KB-1MB",
            SizeBucket::Medium => "1MB-100MB",
            SizeBucket::Large => "100MB-1GB",
            SizeBucket::Huge => "1GB+",
        }
    }

    /// Position of the bucket inside [`SizeBucket::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Age histogram buckets, ordered youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBucket {
    Today,
    ThisWeek,
    ThisMonth,
    Older,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Today,
        AgeBucket::ThisWeek,
        AgeBucket::ThisMonth,
        AgeBucket::Older,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Today => "Today",
            AgeBucket::ThisWeek => "This Week",
            AgeBucket::ThisMonth => "This Month",
            AgeBucket::Older => "Older",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Classify a byte count using half-open intervals
/// `[0,1K) [1K,1M) [1M,100M) [100M,1G) [1G,inf)`.
#[must_use]
pub fn size_bucket(bytes: u64) -> SizeBucket {
    if bytes < KIB {
        SizeBucket::Tiny
    } else if bytes < MIB {
        SizeBucket::Small
    } else if bytes < 100 * MIB {
        SizeBucket::Medium
    } else if bytes < GIB {
        SizeBucket::Large
    } else {
        SizeBucket::Huge
    }
}

/// Classify the age of a file relative to `now`.
///
/// Files modified after `now` (clock skew, future timestamps) land in
/// [`AgeBucket::Today`].
#[must_use]
pub fn age_bucket(now: SystemTime, last_modified: SystemTime) -> AgeBucket {
    let age = now.duration_since(last_modified).unwrap_or(Duration::ZERO);

    if age < DAY {
        AgeBucket::Today
    } else if age < 7 * DAY {
        AgeBucket::ThisWeek
    } else if age < 30 * DAY {
        AgeBucket::ThisMonth
    } else {
        AgeBucket::Older
    }
}

/// Extension of `path` including the leading dot, or [`NO_EXTENSION`].
///
/// Dotfiles such as `.bashrc` have no extension.
#[must_use]
pub fn normalize_extension<P: AsRef<Path>>(path: P) -> String {
    match path.as_ref().extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => NO_EXTENSION.to_string(),
    }
}
