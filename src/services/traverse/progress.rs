//! Progress reporting primitives for traversal strategies.

use crate::models::ProgressSnapshot;
use std::time::{Duration, Instant};

const BYTE_TRIGGER: u64 = 256 * 1024 * 1024;
const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Running counters for a traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounters {
    pub files: u64,
    pub bytes: u64,
    pub directories: u64,
}

/// Time/byte-based throttler governing progress event emission.
#[derive(Debug)]
pub struct ProgressThrottler {
    interval: Duration,
    byte_trigger: u64,
    last_emit: Option<Instant>,
    last_emit_bytes: u64,
}

impl Default for ProgressThrottler {
    fn default() -> Self {
        Self::with_interval(Duration::from_secs(2))
    }
}

impl ProgressThrottler {
    /// Construct a throttler with the supplied minimum interval (clamped to 100ms).
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            byte_trigger: BYTE_TRIGGER,
            last_emit: None,
            last_emit_bytes: 0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consider emitting a snapshot for the current counters.
    ///
    /// The first call only arms the throttler; later calls emit once the
    /// interval has elapsed or enough bytes have been processed since the
    /// previous emission.
    pub fn consider(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        elapsed_ms: u64,
    ) -> Option<ProgressSnapshot> {
        let Some(last_emit) = self.last_emit else {
            self.last_emit = Some(now);
            self.last_emit_bytes = counters.bytes;
            return None;
        };

        let elapsed = now.saturating_duration_since(last_emit);
        let bytes_delta = counters.bytes.saturating_sub(self.last_emit_bytes);

        if elapsed >= self.interval || bytes_delta >= self.byte_trigger {
            return Some(self.emit(now, counters, elapsed_ms));
        }

        None
    }

    /// Emit a final snapshot regardless of thresholds.
    pub fn force_emit(
        &mut self,
        now: Instant,
        counters: ProgressCounters,
        elapsed_ms: u64,
    ) -> ProgressSnapshot {
        self.emit(now, counters, elapsed_ms)
    }

    fn emit(&mut self, now: Instant, counters: ProgressCounters, elapsed_ms: u64) -> ProgressSnapshot {
        self.last_emit = Some(now);
        self.last_emit_bytes = counters.bytes;

        ProgressSnapshot {
            elapsed_ms,
            files_processed: counters.files,
            bytes_processed: counters.bytes,
            directories_processed: counters.directories,
        }
    }
}
