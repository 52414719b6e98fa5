//! Traversal dispatcher and strategy coordination layer.
//!
//! The dispatcher selects a backend (portable `read_dir` or POSIX `openat`)
//! based on the platform and user overrides. All backends share one
//! [`TraversalContext`], which enforces the invariants common to every walk:
//!
//! - Hidden entries and excluded globs are skipped together with their subtree.
//! - Subdirectories are counted when discovered and descended into only while
//!   within `max_depth`.
//! - Symbolic links are opaque unless `follow_symlinks` is set, in which case
//!   directory cycles are cut by (device, inode).
//! - A failure on one entry is recorded as a warning and never aborts the walk.

pub mod context;
pub mod filter;
pub mod legacy;
pub mod posix;
pub mod progress;
pub mod strategy;

pub use context::{TraversalContext, Visit, normalize_path};

use crate::{DirectoryOptions, Result};
use std::path::Path;
use strategy::TraversalStrategy;

/// Enumeration of available traversal strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Portable traversal used as fallback and regression oracle.
    #[default]
    Legacy,
    /// POSIX traversal leveraging `openat`/`getdents64`.
    Posix,
}

impl StrategyKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Legacy => "legacy",
            StrategyKind::Posix => "posix",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "legacy" | "std" => Some(StrategyKind::Legacy),
            "posix" | "unix" => Some(StrategyKind::Posix),
            _ => None,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StrategyKind::from_label(s).ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Preferred strategy for the current host.
#[must_use]
pub fn default_strategy() -> StrategyKind {
    if posix::PosixTraversal::is_available() {
        StrategyKind::Posix
    } else {
        StrategyKind::Legacy
    }
}

/// Traversal dispatcher responsible for selecting and executing the appropriate strategy.
#[derive(Debug, Clone, Copy)]
pub struct TraversalDispatcher {
    strategy: StrategyKind,
    explicit_override: bool,
}

impl Default for TraversalDispatcher {
    fn default() -> Self {
        Self::with_strategy(default_strategy(), false)
    }
}

impl TraversalDispatcher {
    #[must_use]
    pub fn with_strategy(strategy: StrategyKind, explicit_override: bool) -> Self {
        Self {
            strategy,
            explicit_override,
        }
    }

    /// Honour an explicit override from the options, else use the platform default.
    #[must_use]
    pub fn for_options(opts: &DirectoryOptions) -> Self {
        opts.strategy_override
            .map_or_else(Self::default, |kind| Self::with_strategy(kind, true))
    }

    /// Strategy that will actually run once platform support is considered.
    #[must_use]
    pub fn active_strategy(&self) -> StrategyKind {
        Self::ensure_supported(self.strategy)
    }

    /// Execute traversal for the supplied root path using the configured strategy.
    ///
    /// # Errors
    /// Propagates `Error::Cancelled`; per-entry I/O failures are recorded in the context.
    pub fn traverse(&self, root: &Path, context: &mut TraversalContext) -> Result<()> {
        let resolved = self.active_strategy();

        if self.explicit_override && resolved != self.strategy {
            log::warn!(
                "Requested traversal strategy '{}' unsupported; falling back to '{}'",
                self.strategy,
                resolved,
            );
        }

        let backend: &dyn TraversalStrategy = match resolved {
            StrategyKind::Legacy => &legacy::LegacyTraversal,
            StrategyKind::Posix => &posix::PosixTraversal,
        };

        context.set_strategy(backend.kind());
        log::debug!("Traversing {} with {} strategy", root.display(), backend.kind());
        backend.traverse(root, context)
    }

    fn ensure_supported(kind: StrategyKind) -> StrategyKind {
        match kind {
            StrategyKind::Posix if posix::PosixTraversal.is_supported() => StrategyKind::Posix,
            _ => StrategyKind::Legacy,
        }
    }
}
