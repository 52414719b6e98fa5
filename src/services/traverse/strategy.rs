//! Strategy trait for filesystem traversal backends.

use super::{StrategyKind, TraversalContext};
use crate::Result;
use std::path::Path;

/// Common interface implemented by traversal backends.
///
/// A strategy only decides how directory entries are enumerated; every entry
/// it finds is handed to [`TraversalContext::visit`], which owns filtering and
/// aggregation, so all strategies produce the same summary.
pub trait TraversalStrategy {
    /// Identify the strategy for logging and diagnostics.
    fn kind(&self) -> StrategyKind;

    /// Whether the backend can run on this platform.
    fn is_supported(&self) -> bool;

    /// Walk the tree below `root`, folding every entry into `context`.
    fn traverse(&self, root: &Path, context: &mut TraversalContext) -> Result<()>;
}
