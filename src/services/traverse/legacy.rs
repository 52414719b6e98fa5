//! Portable traversal built on `std::fs::read_dir`.
//! Acts as the fallback strategy when the POSIX backend is unavailable or
//! explicitly disabled.

use super::context::Visit;
use super::strategy::TraversalStrategy;
use super::{StrategyKind, TraversalContext};
use crate::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyTraversal;

impl TraversalStrategy for LegacyTraversal {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Legacy
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn traverse(&self, root: &Path, context: &mut TraversalContext) -> Result<()> {
        traverse_recursive(root, 0, context)
    }
}

fn traverse_recursive(current: &Path, depth: u32, context: &mut TraversalContext) -> Result<()> {
    let entries = match fs::read_dir(current) {
        Ok(e) => e,
        Err(e) => {
            context.record_error(current, &e);
            return Ok(());
        }
    };

    for entry in entries {
        context.check_cancelled()?;

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                context.record_error(current, &e);
                continue;
            }
        };

        let entry_path = entry.path();
        if context.visit(&entry_path, depth + 1) == Visit::Descend {
            traverse_recursive(&entry_path, depth + 1, context)?;
        }
    }

    log::debug!("Finished directory {} (depth {depth})", current.display());
    context.register_directory_progress();
    Ok(())
}
