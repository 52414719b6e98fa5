//! Hidden-entry and glob include/exclude filtering

use crate::{DirectoryOptions, Error, Result};
use glob::Pattern;

/// Compiled entry filter built once per traversal.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    skip_hidden: bool,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl EntryFilter {
    /// Compile the filter from options.
    ///
    /// # Errors
    /// `Error::InvalidPattern` for the first glob that fails to parse.
    pub fn from_options(opts: &DirectoryOptions) -> Result<Self> {
        Ok(Self {
            skip_hidden: opts.skip_hidden,
            include: compile(&opts.include_patterns)?,
            exclude: compile(&opts.exclude_patterns)?,
        })
    }

    #[must_use]
    pub fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    /// Whether an entry (file or directory) may be visited at all.
    ///
    /// `relative` is the path below the traversal root using `/` separators.
    #[must_use]
    pub fn allows_entry(&self, name: &str, relative: &str) -> bool {
        if self.skip_hidden && Self::is_hidden(name) {
            return false;
        }

        !any_match(&self.exclude, name, relative)
    }

    /// Whether a regular file passes the include list (empty list accepts all).
    #[must_use]
    pub fn allows_file(&self, name: &str, relative: &str) -> bool {
        self.include.is_empty() || any_match(&self.include, name, relative)
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|e| Error::InvalidPattern {
                pattern: raw.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn any_match(patterns: &[Pattern], name: &str, relative: &str) -> bool {
    patterns
        .iter()
        .any(|p| p.matches(name) || p.matches(relative))
}
