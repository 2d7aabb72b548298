//! Entry exclusion shared by the snapshot walk and the transform walk

use std::path::{Component, Path};

use crate::config::{Config, IgnoreMatcher};

/// Decides which entries under the source root take part in a run
#[derive(Debug)]
pub struct EntryFilter {
    metadata_dir: String,
    ignore_file: String,
    matcher: IgnoreMatcher,
}

impl EntryFilter {
    /// Create a filter from the reserved names and compiled ignore rules
    #[must_use]
    pub fn new(config: &Config, matcher: IgnoreMatcher) -> Self {
        Self {
            metadata_dir: config.metadata_dir.clone(),
            ignore_file: config.ignore_file.clone(),
            matcher,
        }
    }

    /// Check if an entry should be skipped
    ///
    /// `rel_path` is relative to the source root.
    #[must_use]
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        if self.is_reserved(rel_path) {
            return true;
        }
        if !is_dir && rel_path == Path::new(&self.ignore_file) {
            return true;
        }
        self.matcher.is_ignored(rel_path, is_dir)
    }

    /// Whether any component of `rel_path` is the reserved metadata directory
    #[must_use]
    pub fn is_reserved(&self, rel_path: &Path) -> bool {
        rel_path
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == self.metadata_dir.as_str()))
    }
}

/// Render a relative path with `/` separators
#[must_use]
pub fn to_posix(rel_path: &Path) -> String {
    rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
