//! Snapshot building over the source tree
//!
//! A snapshot maps every non-excluded file under the source root, keyed by
//! its `/`-separated relative path, to the metadata used for change
//! detection. Directories are structural and never recorded.
//!
//! When symlinks are not followed, symlinked directories are not descended
//! into and symlinked files are recorded with the link's own metadata. This
//! is platform-dependent: on Windows, link metadata carries the link's own
//! timestamps rather than the target's.

mod filters;


use std::collections::BTreeMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

pub use filters::{EntryFilter, to_posix};

use crate::comparison::TimestampComparator;
use crate::error::Result;

/// Lightweight file metadata used for change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Modification time in nanoseconds since the Unix epoch
    pub mtime_ns: i64,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Capture a record from file metadata
    ///
    /// # Errors
    ///
    /// Returns an error if the modification time is unavailable.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            mtime_ns: TimestampComparator::mtime_ns(metadata)?,
            size: metadata.len(),
        })
    }
}

/// Relative path to file record, ordered for deterministic output
pub type Snapshot = BTreeMap<String, FileRecord>;

/// Walks a source root, honouring the entry filter
pub struct Scanner<'a> {
    filter: &'a EntryFilter,
    follow_symlinks: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner
    #[must_use]
    pub const fn new(filter: &'a EntryFilter, follow_symlinks: bool) -> Self {
        Self {
            filter,
            follow_symlinks,
        }
    }

    /// All non-excluded entries under `root`, parents before children
    ///
    /// Excluded directories are pruned, so nothing below them is visited.
    pub fn entries<'r>(
        &self,
        root: &'r Path,
    ) -> impl Iterator<Item = walkdir::Result<DirEntry>> + use<'a, 'r> {
        let filter = self.filter;
        WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                relative_path(root, entry.path())
                    .is_none_or(|rel| !filter.is_excluded(&rel, entry.file_type().is_dir()))
            })
    }

    /// Build a snapshot of every file under `root`
    ///
    /// Entries that cannot be resolved, such as a dangling link when links
    /// are followed, are left out with a warning. The transform walk meets
    /// the same entries again and reports them as per-file errors.
    ///
    /// # Errors
    ///
    /// Returns an error only if `root` itself cannot be read.
    pub fn snapshot(&self, root: &Path) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();

        for entry in self.entries(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| format!("Failed to walk {}", root.display()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let file_type = entry.file_type();

            if file_type.is_dir() {
                continue;
            }
            // Unfollowed link to a directory: not descended, not recorded
            if file_type.is_symlink() && entry.path().is_dir() {
                tracing::debug!(path = %entry.path().display(), "skipping directory symlink");
                continue;
            }

            let Some(rel) = relative_path(root, entry.path()) else {
                continue;
            };
            let record = match entry
                .metadata()
                .map_err(anyhow::Error::from)
                .and_then(|metadata| FileRecord::from_metadata(&metadata))
            {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "skipping unstattable entry"
                    );
                    continue;
                }
            };

            snapshot.insert(to_posix(&rel), record);
        }

        tracing::debug!(files = snapshot.len(), root = %root.display(), "snapshot built");
        Ok(snapshot)
    }
}

/// Path of `path` relative to `root`
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}
