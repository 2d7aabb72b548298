//! Sync action determination logic

use std::path::PathBuf;

use crate::comparison::ChangeSet;
use crate::config::Config;
use crate::transform::FileKind;

/// Why an entry needs no work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// File unchanged since the last recorded run
    Unchanged,
    /// Mirrored directory already present
    DirectoryExists,
    /// Symlink to a directory while links are not followed
    DirectorySymlink,
}

/// Sync action to perform for one source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Create the mirrored directory
    CreateDir {
        /// Destination directory path
        dest: PathBuf,
    },
    /// Strip comments and write the result
    Transform {
        /// Source file path
        source: PathBuf,
        /// Destination file path
        dest: PathBuf,
        /// Source or document
        kind: FileKind,
    },
    /// Copy byte for byte
    Copy {
        /// Source file path
        source: PathBuf,
        /// Destination file path
        dest: PathBuf,
    },
    /// Nothing to do
    Skip {
        /// Path being skipped
        path: PathBuf,
        /// Reason for skipping
        reason: SkipReason,
    },
}

/// Resolves walked entries into sync actions
pub struct SyncActionResolver<'a> {
    config: &'a Config,
    changes: &'a ChangeSet,
    replace_all: bool,
}

impl<'a> SyncActionResolver<'a> {
    /// Create a resolver; `replace_all` processes every file regardless of changes
    #[must_use]
    pub const fn new(config: &'a Config, changes: &'a ChangeSet, replace_all: bool) -> Self {
        Self {
            config,
            changes,
            replace_all,
        }
    }

    /// Action for a directory entry
    #[must_use]
    pub fn resolve_dir(dest: PathBuf) -> SyncAction {
        if dest.is_dir() {
            SyncAction::Skip {
                path: dest,
                reason: SkipReason::DirectoryExists,
            }
        } else {
            SyncAction::CreateDir { dest }
        }
    }

    /// Action for a file entry keyed by its `/`-separated relative path
    #[must_use]
    pub fn resolve_file(&self, source: PathBuf, dest: PathBuf, rel_key: &str) -> SyncAction {
        if !self.replace_all && !self.changes.needs_processing(rel_key) {
            return SyncAction::Skip {
                path: source,
                reason: SkipReason::Unchanged,
            };
        }

        match FileKind::of(&source, self.config) {
            FileKind::Plain => SyncAction::Copy { source, dest },
            kind => SyncAction::Transform { source, dest, kind },
        }
    }
}
