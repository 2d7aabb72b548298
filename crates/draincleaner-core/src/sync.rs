//! Incremental mirroring engine
//!
//! Mirrors a source tree into a target tree, stripping comments from
//! source and document files and copying everything else. Only files that
//! are new or modified since the last recorded run are reprocessed unless
//! `replace_all` is set.

mod actions;
mod executor;
mod orchestrator;
mod reporting;


// Public exports for CLI integration
pub use actions::{SkipReason, SyncAction, SyncActionResolver};
pub use executor::{AuditSettings, FileOperationExecutor};
pub use orchestrator::{SyncEngine, check_target_placement, resolve_roots};
pub use reporting::{
    CollectingReporter, ConsoleReporter, Reporter, SyncEvent, generate_summary, strip_ansi,
};

/// Behaviour switches for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SyncOptions {
    /// Report everything but write nothing, not even the metadata record
    pub dry_run: bool,
    /// Strip every comment instead of only marked ones
    pub remove_all: bool,
    /// Reprocess every file regardless of recorded changes
    pub replace_all: bool,
    /// Follow symbolic links while walking the source
    pub follow_symlinks: bool,
    /// Audit call sites of the configured function
    pub show_prints: bool,
    /// Audit string literals
    pub show_strings: bool,
}

/// Synchronization result with statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Files classified as new
    pub new: usize,
    /// Files classified as modified
    pub modified: usize,
    /// Files classified as removed
    pub removed: usize,
    /// Target directories created
    pub dirs_created: usize,
    /// Files written through a comment stripper
    pub transformed: usize,
    /// Files copied byte for byte
    pub copied: usize,
    /// Files skipped because they did not change
    pub unchanged: usize,
    /// Per-file errors encountered
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.dirs_created + self.transformed + self.copied
    }

    /// Whether sync was successful (no errors)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
