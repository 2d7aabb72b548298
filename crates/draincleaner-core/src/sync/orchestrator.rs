//! Sync orchestration - coordinates the sync workflow
//!
//! One run is: load the previous record, snapshot the source, classify,
//! persist the new snapshot, then walk the source again and mirror every
//! entry into the target. Configuration problems abort before the first
//! snapshot; per-file problems are reported and the walk goes on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::SyncResult;
use super::SyncOptions;
use super::actions::{SkipReason, SyncAction, SyncActionResolver};
use super::executor::{AuditSettings, FileOperationExecutor};
use super::reporting::{Reporter, SyncEvent};
use crate::comparison::{ChangeClassifier, ChangeKind, ChangeSet};
use crate::config::{Config, ConfigValidator, IgnoreMatcher};
use crate::error::{ConfigError, Result};
use crate::metadata::{MetadataRecord, MetadataStore, SaveOutcome};
use crate::scanner::{EntryFilter, Scanner, Snapshot, relative_path, to_posix};
use crate::transform::{FileKind, StripMode, Transformers};

/// Main sync engine
pub struct SyncEngine {
    config: Config,
    options: SyncOptions,
    executor: FileOperationExecutor,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a marker
    /// pattern fails to compile.
    pub fn new(config: Config, options: SyncOptions) -> Result<Self> {
        ConfigValidator::validate(&config)?;

        let mode = StripMode::from_remove_all(options.remove_all);
        let transformers = Transformers::new(&config, mode)?;
        let audits = AuditSettings {
            calls: options.show_prints,
            strings: options.show_strings,
            function: config.audit_function.clone(),
        };
        let executor = FileOperationExecutor::new(options.dry_run, mode, transformers, audits);

        Ok(Self {
            config,
            options,
            executor,
        })
    }

    /// Execute the sync operation
    ///
    /// # Errors
    ///
    /// Returns an error if the roots are invalid, the ignore file is missing
    /// or malformed, the source cannot be snapshotted, or the metadata
    /// record cannot be saved. Per-file failures are collected in
    /// [`SyncResult::errors`] instead.
    pub fn sync(
        &self,
        source_root: &Path,
        target_root: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<SyncResult> {
        let (source_root, target_root) = resolve_roots(source_root, target_root)?;

        let matcher = IgnoreMatcher::from_file(&source_root, &self.config.ignore_file)?;
        tracing::debug!(patterns = matcher.len(), "ignore rules loaded");
        let filter = EntryFilter::new(&self.config, matcher);
        check_target_placement(&source_root, &target_root, &filter)?;
        let scanner = Scanner::new(&filter, self.options.follow_symlinks);

        let mut result = SyncResult::default();

        let store = MetadataStore::new(&source_root, &self.config, self.options.dry_run);
        let previous = store.load()?;
        let current = scanner.snapshot(&source_root)?;
        let changes = ChangeClassifier::classify(&previous.files, &current);
        Self::report_changes(&changes, &current, &mut result, reporter);

        let outcome = store.save(&MetadataRecord { files: current })?;
        if matches!(outcome, SaveOutcome::Saved { initialized: true }) {
            reporter.report(SyncEvent::MetadataInitialized {
                path: store.dir().to_path_buf(),
            });
        }

        self.ensure_target_root(&target_root, reporter)?;

        let resolver = SyncActionResolver::new(&self.config, &changes, self.options.replace_all);
        for entry in scanner.entries(&source_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    record_error(&mut result, reporter, e.to_string());
                    continue;
                }
            };
            let Some(rel) = relative_path(&source_root, entry.path()) else {
                continue;
            };
            let source = entry.path().to_path_buf();
            let dest = target_root.join(&rel);
            let file_type = entry.file_type();

            let action = if file_type.is_dir() {
                SyncActionResolver::resolve_dir(dest)
            } else if file_type.is_symlink() && source.is_dir() {
                SyncAction::Skip {
                    path: source.clone(),
                    reason: SkipReason::DirectorySymlink,
                }
            } else {
                resolver.resolve_file(source.clone(), dest, &to_posix(&rel))
            };

            if let Err(e) = self.executor.execute(&action, &mut result, reporter) {
                record_error(&mut result, reporter, e.to_string());
            }

            if !file_type.is_dir() && FileKind::of(&source, &self.config) == FileKind::Source {
                if let Err(e) = self.executor.audit(&source, reporter) {
                    record_error(&mut result, reporter, e.to_string());
                }
            }
        }

        tracing::info!(
            transformed = result.transformed,
            copied = result.copied,
            errors = result.errors.len(),
            "sync finished"
        );
        reporter.report(SyncEvent::Summary {
            result: result.clone(),
            dry_run: self.options.dry_run,
        });

        Ok(result)
    }

    fn report_changes(
        changes: &ChangeSet,
        current: &Snapshot,
        result: &mut SyncResult,
        reporter: &mut dyn Reporter,
    ) {
        for rel in current.keys() {
            let kind = changes.kind_of(rel);
            if kind == ChangeKind::Unchanged {
                continue;
            }
            reporter.report(SyncEvent::Classified {
                kind,
                rel_path: rel.clone(),
            });
        }
        for rel in &changes.removed {
            reporter.report(SyncEvent::Classified {
                kind: ChangeKind::Removed,
                rel_path: rel.clone(),
            });
        }

        result.new = changes.new.len();
        result.modified = changes.modified.len();
        result.removed = changes.removed.len();
    }

    fn ensure_target_root(&self, target_root: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        if target_root.is_dir() {
            return Ok(());
        }
        reporter.report(SyncEvent::CreatingDir {
            target: target_root.to_path_buf(),
        });
        if !self.options.dry_run {
            fs::create_dir_all(target_root).with_context(|| {
                format!("Failed to create target directory: {}", target_root.display())
            })?;
        }
        Ok(())
    }
}

fn record_error(result: &mut SyncResult, reporter: &mut dyn Reporter, message: String) {
    tracing::debug!(%message, "per-file failure");
    reporter.report(SyncEvent::Error {
        message: message.clone(),
    });
    result.errors.push(message);
}

/// Validate both roots and return the canonical source with an absolute target
///
/// # Errors
///
/// Returns an error if the source is not a directory or the target exists
/// but is not a directory.
pub fn resolve_roots(source_root: &Path, target_root: &Path) -> Result<(PathBuf, PathBuf)> {
    if !source_root.is_dir() {
        return Err(ConfigError::InvalidSource {
            path: source_root.to_path_buf(),
        }
        .into());
    }
    if target_root.exists() && !target_root.is_dir() {
        return Err(ConfigError::InvalidTarget {
            path: target_root.to_path_buf(),
        }
        .into());
    }

    let source = dunce::canonicalize(source_root)
        .with_context(|| format!("Failed to resolve source path: {}", source_root.display()))?;
    let target = resolve_target(target_root)
        .with_context(|| format!("Failed to resolve target path: {}", target_root.display()))?;

    Ok((source, target))
}

/// Reject a target nested in the source unless the walk never enters it
///
/// Both roots must already be resolved by [`resolve_roots`].
///
/// # Errors
///
/// Returns an error if the target is the source root, or lies below it in
/// a directory that `filter` does not exclude.
pub fn check_target_placement(
    source_root: &Path,
    target_root: &Path,
    filter: &EntryFilter,
) -> Result<()> {
    let Ok(rel) = target_root.strip_prefix(source_root) else {
        return Ok(());
    };
    if rel.as_os_str().is_empty() || !filter.is_excluded(rel, true) {
        return Err(ConfigError::TargetInsideSource {
            source_root: source_root.to_path_buf(),
            target: target_root.to_path_buf(),
        }
        .into());
    }
    tracing::debug!(path = %target_root.display(), "target nested in an excluded directory");
    Ok(())
}

/// Canonicalize the deepest existing ancestor and re-append the rest
fn resolve_target(target: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(target)?;

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }

    let mut resolved = dunce::canonicalize(existing)?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
