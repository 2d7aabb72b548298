//! File operations executor
//!
//! Every write goes through [`ensure_parent`] first, so a file can be
//! mirrored even when its directory was never visited on this run.

use std::fs;
use std::path::Path;

use filetime::FileTime;

use super::SyncResult;
use super::actions::{SkipReason, SyncAction};
use super::reporting::{Reporter, SyncEvent};
use crate::error::TransformError;
use crate::transform::{
    AuditHit, FileKind, StripMode, Transformers, decode_source, find_calls, find_strings,
};

/// Which read-only audits run on source files
#[derive(Debug, Clone, Default)]
pub struct AuditSettings {
    /// List call sites of `function`
    pub calls: bool,
    /// List string literals
    pub strings: bool,
    /// Function name for the call audit
    pub function: String,
}

impl AuditSettings {
    /// Whether any audit is enabled
    #[must_use]
    pub const fn any(&self) -> bool {
        self.calls || self.strings
    }
}

/// Executes sync actions against the target tree
pub struct FileOperationExecutor {
    dry_run: bool,
    mode: StripMode,
    transformers: Transformers,
    audits: AuditSettings,
}

impl FileOperationExecutor {
    /// Create a new executor
    #[must_use]
    pub const fn new(
        dry_run: bool,
        mode: StripMode,
        transformers: Transformers,
        audits: AuditSettings,
    ) -> Self {
        Self {
            dry_run,
            mode,
            transformers,
            audits,
        }
    }

    /// Execute a sync action
    ///
    /// In dry-run mode the same events are reported and counted, but nothing
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read, decoded or written.
    pub fn execute(
        &self,
        action: &SyncAction,
        result: &mut SyncResult,
        reporter: &mut dyn Reporter,
    ) -> Result<(), TransformError> {
        match action {
            SyncAction::CreateDir { dest } => {
                reporter.report(SyncEvent::CreatingDir {
                    target: dest.clone(),
                });
                if !self.dry_run {
                    fs::create_dir_all(dest).map_err(|source| TransformError::CreateDir {
                        path: dest.clone(),
                        source,
                    })?;
                }
                result.dirs_created += 1;
            }
            SyncAction::Copy { source, dest } => {
                reporter.report(SyncEvent::Copying {
                    source: source.clone(),
                    target: dest.clone(),
                });
                if !self.dry_run {
                    Self::copy_file(source, dest)?;
                }
                result.copied += 1;
            }
            SyncAction::Transform { source, dest, kind } => {
                self.transform_file(source, dest, *kind, reporter)?;
                result.transformed += 1;
            }
            SyncAction::Skip { path, reason } => {
                tracing::debug!(path = %path.display(), ?reason, "skip");
                if *reason == SkipReason::Unchanged {
                    result.unchanged += 1;
                }
            }
        }
        Ok(())
    }

    /// Run the enabled audits on a source file and report the hits
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn audit(&self, source: &Path, reporter: &mut dyn Reporter) -> Result<(), TransformError> {
        if !self.audits.any() {
            return Ok(());
        }

        let text = decode_source(&read(source)?, source)?;
        if self.audits.calls {
            let hits = find_calls(&text, &self.audits.function);
            Self::report_audit(
                reporter,
                format!("{} statements", self.audits.function),
                source,
                hits,
            );
        }
        if self.audits.strings {
            Self::report_audit(reporter, "Strings".to_string(), source, find_strings(&text));
        }
        Ok(())
    }

    fn report_audit(
        reporter: &mut dyn Reporter,
        title: String,
        source: &Path,
        hits: Vec<AuditHit>,
    ) {
        reporter.report(SyncEvent::Audit {
            title,
            source: source.to_path_buf(),
            hits,
        });
    }

    fn transform_file(
        &self,
        source: &Path,
        dest: &Path,
        kind: FileKind,
        reporter: &mut dyn Reporter,
    ) -> Result<(), TransformError> {
        let bytes = read(source)?;
        let text = match kind {
            FileKind::Source => {
                reporter.report(SyncEvent::Stripping {
                    mode: self.mode,
                    source: source.to_path_buf(),
                });
                decode_source(&bytes, source)?
            }
            FileKind::Document | FileKind::Plain => {
                String::from_utf8(bytes).map_err(|_| TransformError::Decode {
                    path: source.to_path_buf(),
                    encoding: "utf-8",
                })?
            }
        };

        let output = match self.transformers.for_kind(kind) {
            Some(transformer) => transformer.transform(&text),
            None => text,
        };

        reporter.report(SyncEvent::Writing {
            source: source.to_path_buf(),
            target: dest.to_path_buf(),
        });
        if !self.dry_run {
            ensure_parent(dest)?;
            fs::write(dest, output).map_err(|source| TransformError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Copy bytes and carry over access and modification times
    fn copy_file(source: &Path, dest: &Path) -> Result<(), TransformError> {
        let copy_err = |e| TransformError::Copy {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            source: e,
        };

        ensure_parent(dest)?;
        fs::copy(source, dest).map_err(copy_err)?;

        let metadata = fs::metadata(source).map_err(copy_err)?;
        filetime::set_file_times(
            dest,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )
        .map_err(copy_err)?;

        Ok(())
    }
}

fn read(path: &Path) -> Result<Vec<u8>, TransformError> {
    fs::read(path).map_err(|source| TransformError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(dest: &Path) -> Result<(), TransformError> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| TransformError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
