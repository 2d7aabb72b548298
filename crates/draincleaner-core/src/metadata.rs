//! Persisted snapshot storage
//!
//! The previous run's snapshot lives at
//! `<source_root>/<metadata_dir>/<metadata_file>` as
//! `{"files": {"<rel>": {"mtime_ns": .., "size": ..}}}`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::Snapshot;

/// The persisted record of one source root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Snapshot captured by the last non-dry run
    #[serde(default)]
    pub files: Snapshot,
}

/// Outcome of [`MetadataStore::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Dry run: nothing written
    Skipped,
    /// Record written
    Saved {
        /// Whether the reserved directory had to be created first
        initialized: bool,
    },
}

/// Reads and writes the metadata record for one source root
#[derive(Debug, Clone)]
pub struct MetadataStore {
    dir: PathBuf,
    file: PathBuf,
    dry_run: bool,
}

impl MetadataStore {
    /// Store rooted at `source_root`; `save` is a no-op when `dry_run`
    #[must_use]
    pub fn new(source_root: &Path, config: &Config, dry_run: bool) -> Self {
        let dir = source_root.join(&config.metadata_dir);
        let file = dir.join(&config.metadata_file);
        Self { dir, file, dry_run }
    }

    /// Reserved directory path
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Load the previous record
    ///
    /// A missing record means first run and a malformed one, including one
    /// that is not valid UTF-8, is treated the same way; both yield an empty
    /// record.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing record cannot be read.
    pub fn load(&self) -> Result<MetadataRecord> {
        let content = match fs::read(&self.file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.file.display(), "no metadata record, first run");
                return Ok(MetadataRecord::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read metadata record: {}", self.file.display())
                });
            }
        };

        match serde_json::from_slice(&content) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    path = %self.file.display(),
                    error = %e,
                    "metadata record is malformed, starting cold"
                );
                Ok(MetadataRecord::default())
            }
        }
    }

    /// Persist `record`, creating the reserved directory if missing
    ///
    /// The record is written to a sibling temporary file and renamed into
    /// place, so an interrupted write leaves the previous record intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or record cannot be written.
    pub fn save(&self, record: &MetadataRecord) -> Result<SaveOutcome> {
        if self.dry_run {
            return Ok(SaveOutcome::Skipped);
        }

        let initialized = !self.dir.is_dir();
        if initialized {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create metadata directory: {}", self.dir.display())
            })?;
        }

        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        record
            .serialize(&mut serializer)
            .context("Failed to serialize metadata record")?;
        buffer.push(b'\n');

        let tmp = self.file.with_extension("json.tmp");
        let mut out = fs::File::create(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        out.write_all(&buffer)
            .and_then(|()| out.sync_all())
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        drop(out);

        fs::rename(&tmp, &self.file)
            .with_context(|| format!("Failed to replace {}", self.file.display()))?;

        tracing::debug!(path = %self.file.display(), files = record.files.len(), "metadata saved");
        Ok(SaveOutcome::Saved { initialized })
    }
}
