//! Sync event reporting
//!
//! The engine emits [`SyncEvent`]s to a [`Reporter`]. The console reporter
//! always formats lines with colors and strips the escape sequences
//! afterwards when color is off, so both modes share one formatting path.

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use super::SyncResult;
use crate::comparison::ChangeKind;
use crate::transform::{AuditHit, StripMode};

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid ANSI regex")
});

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A path was classified as new, modified or removed
    Classified {
        /// Classification
        kind: ChangeKind,
        /// Relative path of the file
        rel_path: String,
    },
    /// The reserved metadata directory was created
    MetadataInitialized {
        /// Created directory
        path: PathBuf,
    },
    /// A target directory is missing and gets created
    CreatingDir {
        /// Target directory
        target: PathBuf,
    },
    /// A plain file is copied
    Copying {
        /// Source file
        source: PathBuf,
        /// Mirrored file
        target: PathBuf,
    },
    /// Comments are being stripped from a source file
    Stripping {
        /// Strip mode in effect
        mode: StripMode,
        /// Source file
        source: PathBuf,
    },
    /// A transformed file is written
    Writing {
        /// Source file
        source: PathBuf,
        /// Mirrored file
        target: PathBuf,
    },
    /// Audit results for one source file
    Audit {
        /// Heading, e.g. `print statements`
        title: String,
        /// Audited file
        source: PathBuf,
        /// Occurrences, in source order
        hits: Vec<AuditHit>,
    },
    /// A per-file failure that did not stop the run
    Error {
        /// Error description
        message: String,
    },
    /// End-of-run totals
    Summary {
        /// Totals
        result: SyncResult,
        /// Whether this run was a dry run
        dry_run: bool,
    },
}

/// Sink for sync events
pub trait Reporter {
    /// Handle one event
    fn report(&mut self, event: SyncEvent);
}

/// Reporter that keeps every event, for embedding and tests
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// Events in emission order
    pub events: Vec<SyncEvent>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, event: SyncEvent) {
        self.events.push(event);
    }
}

/// Line-oriented terminal reporter
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    colored: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter writing to `out`
    #[must_use]
    pub const fn new(out: W, verbose: bool, colored: bool) -> Self {
        Self {
            out,
            verbose,
            colored,
        }
    }

    /// Consume the reporter, returning its writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Format `event`, or `None` if it is hidden at this verbosity
    #[must_use]
    pub fn format(&self, event: &SyncEvent) -> Option<String> {
        let line = match event {
            SyncEvent::Classified { kind, rel_path } => {
                let name = file_name(Path::new(rel_path));
                match kind {
                    ChangeKind::New => format!("NEW FILE: {name} in {rel_path}").green(),
                    ChangeKind::Modified => format!("MODIFIED: {name} in {rel_path}").yellow(),
                    ChangeKind::Removed => format!("REMOVED: {name} in {rel_path}").red(),
                    ChangeKind::Unchanged => return None,
                }
                .to_string()
            }
            SyncEvent::Error { message } => format!("ERROR: {message}").red().to_string(),
            SyncEvent::Audit {
                title,
                source,
                hits,
            } => Self::format_audit(title, source, hits)?,
            _ if !self.verbose => return None,
            SyncEvent::MetadataInitialized { path } => {
                format!("Initialize metadata storage: {}", path.display())
            }
            SyncEvent::CreatingDir { target } => {
                format!("{} does not exist, creating...", target.display())
            }
            SyncEvent::Copying { source, target } => format!(
                "{} {}  =>  {}",
                "Copying".green(),
                file_name(source),
                target.display()
            ),
            SyncEvent::Stripping { mode, source } => format!(
                "Removing {} from {}  => {}",
                mode.label(),
                file_name(source),
                source.display()
            )
            .red()
            .to_string(),
            SyncEvent::Writing { source, target } => {
                format!("Writing {}  =>  {}", file_name(source), target.display())
                    .white()
                    .to_string()
            }
            SyncEvent::Summary { result, dry_run } => generate_summary(result, *dry_run),
        };

        Some(if self.colored { line } else { strip_ansi(&line) })
    }

    fn format_audit(title: &str, source: &Path, hits: &[AuditHit]) -> Option<String> {
        let width = hits.iter().map(|h| h.line).max()?.to_string().len();

        let mut block = String::new();
        let _ = writeln!(
            block,
            "\n{}\n",
            format!("{title} in {}:", source.display()).yellow()
        );
        for hit in hits {
            let _ = writeln!(
                block,
                "{} {}",
                format!(" {:>width$}:", hit.line).truecolor(255, 165, 0),
                hit.text.blue()
            );
        }
        Some(block)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: SyncEvent) {
        if let Some(line) = self.format(&event) {
            if let Err(e) = writeln!(self.out, "{line}") {
                tracing::debug!(error = %e, "failed to write report line");
            }
        }
    }
}

/// Remove ANSI escape sequences from `text`
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Generate a summary report
#[must_use]
pub fn generate_summary(result: &SyncResult, dry_run: bool) -> String {
    let mut output = String::new();

    if dry_run {
        output.push_str("\n=== Sync Summary (dry run) ===\n");
    } else {
        output.push_str("\n=== Sync Summary ===\n");
    }
    let _ = writeln!(output, "New:          {}", result.new);
    let _ = writeln!(output, "Modified:     {}", result.modified);
    let _ = writeln!(output, "Removed:      {}", result.removed);
    let _ = writeln!(output, "Directories:  {}", result.dirs_created);
    let _ = writeln!(output, "Transformed:  {}", result.transformed);
    let _ = writeln!(output, "Copied:       {}", result.copied);
    let _ = writeln!(output, "Unchanged:    {}", result.unchanged);

    if !result.errors.is_empty() {
        let _ = writeln!(output, "\nErrors ({}):", result.errors.len());
        for error in &result.errors {
            let _ = writeln!(output, "  - {error}");
        }
    }

    let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());

    if result.is_success() {
        output.push_str("Status: ✓ Success");
    } else {
        output.push_str("Status: ✗ Completed with errors");
    }

    output
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
