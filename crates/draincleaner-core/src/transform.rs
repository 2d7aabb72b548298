//! Per-file content transformers
//!
//! The sync engine only sees [`ContentTransformer`]; which one applies to a
//! file is decided by [`FileKind`].

mod audit;
mod document;
mod source;
mod syntax;

use std::path::Path;

pub use audit::{AuditHit, AuditKind, find_calls, find_strings};
pub use document::MarkupCommentStripper;
pub use source::{SourceCommentStripper, decode_source};
pub use syntax::{SourceTree, Span};

use crate::config::Config;
use crate::error::Result;

/// A pure text-to-text transformation applied to one file
pub trait ContentTransformer {
    /// Transform decoded file content
    fn transform(&self, text: &str) -> String;
}

/// How a file is mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Code file: comments stripped via the syntax tree
    Source,
    /// Markup file: `<!-- -->` spans stripped
    Document,
    /// Anything else: copied byte for byte
    Plain,
}

impl FileKind {
    /// Kind of `path` according to the configured extensions
    #[must_use]
    pub fn of(path: &Path, config: &Config) -> Self {
        if config.is_source(path) {
            Self::Source
        } else if config.is_document(path) {
            Self::Document
        } else {
            Self::Plain
        }
    }
}

/// Which comments get stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Only comments carrying the marker
    #[default]
    Marked,
    /// Every comment
    All,
}

impl StripMode {
    /// Mode for the `--remove-all` flag
    #[must_use]
    pub const fn from_remove_all(remove_all: bool) -> Self {
        if remove_all { Self::All } else { Self::Marked }
    }

    /// Human-readable label used in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Marked => "prefixed comments",
            Self::All => "all comments",
        }
    }
}

/// The transformers for one run
#[derive(Debug, Clone)]
pub struct Transformers {
    source: SourceCommentStripper,
    document: MarkupCommentStripper,
}

impl Transformers {
    /// Build the source and document strippers for `mode`
    ///
    /// # Errors
    ///
    /// Returns an error if the document pattern fails to compile.
    pub fn new(config: &Config, mode: StripMode) -> Result<Self> {
        let prefix = match mode {
            StripMode::Marked => &config.markers.source_marked,
            StripMode::All => &config.markers.source_all,
        };
        Ok(Self {
            source: SourceCommentStripper::new(prefix.clone()),
            document: MarkupCommentStripper::new(mode, &config.markers.document_marked)?,
        })
    }

    /// Transformer for `kind`, `None` for plain copies
    #[must_use]
    pub fn for_kind(&self, kind: FileKind) -> Option<&dyn ContentTransformer> {
        match kind {
            FileKind::Source => Some(&self.source),
            FileKind::Document => Some(&self.document),
            FileKind::Plain => None,
        }
    }
}
