//! Markup comment stripping for document files

use regex::Regex;

use super::{ContentTransformer, StripMode};
use crate::error::Result;

/// Removes `<!-- ... -->` spans, optionally only marked ones
///
/// Spans are matched lazily across line boundaries, so each span ends at
/// the first `-->` after its opening.
#[derive(Debug, Clone)]
pub struct MarkupCommentStripper {
    pattern: Regex,
}

impl MarkupCommentStripper {
    /// Build a stripper; `marker` must directly follow `<!--` in marked mode
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting pattern fails to compile.
    pub fn new(mode: StripMode, marker: &str) -> Result<Self> {
        let pattern = match mode {
            StripMode::Marked => format!(r"(?s)<!--{}.*?-->", regex::escape(marker)),
            StripMode::All => r"(?s)<!--.*?-->".to_string(),
        };
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }
}

impl ContentTransformer for MarkupCommentStripper {
    fn transform(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }
}
