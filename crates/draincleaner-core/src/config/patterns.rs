//! Gitignore-style pattern matching using the ignore crate

use std::fs;
use std::path::Path;

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{ConfigError, Result};

/// Compiled ignore rules for paths relative to the source root
#[derive(Debug)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    /// Matcher that ignores nothing
    #[must_use]
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
        }
    }

    /// Load `<root>/<file_name>`; the file is mandatory
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or holds an
    /// invalid pattern.
    pub fn from_file(root: &Path, file_name: &str) -> Result<Self> {
        let path = root.join(file_name);
        if !path.is_file() {
            return Err(ConfigError::MissingIgnoreFile { path }.into());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read ignore file: {}", path.display()))?;

        let mut builder = GitignoreBuilder::new(root);
        for line in content.lines() {
            builder
                .add_line(Some(path.clone()), line)
                .map_err(|source| ConfigError::InvalidPattern {
                    path: path.clone(),
                    pattern: line.to_string(),
                    source,
                })?;
        }

        let gitignore = builder
            .build()
            .with_context(|| format!("Failed to compile ignore file: {}", path.display()))?;

        Ok(Self { gitignore })
    }

    /// Build from in-memory pattern lines
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid.
    pub fn with_patterns(root: &Path, patterns: &[&str]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("Invalid ignore pattern: '{pattern}'"))?;
        }
        Ok(Self {
            gitignore: builder.build()?,
        })
    }

    /// Number of patterns loaded
    #[must_use]
    pub fn len(&self) -> usize {
        self.gitignore.len()
    }

    /// Whether no patterns were loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }

    /// Whether `rel_path` or one of its parent directories is ignored
    #[must_use]
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        if self.gitignore.is_empty() || rel_path.as_os_str().is_empty() {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self::empty()
    }
}
