//! Error types shared across the library
//!
//! Configuration problems abort a run before any work is done, while
//! transform problems are scoped to a single file and collected by the
//! executor so the rest of the tree still syncs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// Fatal configuration errors, raised before any snapshot or transform work
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mandatory ignore file is absent from the source root
    #[error("ignore file not found: {path}")]
    MissingIgnoreFile {
        /// Expected location of the ignore file
        path: PathBuf,
    },

    /// The source path does not exist or is not a directory
    #[error("source path is not a directory: {path}")]
    InvalidSource {
        /// Offending source path
        path: PathBuf,
    },

    /// The target path exists but is not a directory
    #[error("target path is not a directory: {path}")]
    InvalidTarget {
        /// Offending target path
        path: PathBuf,
    },

    /// The target path is the source root or lies below it without being
    /// excluded from the walk
    #[error(
        "target path {target} lies inside source path {source_root}; ignore it in the ignore file or move it out"
    )]
    TargetInsideSource {
        /// Canonical source root
        source_root: PathBuf,
        /// Offending target path
        target: PathBuf,
    },

    /// An explicitly requested config file does not exist
    #[error("config file not found: {path}")]
    MissingConfigFile {
        /// Requested config path
        path: PathBuf,
    },

    /// A configuration value failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A line of the ignore file is not a valid pattern
    #[error("invalid ignore pattern '{pattern}' in {path}: {source}")]
    InvalidPattern {
        /// Ignore file the pattern came from
        path: PathBuf,
        /// The pattern text
        pattern: String,
        /// Underlying glob error
        source: ignore::Error,
    },
}

/// Failures confined to a single file of the mirror
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The file content is not valid in its detected encoding
    #[error("failed to decode {path} as {encoding}")]
    Decode {
        /// File being decoded
        path: PathBuf,
        /// Encoding that was attempted
        encoding: &'static str,
    },

    /// The file declares an encoding that cannot be decoded
    #[error("unsupported encoding '{encoding}' declared in {path}")]
    UnsupportedEncoding {
        /// File carrying the declaration
        path: PathBuf,
        /// Declared encoding name
        encoding: String,
    },

    /// The transformed output could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A plain file could not be copied
    #[error("failed to copy {source_path} to {dest}: {source}")]
    Copy {
        /// Source file
        source_path: PathBuf,
        /// Destination file
        dest: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A mirrored directory could not be created
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory being created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ignore_file_message() {
        let err = ConfigError::MissingIgnoreFile {
            path: PathBuf::from("/src/.ignorecomments"),
        };
        assert_eq!(
            err.to_string(),
            "ignore file not found: /src/.ignorecomments"
        );
    }

    #[test]
    fn test_transform_error_names_path() {
        let err = TransformError::Decode {
            path: PathBuf::from("pkg/mod.py"),
            encoding: "utf-8",
        };
        assert!(err.to_string().contains("pkg/mod.py"));
        assert!(err.to_string().contains("utf-8"));
    }
}
