//! # draincleaner-core
//!
//! Core library for mirroring a source tree into a target tree while
//! stripping marked comments from source and document files.
//!
//! Every run compares a persisted snapshot of file metadata against a fresh
//! walk of the source tree, so only new and modified files are reprocessed.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error taxonomy and result alias
pub mod error;

/// Run configuration, discovery, validation and ignore patterns
pub mod config;

/// Snapshot building over the source tree
pub mod scanner;

/// Persisted snapshot storage under the reserved directory
pub mod metadata;

/// Snapshot comparison and change classification
pub mod comparison;

/// Per-file content transformers
pub mod transform;

/// Incremental mirroring engine
pub mod sync;
