//! Configuration types and structures

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default name of the mandatory ignore file at the source root
pub const DEFAULT_IGNORE_FILE: &str = ".ignorecomments";
/// Default name of the reserved metadata directory at the source root
pub const DEFAULT_METADATA_DIR: &str = ".draincleaner";
/// Default name of the persisted snapshot inside the metadata directory
pub const DEFAULT_METADATA_FILE: &str = "draincleaner.json";
/// Name of the optional config file inside the metadata directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Comment markers recognised by the strippers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Prefix a source comment must start with to go in remove-all mode
    pub source_all: String,
    /// Prefix a source comment must start with to go in marked-only mode
    pub source_marked: String,
    /// Marker directly following `<!--` in marked-only document spans
    pub document_marked: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            source_all: "# ".to_string(),
            source_marked: "# ¤".to_string(),
            document_marked: "¤".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ignore file name, looked up at the source root
    pub ignore_file: String,

    /// Reserved directory holding metadata; never snapshotted or mirrored
    pub metadata_dir: String,

    /// Snapshot file name inside the reserved directory
    pub metadata_file: String,

    /// Extensions handled by the source comment stripper
    pub source_extensions: Vec<String>,

    /// Extensions handled by the markup comment stripper
    pub document_extensions: Vec<String>,

    /// Comment markers
    pub markers: Markers,

    /// Function whose call sites are listed by the print audit
    pub audit_function: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            metadata_dir: DEFAULT_METADATA_DIR.to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            source_extensions: vec!["py".to_string()],
            document_extensions: vec!["md".to_string()],
            markers: Markers::default(),
            audit_function: "print".to_string(),
        }
    }
}

impl Config {
    /// Lowercase extensions and drop leading dots
    pub fn normalize(&mut self) {
        for ext in self
            .source_extensions
            .iter_mut()
            .chain(self.document_extensions.iter_mut())
        {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
    }

    /// Whether `path` has one of the source extensions
    #[must_use]
    pub fn is_source(&self, path: &Path) -> bool {
        Self::has_extension(path, &self.source_extensions)
    }

    /// Whether `path` has one of the document extensions
    #[must_use]
    pub fn is_document(&self, path: &Path) -> bool {
        Self::has_extension(path, &self.document_extensions)
    }

    fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ignore_file, ".ignorecomments");
        assert_eq!(config.metadata_dir, ".draincleaner");
        assert_eq!(config.metadata_file, "draincleaner.json");
        assert_eq!(config.markers.source_marked, "# ¤");
        assert_eq!(config.audit_function, "print");
    }

    #[test]
    fn test_extension_kinds() {
        let config = Config::default();
        assert!(config.is_source(Path::new("pkg/mod.py")));
        assert!(config.is_source(Path::new("MOD.PY")));
        assert!(config.is_document(Path::new("README.md")));
        assert!(!config.is_source(Path::new("data.json")));
        assert!(!config.is_document(Path::new("Makefile")));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r##"
source_extensions = ["py", "pyi"]

[markers]
source_marked = "# !"
"##,
        )
        .unwrap();

        assert_eq!(config.source_extensions, vec!["py", "pyi"]);
        assert_eq!(config.markers.source_marked, "# !");
        assert_eq!(config.markers.source_all, "# ");
        assert_eq!(config.document_extensions, vec!["md"]);
    }

    #[test]
    fn test_normalize_extensions() {
        let mut config = Config {
            source_extensions: vec![".PY".to_string()],
            document_extensions: vec![" .Md ".to_string()],
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.source_extensions, vec!["py"]);
        assert_eq!(config.document_extensions, vec!["md"]);
    }
}
