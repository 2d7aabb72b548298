//! Configuration file discovery

use std::path::{Path, PathBuf};

use super::types::CONFIG_FILE_NAME;
use crate::error::{ConfigError, Result};

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Locate the config file to load, if any
    ///
    /// Precedence:
    /// 1. `cli_path` (must exist)
    /// 2. `<source_root>/<metadata_dir>/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if `cli_path` is given but does not exist.
    pub fn discover(
        cli_path: Option<&Path>,
        source_root: &Path,
        metadata_dir: &str,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = cli_path {
            if !path.is_file() {
                return Err(ConfigError::MissingConfigFile {
                    path: path.to_path_buf(),
                }
                .into());
            }
            return Ok(Some(path.to_path_buf()));
        }

        let candidate = source_root.join(metadata_dir).join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_found() {
        let tmp = TempDir::new().unwrap();
        let found = ConfigDiscovery::discover(None, tmp.path(), ".draincleaner").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_project_config_found() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".draincleaner");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("config.toml"), "").unwrap();

        let found = ConfigDiscovery::discover(None, tmp.path(), ".draincleaner").unwrap();
        assert_eq!(found, Some(dir.join("config.toml")));
    }

    #[test]
    fn test_cli_config_takes_precedence() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".draincleaner");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("config.toml"), "").unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();

        let found =
            ConfigDiscovery::discover(Some(&explicit), tmp.path(), ".draincleaner").unwrap();
        assert_eq!(found, Some(explicit));
    }

    #[test]
    fn test_missing_cli_config_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");

        let err = ConfigDiscovery::discover(Some(&missing), tmp.path(), ".draincleaner")
            .unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
