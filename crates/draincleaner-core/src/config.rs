//! Run configuration and ignore patterns
//!
//! This module handles:
//! - Config file discovery (`--config` or the reserved directory)
//! - TOML parsing with serde, falling back to defaults per field
//! - Validation of reserved names, markers and extensions
//! - Gitignore-style ignore file matching

mod discovery;
mod patterns;
mod types;
mod validation;

use std::fs;
use std::path::Path;

use anyhow::Context;

pub use discovery::ConfigDiscovery;
pub use patterns::IgnoreMatcher;
pub use types::{
    CONFIG_FILE_NAME, Config, DEFAULT_IGNORE_FILE, DEFAULT_METADATA_DIR, DEFAULT_METADATA_FILE,
    Markers,
};
pub use validation::ConfigValidator;

use crate::error::{ConfigError, Result};

/// Configuration manager that coordinates discovery, parsing and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load the effective configuration for `source_root`
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is missing, unreadable, malformed
    /// or fails validation.
    pub fn load(cli_config_path: Option<&Path>, source_root: &Path) -> Result<Config> {
        let found = ConfigDiscovery::discover(cli_config_path, source_root, DEFAULT_METADATA_DIR)?;

        let discovered = cli_config_path.is_none() && found.is_some();
        let mut config = match found {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::parse(&path)?
            }
            None => Config::default(),
        };

        config.normalize();
        ConfigValidator::validate(&config)?;

        // The default directory stays reserved while it holds the config
        if discovered && config.metadata_dir != DEFAULT_METADATA_DIR {
            return Err(ConfigError::Invalid(format!(
                "metadata_dir cannot be moved by {DEFAULT_METADATA_DIR}/{CONFIG_FILE_NAME}; \
                 use --config instead"
            ))
            .into());
        }

        Ok(config)
    }

    fn parse(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
