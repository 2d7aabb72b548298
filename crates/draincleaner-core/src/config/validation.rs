//! Configuration validation and error reporting

use std::collections::HashSet;
use std::path::{Component, Path};

use super::types::Config;
use crate::error::{ConfigError, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        Self::check_component("ignore_file", &config.ignore_file)?;
        Self::check_component("metadata_dir", &config.metadata_dir)?;
        Self::check_component("metadata_file", &config.metadata_file)?;

        if config.ignore_file == config.metadata_dir {
            return Err(invalid("ignore_file and metadata_dir must differ"));
        }

        let mut source = HashSet::new();
        for ext in &config.source_extensions {
            if ext.is_empty() {
                return Err(invalid("source extension cannot be empty"));
            }
            source.insert(ext.as_str());
        }
        for ext in &config.document_extensions {
            if ext.is_empty() {
                return Err(invalid("document extension cannot be empty"));
            }
            if source.contains(ext.as_str()) {
                return Err(invalid(&format!(
                    "extension '{ext}' is both a source and a document extension"
                )));
            }
        }

        let markers = &config.markers;
        if markers.source_all.is_empty() || markers.source_marked.is_empty() {
            return Err(invalid("source comment markers cannot be empty"));
        }
        if markers.document_marked.is_empty() {
            return Err(invalid("document marker cannot be empty"));
        }

        if !is_identifier(&config.audit_function) {
            return Err(invalid(&format!(
                "audit_function '{}' is not an identifier",
                config.audit_function
            )));
        }

        Ok(())
    }

    /// Reserved names must be a single normal path component
    fn check_component(field: &str, value: &str) -> Result<()> {
        let mut components = Path::new(value).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(invalid(&format!(
                "{field} must be a single file name, got '{value}'"
            ))),
        }
    }
}

fn invalid(message: &str) -> anyhow::Error {
    ConfigError::Invalid(message.to_string()).into()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
