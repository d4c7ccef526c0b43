//! Loading cloud definitions from configuration files.

use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

use super::spec::CloudSpec;

/// File extensions identifying a cloud configuration unit.
pub const CLOUD_CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Turns a cloud configuration file into a cloud definition.
#[cfg_attr(test, mockall::automock)]
pub trait CloudLoader {
    /// Loads the definition stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<CloudSpec, ConfigError>;
}

/// Loads cloud definitions written in YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCloudLoader;

impl YamlCloudLoader {
    /// Creates a new YAML loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses a cloud definition from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: &Path) -> Result<CloudSpec, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse(format!("YAML parse error: {e}"), source.display().to_string()))
    }
}

impl CloudLoader for YamlCloudLoader {
    fn load(&self, path: &Path) -> Result<CloudSpec, ConfigError> {
        debug!("Loading cloud definition from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::parse(format!("Failed to read file: {e}"), path.display().to_string())
        })?;

        // An empty file is an empty definition, not a parse failure.
        if content.trim().is_empty() {
            return Ok(CloudSpec::default());
        }

        self.parse_yaml(&content, path)
    }
}

/// Returns true if `path` has a cloud configuration extension.
#[must_use]
pub fn has_cloud_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CLOUD_CONFIG_EXTENSIONS.contains(&ext))
}
