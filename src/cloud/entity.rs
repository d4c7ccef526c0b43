//! The cloud entity produced by discovery.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::spec::CloudSpec;

/// One discovered cloud configuration unit.
///
/// Validity is unknown until [`Cloud::validate`] is called.
#[derive(Debug, Clone, Serialize)]
pub struct Cloud {
    name: String,
    config_file: PathBuf,
    #[serde(skip)]
    definition: Result<CloudSpec, String>,
    valid: Option<bool>,
    validation_errors: Vec<String>,
}

impl Cloud {
    /// Creates a cloud from the outcome of loading `config_file`.
    ///
    /// A load failure is kept and reported by [`Cloud::validate`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config_file: impl Into<PathBuf>,
        definition: Result<CloudSpec, ConfigError>,
    ) -> Self {
        Self {
            name: name.into(),
            config_file: config_file.into(),
            definition: definition.map_err(|e| e.to_string()),
            valid: None,
            validation_errors: Vec::new(),
        }
    }

    /// Name derived from the file path relative to the clouds directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file this cloud was loaded from.
    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// The loaded definition, if the file could be loaded.
    #[must_use]
    pub fn definition(&self) -> Option<&CloudSpec> {
        self.definition.as_ref().ok()
    }

    /// `None` until validated, then whether the cloud is valid.
    #[must_use]
    pub const fn valid(&self) -> Option<bool> {
        self.valid
    }

    /// True only once validated and found valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid == Some(true)
    }

    /// Errors found by the last [`Cloud::validate`] call.
    #[must_use]
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Validates the cloud, recording its validity and errors.
    pub fn validate(&mut self) -> bool {
        self.validation_errors = match &self.definition {
            Ok(spec) => spec.validation_errors(),
            Err(load_error) => vec![load_error.clone()],
        };
        let valid = self.validation_errors.is_empty();
        self.valid = Some(valid);
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_unknown_until_validated() {
        let mut cloud = Cloud::new("prod", "/clouds/prod.yml", Ok(CloudSpec::default()));
        assert_eq!(cloud.valid(), None);
        assert!(cloud.validation_errors().is_empty());

        assert!(!cloud.validate());
        assert_eq!(cloud.valid(), Some(false));
        assert_eq!(cloud.validation_errors(), ["missing provider"]);
    }

    #[test]
    fn test_load_failure_reported_on_validate() {
        let mut cloud = Cloud::new(
            "broken",
            "/clouds/broken.yml",
            Err(ConfigError::parse("YAML parse error: bad", "/clouds/broken.yml")),
        );
        assert!(cloud.definition().is_none());

        cloud.validate();
        assert!(!cloud.is_valid());
        assert_eq!(
            cloud.validation_errors(),
            ["Failed to parse configuration: YAML parse error: bad"]
        );
    }

    #[test]
    fn test_revalidation_replaces_errors() {
        let mut cloud = Cloud::new("prod", "/clouds/prod.yml", Ok(CloudSpec::default()));
        cloud.validate();
        cloud.validate();
        assert_eq!(cloud.validation_errors().len(), 1);
    }
}
