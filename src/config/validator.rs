//! Validation of a Maestro configuration root.
//!
//! Validation never fails with an error. Every problem it can find is
//! collected into a [`ValidationReport`] so a caller can show them all at
//! once.

use std::path::Path;
use tracing::debug;

use crate::cloud::{CloudDiscovery, CloudLoader, YamlCloudLoader};
use crate::environment::{clouds_config_dir, cookbooks_dir, roles_dir};

use super::report::ValidationReport;

/// Validator for Maestro configuration roots.
#[derive(Debug, Default, Clone)]
pub struct ConfigValidator<L = YamlCloudLoader> {
    /// Discovery engine used once the directory layout checks pass.
    discovery: CloudDiscovery<L>,
}

impl ConfigValidator {
    /// Creates a validator that loads YAML cloud definitions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            discovery: CloudDiscovery::new(),
        }
    }
}

impl<L: CloudLoader> ConfigValidator<L> {
    /// Creates a validator with a custom cloud loader.
    #[must_use]
    pub const fn with_loader(loader: L) -> Self {
        Self {
            discovery: CloudDiscovery::with_loader(loader),
        }
    }

    /// Validates the configuration root at `config_root`.
    ///
    /// Directory checks run first and never short-circuit each other. Clouds
    /// are only validated when every directory check passed.
    #[must_use]
    pub fn validate(&self, config_root: &Path) -> ValidationReport {
        let mut messages = Vec::new();

        let mut valid = Self::validate_required_dir(
            "Maestro config directory",
            config_root,
            &mut messages,
        );

        let clouds_directory = clouds_config_dir(config_root);
        valid &= Self::validate_required_dir(
            "Maestro clouds config directory",
            &clouds_directory,
            &mut messages,
        );
        valid &= Self::validate_optional_dir(
            "Chef cookbooks directory",
            &cookbooks_dir(config_root),
            &mut messages,
        );
        valid &= Self::validate_optional_dir(
            "Chef roles directory",
            &roles_dir(config_root),
            &mut messages,
        );

        if !valid {
            debug!("Directory layout invalid, skipping cloud validation");
            return ValidationReport::new(false, messages);
        }

        valid &= self.validate_clouds(&clouds_directory, &mut messages);
        ValidationReport::new(valid, messages)
    }

    /// Checks existence and directory-ness independently, reporting both.
    fn validate_required_dir(label: &str, dir: &Path, messages: &mut Vec<String>) -> bool {
        let mut valid = true;

        if !dir.exists() {
            valid = false;
            messages.push(format!("{label} does not exist: {}", dir.display()));
        }

        if !dir.is_dir() {
            valid = false;
            messages.push(format!("{label} is not a directory: {}", dir.display()));
        }

        valid
    }

    /// Checks existence, and directory-ness only when the path exists.
    fn validate_optional_dir(label: &str, dir: &Path, messages: &mut Vec<String>) -> bool {
        if !dir.exists() {
            messages.push(format!("{label} does not exist: {}", dir.display()));
            return false;
        }

        if !dir.is_dir() {
            messages.push(format!("{label} is not a directory: {}", dir.display()));
            return false;
        }

        true
    }

    /// Validates every discovered cloud, appending a block per cloud.
    fn validate_clouds(&self, clouds_directory: &Path, messages: &mut Vec<String>) -> bool {
        let mut valid = true;

        for (name, mut cloud) in self.discovery.discover(clouds_directory) {
            if cloud.validate() {
                debug!("Cloud '{name}' is valid");
                messages.push(format!("VALID: {}", cloud.config_file().display()));
            } else {
                debug!("Cloud '{name}' is invalid");
                valid = false;
                messages.push(format!("INVALID: {}", cloud.config_file().display()));
                messages.extend(
                    cloud
                        .validation_errors()
                        .iter()
                        .map(|error| format!("    {error}")),
                );
            }
        }

        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{CloudSpec, NodeSpec, RoleSpec};
    use crate::layout::DirectoryLayout;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const VALID_CLOUD: &str = r#"
provider: aws
region: us-east-1
keypair_name: maestro
keypair_file: /home/deploy/.ssh/maestro.pem
aws_account_id: "123456789012"
aws_access_key: AKIAEXAMPLE
aws_secret_access_key: secret
chef_bucket: maestro-chef
"#;

    /// Creates `<temp>/maestro/{clouds,cookbooks,roles}` and returns the
    /// config root.
    fn config_root(temp: &TempDir) -> PathBuf {
        DirectoryLayout::new()
            .ensure_config_tree(temp.path())
            .expect("Failed to create config tree");
        temp.path().join("maestro")
    }

    fn aws_spec_without_region() -> CloudSpec {
        let mut spec: CloudSpec = serde_yaml::from_str(VALID_CLOUD).expect("Failed to parse");
        spec.region = None;
        spec
    }

    #[test]
    fn test_missing_root_reports_both_checks() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path().join("maestro");

        let report = ConfigValidator::new().validate(&root);

        assert!(!report.is_valid());
        assert_eq!(
            report.messages()[..2],
            [
                format!("Maestro config directory does not exist: {}", root.display()),
                format!("Maestro config directory is not a directory: {}", root.display()),
            ]
        );
        assert_eq!(report.messages().len(), 6);
    }

    #[test]
    fn test_missing_cookbooks_skips_clouds() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        fs::write(root.join("clouds/prod.yml"), VALID_CLOUD).expect("Failed to write cloud");
        fs::remove_dir(root.join("cookbooks")).expect("Failed to remove cookbooks");

        let report = ConfigValidator::new().validate(&root);

        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [format!(
                "Chef cookbooks directory does not exist: {}",
                root.join("cookbooks").display()
            )]
        );
        assert!(
            !report
                .messages()
                .iter()
                .any(|m| m.starts_with("VALID:") || m.starts_with("INVALID:"))
        );
    }

    #[test]
    fn test_roles_file_is_not_a_directory() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        fs::remove_dir(root.join("roles")).expect("Failed to remove roles");
        fs::write(root.join("roles"), "").expect("Failed to write roles file");

        let report = ConfigValidator::new().validate(&root);

        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [format!(
                "Chef roles directory is not a directory: {}",
                root.join("roles").display()
            )]
        );
    }

    #[test]
    fn test_valid_layout_without_clouds() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);

        let report = ConfigValidator::new().validate(&root);
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_valid_cloud_reported() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        let path = root.join("clouds/prod.yml");
        fs::write(&path, VALID_CLOUD).expect("Failed to write cloud");

        let report = ConfigValidator::new().validate(&root);

        assert!(report.is_valid());
        assert_eq!(report.messages(), [format!("VALID: {}", path.display())]);
    }

    #[test]
    fn test_invalid_cloud_reported_with_indented_errors() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        let path = root.join("clouds/prod.yml");
        fs::write(&path, "").expect("Failed to write cloud");

        let mut loader = crate::cloud::MockCloudLoader::new();
        loader
            .expect_load()
            .withf(|p| p.ends_with("clouds/prod.yml"))
            .times(1)
            .returning(|_| Ok(aws_spec_without_region()));

        let report = ConfigValidator::with_loader(loader).validate(&root);

        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [format!("INVALID: {}", path.display()), String::from("    missing region")]
        );
    }

    #[test]
    fn test_mixed_clouds_all_reported() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        let good = root.join("clouds/good.yml");
        let bad = root.join("clouds/nested/bad.yml");
        fs::create_dir_all(root.join("clouds/nested")).expect("Failed to create nested");
        fs::write(&good, VALID_CLOUD).expect("Failed to write cloud");
        fs::write(
            &bad,
            "provider: aws\nnodes:\n  web-1:\n    role: web\n",
        )
        .expect("Failed to write cloud");

        let report = ConfigValidator::new().validate(&root);

        assert!(!report.is_valid());
        let messages = report.messages();
        assert!(messages.contains(&format!("VALID: {}", good.display())));
        let invalid_at = messages
            .iter()
            .position(|m| *m == format!("INVALID: {}", bad.display()))
            .expect("invalid cloud not reported");
        assert_eq!(messages[invalid_at + 1], "    missing region");
        assert!(messages.contains(&String::from("    node 'web-1' references undefined role 'web'")));
    }

    #[test]
    fn test_unparseable_cloud_reported_invalid() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        let path = root.join("clouds/broken.yml");
        fs::write(&path, "provider: [aws\n").expect("Failed to write cloud");

        let report = ConfigValidator::new().validate(&root);

        assert!(!report.is_valid());
        assert_eq!(report.messages()[0], format!("INVALID: {}", path.display()));
        assert!(report.messages()[1].starts_with("    Failed to parse configuration"));
    }

    #[test]
    fn test_role_specs_round_out_valid_cloud() {
        let mut spec: CloudSpec = serde_yaml::from_str(VALID_CLOUD).expect("Failed to parse");
        spec.roles.insert(String::from("web"), RoleSpec { public_ports: vec![80] });
        spec.nodes.insert(
            String::from("web-1"),
            NodeSpec {
                role: Some(String::from("web")),
                ami: Some(String::from("ami-12345678")),
                instance_type: Some(String::from("m1.small")),
            },
        );

        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = config_root(&temp);
        fs::write(root.join("clouds/prod.yml"), "").expect("Failed to write cloud");

        let mut loader = crate::cloud::MockCloudLoader::new();
        loader.expect_load().returning(move |_| Ok(spec.clone()));

        assert!(ConfigValidator::with_loader(loader).validate(&root).is_valid());
    }
}
