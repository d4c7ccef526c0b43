//! Declarative cloud definition types.
//!
//! This module defines the structs that map to a cloud configuration file in
//! `maestro/clouds/`. Every key is optional when parsing so that an incomplete
//! definition can still be loaded and reported on in full by
//! [`CloudSpec::validation_errors`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only provider currently supported.
pub const AWS_PROVIDER: &str = "aws";

/// A single cloud definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CloudSpec {
    /// Infrastructure provider (e.g. "aws").
    #[serde(default)]
    pub provider: Option<String>,
    /// Provider region (e.g. "us-east-1").
    #[serde(default)]
    pub region: Option<String>,
    /// Name of the provider keypair used to reach nodes.
    #[serde(default)]
    pub keypair_name: Option<String>,
    /// Local path of the keypair's private key.
    #[serde(default)]
    pub keypair_file: Option<String>,
    /// AWS account identifier.
    #[serde(default)]
    pub aws_account_id: Option<String>,
    /// AWS access key.
    #[serde(default)]
    pub aws_access_key: Option<String>,
    /// AWS secret access key.
    #[serde(default)]
    pub aws_secret_access_key: Option<String>,
    /// Bucket the Chef assets archive is uploaded to.
    #[serde(default)]
    pub chef_bucket: Option<String>,
    /// Roles, keyed by name.
    #[serde(default)]
    pub roles: BTreeMap<String, RoleSpec>,
    /// Nodes, keyed by name.
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeSpec>,
}

/// A role shared by one or more nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoleSpec {
    /// Ports opened to the public for nodes in this role.
    #[serde(default)]
    pub public_ports: Vec<u16>,
}

/// A single node of a cloud.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Role this node plays.
    #[serde(default)]
    pub role: Option<String>,
    /// Machine image to boot.
    #[serde(default)]
    pub ami: Option<String>,
    /// Instance size.
    #[serde(default)]
    pub instance_type: Option<String>,
}

impl CloudSpec {
    /// Returns every problem with this definition, in a stable order.
    ///
    /// An empty result means the definition is valid.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.provider.as_deref() {
            None | Some("") => errors.push(String::from("missing provider")),
            Some(AWS_PROVIDER) => self.validate_aws(&mut errors),
            Some(other) => errors.push(format!("unsupported provider '{other}'")),
        }

        self.validate_roles(&mut errors);
        self.validate_nodes(&mut errors);

        errors
    }

    /// Validates the keys every AWS cloud needs.
    fn validate_aws(&self, errors: &mut Vec<String>) {
        let required = [
            ("region", &self.region),
            ("keypair_name", &self.keypair_name),
            ("keypair_file", &self.keypair_file),
            ("aws_account_id", &self.aws_account_id),
            ("aws_access_key", &self.aws_access_key),
            ("aws_secret_access_key", &self.aws_secret_access_key),
            ("chef_bucket", &self.chef_bucket),
        ];

        for (key, value) in required {
            if value.as_deref().is_none_or(str::is_empty) {
                errors.push(format!("missing {key}"));
            }
        }
    }

    fn validate_roles(&self, errors: &mut Vec<String>) {
        for (name, role) in &self.roles {
            if role.public_ports.contains(&0) {
                errors.push(format!("role '{name}' has invalid public port 0"));
            }
        }
    }

    fn validate_nodes(&self, errors: &mut Vec<String>) {
        for (name, node) in &self.nodes {
            match node.role.as_deref() {
                None | Some("") => errors.push(format!("node '{name}' is missing a role")),
                Some(role) if !self.roles.contains_key(role) => {
                    errors.push(format!("node '{name}' references undefined role '{role}'"));
                }
                Some(_) => {}
            }

            if node.ami.as_deref().is_none_or(str::is_empty) {
                errors.push(format!("node '{name}' is missing ami"));
            }

            if node.instance_type.as_deref().is_none_or(str::is_empty) {
                errors.push(format!("node '{name}' is missing instance_type"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_aws() -> CloudSpec {
        let yaml = r#"
provider: aws
region: us-east-1
keypair_name: maestro
keypair_file: /home/deploy/.ssh/maestro.pem
aws_account_id: "123456789012"
aws_access_key: AKIAEXAMPLE
aws_secret_access_key: secret
chef_bucket: maestro-chef
roles:
  web:
    public_ports: [80, 443]
nodes:
  web-1:
    role: web
    ami: ami-12345678
    instance_type: m1.small
"#;
        serde_yaml::from_str(yaml).expect("Failed to parse cloud")
    }

    #[test]
    fn test_complete_aws_cloud_is_valid() {
        assert!(complete_aws().validation_errors().is_empty());
    }

    #[test]
    fn test_missing_region() {
        let mut spec = complete_aws();
        spec.region = None;
        assert_eq!(spec.validation_errors(), vec!["missing region"]);
    }

    #[test]
    fn test_empty_definition_reports_provider_only() {
        assert_eq!(CloudSpec::default().validation_errors(), vec!["missing provider"]);
    }

    #[test]
    fn test_unsupported_provider() {
        let spec = CloudSpec {
            provider: Some(String::from("gcp")),
            ..CloudSpec::default()
        };
        assert_eq!(spec.validation_errors(), vec!["unsupported provider 'gcp'"]);
    }

    #[test]
    fn test_node_and_role_errors_collected() {
        let mut spec = complete_aws();
        spec.roles.insert(
            String::from("db"),
            RoleSpec {
                public_ports: vec![0],
            },
        );
        spec.nodes.insert(
            String::from("worker-1"),
            NodeSpec {
                role: Some(String::from("worker")),
                ami: None,
                instance_type: Some(String::from("m1.large")),
            },
        );

        assert_eq!(
            spec.validation_errors(),
            vec![
                "role 'db' has invalid public port 0",
                "node 'worker-1' references undefined role 'worker'",
                "node 'worker-1' is missing ami",
            ]
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<CloudSpec, _> = serde_yaml::from_str("provider: aws\nzone: a\n");
        assert!(result.is_err());
    }
}
