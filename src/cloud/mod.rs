//! Cloud module for the Maestro configuration system.
//!
//! This module handles everything about cloud configuration units:
//! - The declarative cloud definition and its validation rules
//! - Loading definitions from files in `maestro/clouds/`
//! - Recursively discovering those files into named [`Cloud`] entities

mod discovery;
mod entity;
mod loader;
mod spec;

pub use discovery::CloudDiscovery;
pub use entity::Cloud;
#[cfg(test)]
pub use loader::MockCloudLoader;
pub use loader::{has_cloud_extension, CloudLoader, YamlCloudLoader, CLOUD_CONFIG_EXTENSIONS};
pub use spec::{CloudSpec, NodeSpec, RoleSpec, AWS_PROVIDER};
