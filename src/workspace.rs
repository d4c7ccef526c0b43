//! The `Maestro` entry point tying resolution to every operation.
//!
//! Each operation resolves the environment once through its
//! [`EnvironmentResolver`] and hands the resulting path to the component that
//! does the work.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use crate::archive::ChefArchiveBuilder;
use crate::cloud::{Cloud, CloudDiscovery, CloudLoader, YamlCloudLoader};
use crate::config::{ConfigValidator, ValidationReport};
use crate::environment::{ConfigRoot, EnvironmentResolver};
use crate::error::{MaestroError, Result};
use crate::layout::DirectoryLayout;

/// Maestro operations over a resolved environment.
#[derive(Debug, Clone)]
pub struct Maestro<L = YamlCloudLoader> {
    resolver: EnvironmentResolver,
    layout: DirectoryLayout,
    validator: ConfigValidator<L>,
    discovery: CloudDiscovery<L>,
    archiver: ChefArchiveBuilder,
}

impl Maestro {
    /// Creates a Maestro instance loading YAML cloud definitions.
    #[must_use]
    pub const fn new(resolver: EnvironmentResolver) -> Self {
        Self {
            resolver,
            layout: DirectoryLayout::new(),
            validator: ConfigValidator::new(),
            discovery: CloudDiscovery::new(),
            archiver: ChefArchiveBuilder::new(),
        }
    }
}

impl<L: CloudLoader + Clone> Maestro<L> {
    /// Creates a Maestro instance with a custom cloud loader.
    #[must_use]
    pub fn with_loader(resolver: EnvironmentResolver, loader: L) -> Self {
        Self {
            resolver,
            layout: DirectoryLayout::new(),
            validator: ConfigValidator::with_loader(loader.clone()),
            discovery: CloudDiscovery::with_loader(loader),
            archiver: ChefArchiveBuilder::new(),
        }
    }
}

impl<L: CloudLoader> Maestro<L> {
    /// Uses a custom archive builder.
    #[must_use]
    pub fn with_archiver(mut self, archiver: ChefArchiveBuilder) -> Self {
        self.archiver = archiver;
        self
    }

    /// The resolver every operation goes through.
    #[must_use]
    pub const fn resolver(&self) -> &EnvironmentResolver {
        &self.resolver
    }

    /// Resolves the configuration root.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn config_root(&self) -> Result<ConfigRoot> {
        self.resolver.config_root()
    }

    /// Creates the Maestro config directory structure. Existing directories
    /// are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved, the config
    /// directory fails its preconditions, or a directory cannot be created.
    pub fn create_config_dirs(&self) -> Result<()> {
        let dir = self.resolver.config_dir()?;
        info!("Ensuring Maestro config directories under {}", dir.display());
        self.layout.ensure_config_tree(&dir)
    }

    /// Creates the Maestro log directories. Existing directories are left
    /// alone and creation failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved or the log
    /// directory fails its preconditions.
    pub fn create_log_dirs(&self) -> Result<()> {
        let dir = self.resolver.log_dir()?;
        info!("Ensuring Maestro log directories under {}", dir.display());
        self.layout.ensure_log_tree(&dir)
    }

    /// Validates the Maestro configuration.
    ///
    /// An unresolvable environment is reported as a failed validation rather
    /// than an error.
    #[must_use]
    pub fn validate_configs(&self) -> ValidationReport {
        match self.resolver.config_root() {
            Ok(root) => self.validator.validate(root.path()),
            Err(MaestroError::Config(e)) => ValidationReport::failure(e.to_string()),
            Err(e) => ValidationReport::failure(e.to_string()),
        }
    }

    /// Returns the clouds defined in the clouds configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn clouds(&self) -> Result<BTreeMap<String, Cloud>> {
        let root = self.resolver.config_root()?;
        Ok(self.discovery.discover(&root.clouds_dir()))
    }

    /// Returns the top level log directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn log_directory(&self) -> Result<PathBuf> {
        self.resolver.log_dir()
    }

    /// Returns the Maestro log directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn maestro_log_directory(&self) -> Result<PathBuf> {
        self.resolver.maestro_log_dir()
    }

    /// Packs the Chef cookbooks and roles into a `.tar.gz` and returns its
    /// path.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved or packaging
    /// fails.
    pub fn chef_archive(&self) -> Result<PathBuf> {
        let root = self.resolver.config_root()?;
        self.archiver.build(root.path())
    }
}
