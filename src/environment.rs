//! Environment resolution for the Maestro configuration root.
//!
//! Exactly one of two strategies is active per resolution:
//!
//! - **Hosted**: rooted at a host application directory, either injected by the
//!   embedding application or named by `MAESTRO_HOST_ROOT`.
//! - **Standalone**: rooted at the directory named by `MAESTRO_DIR`.
//!
//! Hosted wins when both are present. When neither is present resolution fails
//! with [`ConfigError::Unresolved`]. Every resolution re-inspects its inputs, so
//! changes to the process environment are picked up on the next call.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// ENV key used to point to a standalone Maestro base directory.
pub const MAESTRO_DIR_ENV_VAR: &str = "MAESTRO_DIR";

/// ENV key used to point to a host application root.
pub const HOST_ROOT_ENV_VAR: &str = "MAESTRO_HOST_ROOT";

/// Directory under the base holding configuration.
const CONFIG_DIRECTORY: &str = "config";

/// Directory under the base holding logs.
const LOG_DIRECTORY: &str = "log";

/// Maestro's own directory inside the config and log directories.
pub const MAESTRO_DIRECTORY: &str = "maestro";

/// Cloud definitions directory inside the config root.
pub const CLOUDS_DIRECTORY: &str = "clouds";

/// Chef cookbooks directory inside the config root.
pub const COOKBOOKS_DIRECTORY: &str = "cookbooks";

/// Chef roles directory inside the config root.
pub const ROLES_DIRECTORY: &str = "roles";

/// Which configuration-root strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    /// Rooted at a host application directory.
    Hosted,
    /// Rooted at the `MAESTRO_DIR` directory.
    Standalone,
}

impl fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hosted => f.write_str("hosted"),
            Self::Standalone => f.write_str("standalone"),
        }
    }
}

/// A resolved, absolute Maestro configuration root (`<base>/config/maestro`).
///
/// Only [`EnvironmentResolver`] constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    path: PathBuf,
    mode: EnvironmentMode,
}

impl ConfigRoot {
    /// Absolute path of the configuration root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode that produced this root.
    #[must_use]
    pub const fn mode(&self) -> EnvironmentMode {
        self.mode
    }

    /// The clouds directory under this root.
    #[must_use]
    pub fn clouds_dir(&self) -> PathBuf {
        clouds_config_dir(&self.path)
    }

    /// The cookbooks directory under this root.
    #[must_use]
    pub fn cookbooks_dir(&self) -> PathBuf {
        cookbooks_dir(&self.path)
    }

    /// The roles directory under this root.
    #[must_use]
    pub fn roles_dir(&self) -> PathBuf {
        roles_dir(&self.path)
    }
}

impl AsRef<Path> for ConfigRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Resolves the active mode and the canonical Maestro paths.
#[derive(Debug, Clone)]
pub struct EnvironmentResolver {
    /// Host root injected by an embedding application.
    host_root: Option<PathBuf>,
    /// Standalone base directory supplied explicitly.
    maestro_dir: Option<PathBuf>,
    /// Whether the process environment is consulted after explicit values.
    inherit_env: bool,
}

impl EnvironmentResolver {
    /// Creates a resolver that reads the process environment on every call.
    #[must_use]
    pub const fn from_env() -> Self {
        Self {
            host_root: None,
            maestro_dir: None,
            inherit_env: true,
        }
    }

    /// Creates a resolver that only sees explicitly supplied values.
    #[must_use]
    pub const fn isolated() -> Self {
        Self {
            host_root: None,
            maestro_dir: None,
            inherit_env: false,
        }
    }

    /// Registers a host application root, selecting hosted mode.
    #[must_use]
    pub fn with_host_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.host_root = Some(root.into());
        self
    }

    /// Supplies the standalone base directory explicitly.
    #[must_use]
    pub fn with_maestro_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.maestro_dir = Some(dir.into());
        self
    }

    /// Determines the active mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unresolved`] if neither indicator is present.
    pub fn mode(&self) -> Result<EnvironmentMode> {
        self.base().map(|(mode, _)| mode)
    }

    /// Resolves the configuration root, `<base>/config/maestro`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn config_root(&self) -> Result<ConfigRoot> {
        let (mode, base) = self.base()?;
        Ok(ConfigRoot {
            path: base.join(CONFIG_DIRECTORY).join(MAESTRO_DIRECTORY),
            mode,
        })
    }

    /// Resolves the config directory, `<base>/config`, under which the
    /// Maestro config tree is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn config_dir(&self) -> Result<PathBuf> {
        Ok(self.base()?.1.join(CONFIG_DIRECTORY))
    }

    /// Resolves the top level log directory, `<base>/log`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.base()?.1.join(LOG_DIRECTORY))
    }

    /// Resolves the Maestro log directory, `<base>/log/maestro`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be resolved.
    pub fn maestro_log_dir(&self) -> Result<PathBuf> {
        Ok(self.log_dir()?.join(MAESTRO_DIRECTORY))
    }

    fn host_root(&self) -> Option<PathBuf> {
        self.host_root
            .clone()
            .or_else(|| self.inherited(HOST_ROOT_ENV_VAR))
    }

    fn maestro_dir(&self) -> Option<PathBuf> {
        self.maestro_dir
            .clone()
            .or_else(|| self.inherited(MAESTRO_DIR_ENV_VAR))
    }

    fn inherited(&self, name: &str) -> Option<PathBuf> {
        if !self.inherit_env {
            return None;
        }
        std::env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// The single place the hosted / standalone / unresolved branch lives.
    fn base(&self) -> Result<(EnvironmentMode, PathBuf)> {
        let (mode, base) = if let Some(root) = self.host_root() {
            (EnvironmentMode::Hosted, root)
        } else if let Some(dir) = self.maestro_dir() {
            (EnvironmentMode::Standalone, dir)
        } else {
            return Err(ConfigError::Unresolved.into());
        };

        let base = std::path::absolute(&base)?;
        debug!("Resolved {mode} base directory: {}", base.display());
        Ok((mode, base))
    }
}

impl Default for EnvironmentResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

/// The clouds directory under a config root.
#[must_use]
pub fn clouds_config_dir(config_root: &Path) -> PathBuf {
    config_root.join(CLOUDS_DIRECTORY)
}

/// The cookbooks directory under a config root.
#[must_use]
pub fn cookbooks_dir(config_root: &Path) -> PathBuf {
    config_root.join(COOKBOOKS_DIRECTORY)
}

/// The roles directory under a config root.
#[must_use]
pub fn roles_dir(config_root: &Path) -> PathBuf {
    config_root.join(ROLES_DIRECTORY)
}
