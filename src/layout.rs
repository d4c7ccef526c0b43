//! Idempotent creation of the Maestro directory trees.
//!
//! The config tree is created under `<base>/config`:
//!
//! ```text
//! maestro/
//! maestro/clouds/
//! maestro/cookbooks/
//! maestro/roles/
//! ```
//!
//! and the log tree under `<base>/log`:
//!
//! ```text
//! maestro/
//! maestro/clouds/
//! ```
//!
//! A failure while creating the config tree is returned to the caller. A
//! failure while creating the log tree is logged and swallowed.

use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::error::{PreconditionError, Result, TreeKind};

/// Subdirectories making up the config tree, parents first.
pub const CONFIG_SUBDIRECTORIES: &[&str] = &[
    "maestro",
    "maestro/clouds",
    "maestro/cookbooks",
    "maestro/roles",
];

/// Subdirectories making up the log tree, parents first.
pub const LOG_SUBDIRECTORIES: &[&str] = &["maestro", "maestro/clouds"];

/// Creates the Maestro config and log directory trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryLayout;

impl DirectoryLayout {
    /// Creates a new directory layout manager.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates any missing config subdirectories under `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`PreconditionError`] if `root` is missing, not a directory,
    /// or not writable, and an I/O error if a subdirectory cannot be created.
    pub fn ensure_config_tree(&self, root: &Path) -> Result<()> {
        check_root(root, TreeKind::Config)?;
        create_missing(root, CONFIG_SUBDIRECTORIES)
    }

    /// Creates any missing log subdirectories under `root`.
    ///
    /// Creation failures are logged and never returned, so logging setup
    /// cannot abort the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`PreconditionError`] if `root` is missing, not a directory,
    /// or not writable.
    pub fn ensure_log_tree(&self, root: &Path) -> Result<()> {
        check_root(root, TreeKind::Log)?;
        if let Err(e) = create_missing(root, LOG_SUBDIRECTORIES) {
            error!("Error creating Maestro log directory under {}", root.display());
            error!("{e}");
        }
        Ok(())
    }
}

/// Checks that `root` exists, is a directory, and is writable.
fn check_root(root: &Path, tree: TreeKind) -> std::result::Result<(), PreconditionError> {
    let path = root.to_path_buf();

    if !root.exists() {
        return Err(PreconditionError::Missing { tree, path });
    }

    let metadata = fs::metadata(root).map_err(|_| PreconditionError::Missing {
        tree,
        path: path.clone(),
    })?;

    if !metadata.is_dir() {
        return Err(PreconditionError::NotADirectory { tree, path });
    }

    if !is_writable(root, &metadata) {
        return Err(PreconditionError::NotWritable { tree, path });
    }

    Ok(())
}

/// Whether the current process may create entries in `dir`.
///
/// A directory without any write bit is never writable, even for a
/// privileged user.
fn is_writable(dir: &Path, metadata: &fs::Metadata) -> bool {
    if metadata.permissions().readonly() {
        return false;
    }

    #[cfg(unix)]
    {
        use nix::unistd::{access, AccessFlags};
        access(dir, AccessFlags::W_OK).is_ok()
    }

    #[cfg(not(unix))]
    {
        let _ = dir;
        true
    }
}

/// Creates each subdirectory that does not already exist.
fn create_missing(root: &Path, subdirectories: &[&str]) -> Result<()> {
    for subdirectory in subdirectories {
        let dir = root.join(subdirectory);
        if !dir.exists() {
            fs::create_dir(&dir)?;
            info!("Created {}", dir.display());
        }
    }
    Ok(())
}
