//! Error types for the Maestro configuration system.
//!
//! Three failure policies coexist: environment resolution, config-tree
//! creation, and archive building raise one of the errors below; validation
//! never raises and instead returns a [`ValidationReport`]; log-tree creation
//! logs its own failures and returns normally.
//!
//! [`ValidationReport`]: crate::config::ValidationReport

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Maestro configuration system.
#[derive(Debug, Error)]
pub enum MaestroError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A directory precondition was not met.
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Archive packaging errors.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a host root nor the standalone directory variable is defined.
    #[error("Maestro not configured correctly. Either MAESTRO_HOST_ROOT or MAESTRO_DIR must be defined")]
    Unresolved,

    /// A cloud configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A cloud configuration file could not be read or parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// The directory tree a precondition check was guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// The `maestro/{clouds,cookbooks,roles}` configuration tree.
    Config,
    /// The `maestro/clouds` log tree.
    Log,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("config"),
            Self::Log => f.write_str("log"),
        }
    }
}

/// Unmet preconditions on a target root directory.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// The target root does not exist.
    #[error("Cannot create Maestro {tree} directory structure: {} doesn't exist.", .path.display())]
    Missing {
        /// Tree being created.
        tree: TreeKind,
        /// The missing root.
        path: PathBuf,
    },

    /// The target root is not a directory.
    #[error("Cannot create Maestro {tree} directory structure: {} is not a directory.", .path.display())]
    NotADirectory {
        /// Tree being created.
        tree: TreeKind,
        /// The offending root.
        path: PathBuf,
    },

    /// The target root is not writable.
    #[error("Cannot create Maestro {tree} directory structure: {} is not writable.", .path.display())]
    NotWritable {
        /// Tree being created.
        tree: TreeKind,
        /// The read-only root.
        path: PathBuf,
    },
}

/// Archive packaging errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The configuration root to package does not exist.
    #[error("Maestro config directory does not exist: {}", .path.display())]
    RootMissing {
        /// The missing root.
        path: PathBuf,
    },

    /// Reading a source entry or writing the archive failed.
    #[error("Failed to archive {}: {source}", .path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Maestro operations.
pub type Result<T> = std::result::Result<T, MaestroError>;

impl MaestroError {
    /// Returns true if this error comes from an unresolvable environment.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Config(ConfigError::Unresolved))
    }
}

impl ConfigError {
    /// Creates a parse error tied to a source file.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }
}

impl ArchiveError {
    /// Wraps an I/O failure on `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
