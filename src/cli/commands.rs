//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::environment::{EnvironmentResolver, HOST_ROOT_ENV_VAR, MAESTRO_DIR_ENV_VAR};

/// Maestro - Cloud configuration discovery, validation, and packaging.
#[derive(Parser, Debug)]
#[command(name = "maestro")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Host application root (selects hosted mode). Empty means unset.
    #[arg(long, global = true, env = HOST_ROOT_ENV_VAR)]
    pub host_root: Option<OsString>,

    /// Standalone Maestro base directory. Empty means unset.
    #[arg(long, global = true, env = MAESTRO_DIR_ENV_VAR)]
    pub maestro_dir: Option<OsString>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the Maestro config and log directories.
    Init {
        /// Only create the config directories.
        #[arg(long, conflicts_with = "logs_only")]
        config_only: bool,

        /// Only create the log directories.
        #[arg(long)]
        logs_only: bool,
    },

    /// Validate the Maestro configuration.
    Validate,

    /// List the clouds found in the clouds directory.
    Clouds {
        /// Validate each cloud and show its errors.
        #[arg(short, long)]
        validate: bool,
    },

    /// Package the Chef cookbooks and roles into a .tar.gz.
    Archive {
        /// Directory to write the archive to (defaults to the temp directory).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Show the active mode and resolved directories.
    Paths,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the environment resolver from the parsed flags.
    ///
    /// Flags already carry the environment variables, so the resolver does
    /// not consult the process environment again.
    #[must_use]
    pub fn resolver(&self) -> EnvironmentResolver {
        let mut resolver = EnvironmentResolver::isolated();
        if let Some(root) = non_empty(self.host_root.as_ref()) {
            resolver = resolver.with_host_root(root);
        }
        if let Some(dir) = non_empty(self.maestro_dir.as_ref()) {
            resolver = resolver.with_maestro_dir(dir);
        }
        resolver
    }
}

fn non_empty(value: Option<&OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}
