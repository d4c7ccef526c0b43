//! CLI module for the Maestro tool.
//!
//! This module provides the command-line interface for setting up,
//! validating, and packaging Maestro configurations.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::{OutputFormatter, ResolvedPaths};
