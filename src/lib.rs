// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Maestro
//!
//! Environment-aware configuration management for cloud deployments.
//!
//! ## Overview
//!
//! Maestro works out where its configuration lives and keeps that tree in
//! shape. It can:
//!
//! - Resolve the configuration root for a hosted or standalone install
//! - Create the config and log directory trees idempotently
//! - Discover cloud definitions recursively under `clouds/`
//! - Validate the whole configuration and report every problem at once
//! - Package `cookbooks/` and `roles/` into a `.tar.gz` for Chef
//!
//! ## Environment
//!
//! `MAESTRO_HOST_ROOT` selects hosted mode and wins over `MAESTRO_DIR`,
//! which selects standalone mode. With neither set every operation fails
//! with [`error::ConfigError::Unresolved`].
//!
//! ## Modules
//!
//! - [`environment`]: Mode and configuration root resolution
//! - [`layout`]: Directory tree creation
//! - [`cloud`]: Cloud definitions and discovery
//! - [`config`]: Configuration validation
//! - [`archive`]: Chef asset packaging
//! - [`workspace`]: The [`Maestro`] entry point
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # config/maestro/clouds/prod.yml
//! provider: aws
//! region: us-east-1
//! keypair_name: deploy
//! keypair_file: ~/.ssh/deploy.pem
//! aws_account_id: "123456789012"
//! aws_access_key: AKIA...
//! aws_secret_access_key: secret
//! chef_bucket: maestro-chef
//! roles:
//!   web:
//!     public_ports: [80, 443]
//! nodes:
//!   web-1:
//!     role: web
//!     ami: ami-0abcdef
//!     instance_type: t3.small
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod archive;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod environment;
pub mod error;
pub mod layout;
pub mod workspace;

// ============================================================================
// Re-exports
// ============================================================================

pub use archive::{archive_digest, ChefArchiveBuilder};
pub use cli::{Cli, Commands, OutputFormatter};
pub use cloud::{Cloud, CloudDiscovery, CloudLoader, CloudSpec, YamlCloudLoader};
pub use config::{ConfigValidator, ValidationReport};
pub use environment::{ConfigRoot, EnvironmentMode, EnvironmentResolver};
pub use error::{MaestroError, Result};
pub use layout::DirectoryLayout;
pub use workspace::Maestro;
