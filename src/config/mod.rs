//! Configuration module for the Maestro configuration system.
//!
//! This module validates a resolved configuration root:
//! - Checking the expected `clouds/`, `cookbooks/`, and `roles/` layout
//! - Validating every discovered cloud definition
//! - Collecting the outcome into an ordered [`ValidationReport`]

mod report;
mod validator;

pub use report::ValidationReport;
pub use validator::ConfigValidator;
