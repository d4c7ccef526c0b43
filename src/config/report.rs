//! Validation report returned by the config validator.

use serde::Serialize;

/// Outcome of validating a Maestro configuration root.
///
/// `messages` holds human-readable lines in order: directory problems first,
/// then one `VALID:`/`INVALID:` line per cloud, each invalid cloud followed by
/// its errors indented by four spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    valid: bool,
    messages: Vec<String>,
}

impl ValidationReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(valid: bool, messages: Vec<String>) -> Self {
        Self { valid, messages }
    }

    /// Creates a failed report with a single message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, vec![message.into()])
    }

    /// Whether every check passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// The report lines, in order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}
