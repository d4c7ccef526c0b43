//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

use crate::cloud::Cloud;
use crate::config::ValidationReport;
use crate::environment::EnvironmentMode;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Cloud row for table display.
#[derive(Tabled)]
struct CloudRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "File")]
    file: String,
}

/// Resolved directories shown by `maestro paths`.
#[derive(Debug, Serialize)]
pub struct ResolvedPaths {
    /// Active mode.
    pub mode: EnvironmentMode,
    /// Configuration root.
    pub config_root: PathBuf,
    /// Clouds directory.
    pub clouds: PathBuf,
    /// Cookbooks directory.
    pub cookbooks: PathBuf,
    /// Roles directory.
    pub roles: PathBuf,
    /// Maestro log directory.
    pub log: PathBuf,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a validation report for display.
    #[must_use]
    pub fn format_report(&self, report: &ValidationReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report),
        }
    }

    /// Formats a report as text.
    fn format_report_text(report: &ValidationReport) -> String {
        let mut output = String::new();

        for message in report.messages() {
            let line = if let Some(rest) = message.strip_prefix("VALID: ") {
                format!("{} {rest}", "VALID:".green())
            } else if let Some(rest) = message.strip_prefix("INVALID: ") {
                format!("{} {rest}", "INVALID:".red())
            } else if message.starts_with("    ") {
                message.clone()
            } else {
                message.yellow().to_string()
            };
            let _ = writeln!(output, "{line}");
        }

        if report.is_valid() {
            let _ = writeln!(output, "\n{} Maestro configuration is valid", "✓".green());
        } else {
            let _ = writeln!(output, "\n{} Maestro configuration is invalid", "✗".red());
        }

        output
    }

    /// Formats discovered clouds for display.
    #[must_use]
    pub fn format_clouds(&self, clouds: &BTreeMap<String, Cloud>) -> String {
        match self.format {
            OutputFormat::Json => {
                let list: Vec<&Cloud> = clouds.values().collect();
                serde_json::to_string_pretty(&list).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_clouds_text(clouds),
        }
    }

    /// Formats clouds as text.
    fn format_clouds_text(clouds: &BTreeMap<String, Cloud>) -> String {
        if clouds.is_empty() {
            return String::from("No clouds defined.\n");
        }

        let rows: Vec<CloudRow> = clouds
            .values()
            .map(|cloud| CloudRow {
                name: cloud.name().to_string(),
                status: Self::format_validity(cloud.valid()),
                file: cloud.config_file().display().to_string(),
            })
            .collect();

        let mut output = Table::new(rows).to_string();
        output.push('\n');

        for cloud in clouds.values().filter(|c| c.valid() == Some(false)) {
            let _ = writeln!(output, "\n{}:", cloud.name().bold());
            for error in cloud.validation_errors() {
                let _ = writeln!(output, "   - {error}");
            }
        }

        output
    }

    /// Formats the result of packaging the Chef archive.
    #[must_use]
    pub fn format_archive(&self, path: &Path, sha256: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "path": path, "sha256": sha256 });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!(
                "{} Chef assets archived\n   Path:   {}\n   SHA256: {sha256}\n",
                "✓".green(),
                path.display()
            ),
        }
    }

    /// Formats the resolved directories.
    #[must_use]
    pub fn format_paths(&self, paths: &ResolvedPaths) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(paths).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = writeln!(output, "Mode:        {}", paths.mode.to_string().bold());
                let _ = writeln!(output, "Config root: {}", paths.config_root.display());
                let _ = writeln!(output, "Clouds:      {}", paths.clouds.display());
                let _ = writeln!(output, "Cookbooks:   {}", paths.cookbooks.display());
                let _ = writeln!(output, "Roles:       {}", paths.roles.display());
                let _ = writeln!(output, "Logs:        {}", paths.log.display());
                output
            }
        }
    }

    /// Formats a success message.
    #[must_use]
    pub fn success(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "success", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✓".green()),
        }
    }

    /// Formats a cloud's validity with color.
    fn format_validity(valid: Option<bool>) -> String {
        match valid {
            Some(true) => "valid".green().to_string(),
            Some(false) => "invalid".red().to_string(),
            None => "unchecked".dimmed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::CloudSpec;

    #[test]
    fn test_report_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let report = ValidationReport::new(
            false,
            vec![String::from("INVALID: /c/prod.yml"), String::from("    missing region")],
        );

        let json: serde_json::Value =
            serde_json::from_str(&formatter.format_report(&report)).expect("Invalid JSON");
        assert_eq!(json["valid"], false);
        assert_eq!(json["messages"][1], "    missing region");
    }

    #[test]
    fn test_report_text_keeps_every_line() {
        colored::control::set_override(false);
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let report = ValidationReport::new(
            false,
            vec![String::from("INVALID: /c/prod.yml"), String::from("    missing region")],
        );

        let text = formatter.format_report(&report);
        assert!(text.contains("INVALID: /c/prod.yml"));
        assert!(text.contains("\n    missing region\n"));
        assert!(text.contains("configuration is invalid"));
    }

    #[test]
    fn test_clouds_table_lists_errors() {
        colored::control::set_override(false);
        let mut cloud = Cloud::new("prod", "/c/prod.yml", Ok(CloudSpec::default()));
        cloud.validate();
        let clouds = BTreeMap::from([(String::from("prod"), cloud)]);

        let text = OutputFormatter::new(OutputFormat::Text).format_clouds(&clouds);
        assert!(text.contains("prod"));
        assert!(text.contains("invalid"));
        assert!(text.contains("- missing provider"));
    }

    #[test]
    fn test_no_clouds() {
        let text = OutputFormatter::new(OutputFormat::Text).format_clouds(&BTreeMap::new());
        assert_eq!(text, "No clouds defined.\n");
    }

    #[test]
    fn test_archive_json() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_archive(Path::new("/tmp/maestro_chef_assets.tar.gz"), "abc123");
        let json: serde_json::Value = serde_json::from_str(&output).expect("Invalid JSON");
        assert_eq!(json["path"], "/tmp/maestro_chef_assets.tar.gz");
        assert_eq!(json["sha256"], "abc123");
    }
}
