//! Maestro CLI entrypoint.
//!
//! This is the main entrypoint for the maestro command-line tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use maestro::archive::{archive_digest, ChefArchiveBuilder};
use maestro::cli::{Cli, Commands, OutputFormatter, ResolvedPaths};
use maestro::error::Result;
use maestro::Maestro;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Load .env before parsing so it can supply MAESTRO_DIR / MAESTRO_HOST_ROOT
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json);

    match dotenv {
        Ok(path) => debug!("Loaded environment from: {}", path.display()),
        Err(e) if e.not_found() => debug!(".env file not found"),
        Err(e) => eprintln!("Warning: failed to load .env file: {e}"),
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Runs the selected command, returning whether it succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let formatter = OutputFormatter::new(cli.output);
    let maestro = Maestro::new(cli.resolver());

    match &cli.command {
        Commands::Init {
            config_only,
            logs_only,
        } => cmd_init(&maestro, *config_only, *logs_only, &formatter),
        Commands::Validate => cmd_validate(&maestro, &formatter),
        Commands::Clouds { validate } => cmd_clouds(&maestro, *validate, &formatter),
        Commands::Archive { output_dir } => cmd_archive(maestro, output_dir.as_ref(), &formatter),
        Commands::Paths => cmd_paths(&maestro, &formatter),
    }
}

/// Create the config and log directory trees.
fn cmd_init(
    maestro: &Maestro,
    config_only: bool,
    logs_only: bool,
    formatter: &OutputFormatter,
) -> Result<bool> {
    if !logs_only {
        maestro.create_config_dirs()?;
    }
    if !config_only {
        maestro.create_log_dirs()?;
    }

    emit(&formatter.success("Maestro directories are in place"))?;
    Ok(true)
}

/// Validate the configuration; failure is reported through the exit code.
fn cmd_validate(maestro: &Maestro, formatter: &OutputFormatter) -> Result<bool> {
    let report = maestro.validate_configs();
    info!(
        "Validation finished: {}",
        if report.is_valid() { "valid" } else { "invalid" }
    );

    emit(&formatter.format_report(&report))?;
    Ok(report.is_valid())
}

/// List discovered clouds.
fn cmd_clouds(maestro: &Maestro, validate: bool, formatter: &OutputFormatter) -> Result<bool> {
    let mut clouds = maestro.clouds()?;

    let mut all_valid = true;
    if validate {
        for cloud in clouds.values_mut() {
            all_valid &= cloud.validate();
        }
    }

    emit(&formatter.format_clouds(&clouds))?;
    Ok(all_valid)
}

/// Package the Chef cookbooks and roles.
fn cmd_archive(
    maestro: Maestro,
    output_dir: Option<&PathBuf>,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let maestro = match output_dir {
        Some(dir) => maestro.with_archiver(ChefArchiveBuilder::new().with_output_dir(dir)),
        None => maestro,
    };

    let path = maestro.chef_archive()?;
    let digest = archive_digest(&path)?;

    emit(&formatter.format_archive(&path, &digest))?;
    Ok(true)
}

/// Show the active mode and resolved directories.
fn cmd_paths(maestro: &Maestro, formatter: &OutputFormatter) -> Result<bool> {
    let root = maestro.config_root()?;
    let paths = ResolvedPaths {
        mode: root.mode(),
        config_root: root.path().to_path_buf(),
        clouds: root.clouds_dir(),
        cookbooks: root.cookbooks_dir(),
        roles: root.roles_dir(),
        log: maestro.maestro_log_directory()?,
    };

    emit(&formatter.format_paths(&paths))?;
    Ok(true)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Writes command output to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}
