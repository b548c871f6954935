//! Binary entry point for roster.
//!
//! This binary provides the CLI interface for triaging a directory roster.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use roster::cli::{cmd_import, cmd_status, cmd_triage, env_or_prompt_token};
use roster::config::RosterConfig;
use roster::directory::{
    DirectoryFetcher, FixtureFetcher, RecurseDirectoryClient, fixture_dataset,
};
use roster::observability;
use roster::session::{NoopOpener, SystemBrowser, TerminalPrompter, UrlOpener};
use roster::storage::{FilesystemSnapshotStore, MemorySnapshotStore, SnapshotBackend};
use std::path::PathBuf;
use std::process::ExitCode;

/// Roster - triage a community directory one person at a time.
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run offline against fixture data; nothing is read from or written to disk.
    #[arg(long, global = true)]
    debug: bool,

    /// Path of the current snapshot.
    #[arg(long, global = true, value_name = "PATH")]
    current_snapshot: Option<PathBuf>,

    /// Path of the backup snapshot.
    #[arg(long, global = true, value_name = "PATH")]
    backup_snapshot: Option<PathBuf>,

    /// Directory offset to fetch new people from.
    #[arg(long, global = true, value_name = "N")]
    initial_offset: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Don't open profiles in a browser.
    #[arg(long, global = true)]
    no_browser: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Browse and rate people interactively (default).
    Triage,

    /// Merge another snapshot file into the current snapshot.
    Import {
        /// Snapshot file to merge in.
        path: PathBuf,
    },

    /// Show disposition counts.
    Status,
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration and applies command-line overrides.
fn load_config(cli: &Cli) -> roster::Result<RosterConfig> {
    let mut config = RosterConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.current_snapshot {
        config = config.with_primary_snapshot(path);
    }
    if let Some(path) = &cli.backup_snapshot {
        config = config.with_backup_snapshot(path);
    }
    if let Some(offset) = cli.initial_offset {
        config = config.with_initial_offset(offset);
    }
    if cli.no_browser {
        config.session.open_browser = false;
    }
    Ok(config)
}

/// Runs the selected command.
fn run_command(mut cli: Cli, config: &RosterConfig) -> roster::Result<()> {
    let store: Box<dyn SnapshotBackend> = if cli.debug {
        tracing::info!("Debug mode: using in-memory fixture snapshot");
        Box::new(MemorySnapshotStore::with_primary(fixture_dataset()))
    } else {
        Box::new(FilesystemSnapshotStore::new(
            &config.snapshot.primary,
            &config.snapshot.backup,
        ))
    };

    match cli.command.take().unwrap_or(Commands::Triage) {
        Commands::Triage => {
            let fetcher: Box<dyn DirectoryFetcher> = if cli.debug {
                Box::new(FixtureFetcher::sample())
            } else {
                Box::new(RecurseDirectoryClient::new(
                    config.directory_http(),
                    env_or_prompt_token(TerminalPrompter::stdio),
                ))
            };
            let opener: Box<dyn UrlOpener> = if cli.debug || !config.session.open_browser {
                Box::new(NoopOpener)
            } else {
                Box::new(SystemBrowser)
            };
            let mut settings = config.session_settings();
            if cli.debug && cli.initial_offset.is_none() {
                // The fixture directory is tiny; start at its beginning.
                settings.initial_offset = 0;
            }
            let mut prompter = TerminalPrompter::stdio();

            cmd_triage(
                store.as_ref(),
                fetcher.as_ref(),
                opener.as_ref(),
                &mut prompter,
                settings,
            )?;
        },
        Commands::Import { path } => {
            let report = cmd_import(store.as_ref(), &path)?;
            println!(
                "{} new rows added ({} already known)",
                report.added, report.already_known
            );
        },
        Commands::Status => {
            cmd_status(store.as_ref())?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&["roster"], None ; "no subcommand")]
    #[test_case(&["roster", "triage"], Some(Commands::Triage) ; "triage")]
    #[test_case(&["roster", "status"], Some(Commands::Status) ; "status")]
    #[test_case(&["roster", "import", "other.json"], Some(Commands::Import { path: PathBuf::from("other.json") }) ; "import")]
    fn test_parse_commands(args: &[&str], expected: Option<Commands>) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        assert_eq!(cli.command, expected);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "roster",
            "status",
            "--debug",
            "--current-snapshot",
            "a.json",
            "--backup-snapshot",
            "b.json",
            "--initial-offset",
            "12",
            "--no-browser",
            "-v",
        ])
        .unwrap();

        assert!(cli.debug);
        assert!(cli.no_browser);
        assert!(cli.verbose);
        assert_eq!(cli.current_snapshot, Some(PathBuf::from("a.json")));
        assert_eq!(cli.backup_snapshot, Some(PathBuf::from("b.json")));
        assert_eq!(cli.initial_offset, Some(12));
    }

    #[test]
    fn test_negative_offset_rejected() {
        assert!(Cli::try_parse_from(["roster", "--initial-offset", "-1"]).is_err());
    }

    #[test]
    fn test_import_requires_path() {
        assert!(Cli::try_parse_from(["roster", "import"]).is_err());
    }
}
