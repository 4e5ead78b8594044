//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::models::BankTag;
use crate::app::services::file_runner::FileRunReport;
use crate::app::services::record_processor::RunStatistics;
use crate::cli::args::CommonArgs;
use crate::config::Config;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use crate::app::services::report::format_size;

/// Result of a CLI command, used for the exit status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Files that failed to process
    pub failed: usize,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// What happened to one file in a `process` run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Processed {
        report: Box<FileRunReport>,
    },
    /// Dry run: the pipeline ran but nothing was written
    Analyzed {
        bank: BankTag,
        split_enabled: bool,
        export_records: usize,
        statistics: RunStatistics,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

/// A file and its outcome
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Set up structured logging for a command
pub fn setup_logging(args: &CommonArgs) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cnab_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration from the env file and the process environment
pub fn load_configuration(args: &CommonArgs) -> anyhow::Result<Config> {
    match &args.env_file {
        Some(path) => info!("Using env file: {}", path.display()),
        None if Path::new(".env").exists() => info!("Using ./.env"),
        None => info!("No env file found, using the process environment"),
    }

    let config = Config::load(args.env_file.as_deref()).with_context(|| match &args.env_file {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })?;

    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    println!("{}", text);
    Ok(())
}

/// Short file name for display
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::OutputFormat;
    use tempfile::TempDir;

    fn common(env_file: Option<PathBuf>) -> CommonArgs {
        CommonArgs {
            env_file,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }

    #[test]
    fn test_command_outcome() {
        assert!(CommandOutcome::default().is_success());
        assert!(!CommandOutcome { failed: 2 }.is_success());
    }

    #[test]
    fn test_load_configuration_from_env_file() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("test.env");
        std::fs::write(&env, "BB_ENABLE=true\nBB_OPERACAO=06,09\nCHECK_INTERVAL=5\n").unwrap();

        let config = load_configuration(&common(Some(env))).unwrap();
        let bb = config.bank_config(BankTag::Bb);
        assert!(bb.enabled);
        assert!(bb.allows(Some("09")));
        assert_eq!(config.check_interval_secs, 5);
    }

    #[test]
    fn test_load_configuration_missing_file_has_context() {
        let dir = TempDir::new().unwrap();
        let err = load_configuration(&common(Some(dir.path().join("absent.env")))).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to load configuration from"));
        assert!(message.contains("absent.env"));
    }

    #[test]
    fn test_file_result_serializes_flat() {
        let result = FileResult {
            file: PathBuf::from("CB01.RET"),
            outcome: FileOutcome::Skipped {
                reason: "Processing disabled for bank BB".to_string(),
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["file"], "CB01.RET");
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["reason"], "Processing disabled for bank BB");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/CB01.RET")), "CB01.RET");
    }
}
