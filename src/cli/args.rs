//! Command-line argument definitions for the CNAB processor
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares the same logging, configuration and output options.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the CNAB processor
///
/// Filters CNAB400 bank return files by operation code, splits advance
/// settlements into their own file and exports them as a spreadsheet.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cnab-processor",
    version,
    about = "Filter and split CNAB400 bank return files",
    long_about = "Processes fixed-width CNAB400 return files from Banco do Brasil and Bradesco. \
                  Keeps the data records whose operation code is allowed for the bank, optionally \
                  splits normal and advance settlements into separate files, exports advance \
                  settlements as CSV or XLSX and writes a processing report next to each file."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Poll the configured directories and process new return files
    Watch(WatchArgs),
    /// Process the given return files once
    Process(ProcessArgs),
    /// Show bank detection and record statistics for a file without writing anything
    Inspect(InspectArgs),
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Watch(args) => &args.common,
            Commands::Process(args) => &args.common,
            Commands::Inspect(args) => &args.common,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Environment file with processing settings
    ///
    /// Values from the process environment take precedence. When omitted,
    /// `./.env` is read if present.
    #[arg(long = "env-file", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

impl CommonArgs {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are shown for human output outside quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet && matches!(self.output_format, OutputFormat::Human)
    }
}

/// Arguments for the watch command
#[derive(Debug, Clone, Parser)]
pub struct WatchArgs {
    /// Run a single scan cycle and exit
    #[arg(long = "once")]
    pub once: bool,

    /// Override CHECK_INTERVAL (seconds between cycles)
    #[arg(long = "interval", value_name = "SECONDS")]
    pub interval: Option<u64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Return files to process
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Run the pipeline and print statistics without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Record successfully processed files in the ledger
    #[arg(long = "record")]
    pub record: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Return file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of export rows to preview
    #[arg(long = "preview", default_value_t = 5)]
    pub preview: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}
