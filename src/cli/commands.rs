//! Command implementations for the CNAB processor CLI
//!
//! ## Architecture
//!
//! - [`shared`] - Logging setup, configuration loading, progress bars and output helpers
//! - [`process`] - One-shot processing of explicit files
//! - [`watch`] - Directory polling loop
//! - [`inspect`] - Read-only analysis of a single file

pub mod inspect;
pub mod process;
pub mod shared;
pub mod watch;

pub use shared::CommandOutcome;

use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch the parsed arguments to their command
///
/// The token is checked between files and during the watch sleep, so a
/// cancelled run always leaves complete output files behind.
pub async fn run(args: Args, token: CancellationToken) -> anyhow::Result<CommandOutcome> {
    match args.command {
        Some(Commands::Watch(args)) => watch::run_watch(args, token).await,
        Some(Commands::Process(args)) => process::run_process(args, token).await,
        Some(Commands::Inspect(args)) => inspect::run_inspect(args).await,
        None => Ok(CommandOutcome::default()),
    }
}
