//! Watch command implementation

use super::shared::{CommandOutcome, load_configuration, print_json, setup_logging};
use crate::app::adapters::ledger::MarkdownLedger;
use crate::app::services::file_runner::FileRunner;
use crate::app::services::watcher::{WatchSummary, Watcher};
use crate::cli::args::{OutputFormat, WatchArgs};
use colored::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Poll the configured directories until cancelled, or once with `--once`
pub async fn run_watch(args: WatchArgs, token: CancellationToken) -> anyhow::Result<CommandOutcome> {
    setup_logging(&args.common)?;
    let mut config = load_configuration(&args.common)?;
    if let Some(seconds) = args.interval {
        config.check_interval_secs = seconds;
        config.validate()?;
    }

    let ledger = MarkdownLedger::new(config.ledger_path.clone());
    let interval = config.check_interval();
    let dirs = config.watch_dirs();

    if !args.common.quiet && args.common.output_format == OutputFormat::Human {
        println!("{}", "👀 Watching for CNAB return files".bright_green().bold());
        for dir in &dirs {
            println!("   • {}", dir.display());
        }
        println!("   • Ledger: {}", ledger.path().display());
        println!("   • Interval: {}s", interval.as_secs());
        if !args.once {
            println!("   Press Ctrl+C to stop");
        }
    }

    let mut watcher = Watcher::new(FileRunner::new(config), ledger).with_interval(interval);

    let summary = if args.once {
        let totals = watcher.run_cycle(Some(&token));
        WatchSummary { cycles: 1, totals }
    } else {
        watcher.run(token).await
    };

    info!("Watch finished after {} cycle(s)", summary.cycles);
    match args.common.output_format {
        OutputFormat::Human => {
            if !args.common.quiet {
                print_human_summary(&summary, interval);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": summary,
            "last_cycle_files": watcher.reports(),
        }))?,
    }

    Ok(CommandOutcome {
        failed: summary.totals.failed,
    })
}

fn print_human_summary(summary: &WatchSummary, interval: Duration) {
    let totals = &summary.totals;
    println!("\n{}", "🛑 Watcher stopped".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Watch Summary:");
    println!(
        "   • Cycles run: {} (every {}s)",
        summary.cycles,
        interval.as_secs()
    );
    println!(
        "   • Files processed: {}",
        totals.processed.to_string().bright_white().bold()
    );
    println!("   • Already processed: {}", totals.already_processed);
    println!("   • Skipped: {}", totals.skipped);
    if totals.with_warnings > 0 {
        println!(
            "   • Processed with warnings: {}",
            totals.with_warnings.to_string().yellow()
        );
    }
    if totals.failed > 0 {
        println!(
            "   • Failed: {}",
            totals.failed.to_string().bright_red().bold()
        );
    }
    println!();
}
