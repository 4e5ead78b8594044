//! Process command implementation
//!
//! Runs explicit files through the pipeline once, with a progress bar for
//! multi-file runs, and prints a summary in the requested format.

use super::shared::{
    CommandOutcome, FileOutcome, FileResult, create_progress_bar, display_name, format_size,
    load_configuration, print_json, setup_logging,
};
use crate::app::adapters::ledger::{MarkdownLedger, ProcessedLedger};
use crate::app::services::file_runner::FileRunner;
use crate::app::services::report::ExportStatus;
use crate::cli::args::{OutputFormat, ProcessArgs};
use colored::*;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Process command runner
pub async fn run_process(
    args: ProcessArgs,
    token: CancellationToken,
) -> anyhow::Result<CommandOutcome> {
    let start_time = Instant::now();
    setup_logging(&args.common)?;

    info!("Starting CNAB processor");
    debug!("Command line arguments: {:?}", args);

    let config = load_configuration(&args.common)?;
    let mut ledger = args
        .record
        .then(|| MarkdownLedger::new(config.ledger_path.clone()));
    let runner = FileRunner::new(config);

    let progress = (args.common.show_progress() && args.files.len() > 1)
        .then(|| create_progress_bar(args.files.len() as u64, "Processing files"));

    let mut results = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if token.is_cancelled() {
            warn!("Interrupted, {} file(s) not processed", args.files.len() - results.len());
            break;
        }
        if let Some(pb) = &progress {
            pb.set_message(display_name(path));
        }

        let outcome = if args.dry_run {
            analyze_file(&runner, path)
        } else {
            process_file(&runner, path, ledger.as_mut())
        };
        results.push(FileResult {
            file: path.clone(),
            outcome,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let failed = results
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Failed { .. }))
        .count();

    match args.common.output_format {
        OutputFormat::Human => {
            if !args.common.quiet {
                print_human_summary(&results, start_time.elapsed(), args.dry_run);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "dry_run": args.dry_run,
            "processing_time_seconds": start_time.elapsed().as_secs_f64(),
            "files": results,
        }))?,
    }

    Ok(CommandOutcome { failed })
}

fn process_file(
    runner: &FileRunner,
    path: &Path,
    ledger: Option<&mut MarkdownLedger>,
) -> FileOutcome {
    match runner.run(path) {
        Ok(report) => {
            if let Some(ledger) = ledger {
                if let Err(e) = ledger.record(&display_name(path)) {
                    warn!("Could not record {}: {}", path.display(), e);
                }
            }
            FileOutcome::Processed {
                report: Box::new(report),
            }
        }
        Err(e) if e.is_skip() => {
            info!("Skipping {}: {}", path.display(), e);
            FileOutcome::Skipped {
                reason: e.to_string(),
            }
        }
        Err(e) => {
            error!("Failed to process {}: {}", path.display(), e);
            FileOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn analyze_file(runner: &FileRunner, path: &Path) -> FileOutcome {
    match runner.analyze(path) {
        Ok(analysis) => FileOutcome::Analyzed {
            bank: analysis.file.bank,
            split_enabled: analysis.outcome.split_enabled,
            export_records: analysis.export_records.len(),
            statistics: analysis.outcome.statistics,
        },
        Err(e) if e.is_skip() => FileOutcome::Skipped {
            reason: e.to_string(),
        },
        Err(e) => FileOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

fn print_human_summary(results: &[FileResult], elapsed: Duration, dry_run: bool) {
    let count = |predicate: fn(&FileOutcome) -> bool| {
        results.iter().filter(|r| predicate(&r.outcome)).count()
    };
    let processed = count(|o| {
        matches!(
            o,
            FileOutcome::Processed { .. } | FileOutcome::Analyzed { .. }
        )
    });
    let skipped = count(|o| matches!(o, FileOutcome::Skipped { .. }));
    let failed = count(|o| matches!(o, FileOutcome::Failed { .. }));

    let title = if dry_run {
        "🔍 CNAB Dry Run Complete!"
    } else {
        "🎉 CNAB Processing Complete!"
    };
    println!("\n{}", title.bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Processing Summary:");
    println!(
        "   • Files {}: {}",
        if dry_run { "analyzed" } else { "processed" },
        processed.to_string().bright_white().bold()
    );
    println!("   • Files skipped: {}", skipped);
    if failed > 0 {
        println!("   • Files failed: {}", failed.to_string().bright_red().bold());
    }
    println!("   • Processing time: {}", HumanDuration(elapsed));

    println!("\n📁 Files:");
    for result in results {
        let name = display_name(&result.file);
        match &result.outcome {
            FileOutcome::Processed { report } => {
                let stats = &report.statistics;
                println!(
                    "   • {} [{}]: {} of {} data lines retained ({:.2}%), {}",
                    name.bold(),
                    report.bank,
                    stats.retained_lines,
                    stats.total_lines,
                    stats.retention_rate(),
                    describe_export(&report.export)
                );
                println!(
                    "     {} file(s) written, {}",
                    report.written.len(),
                    format_size(report.report.total_artifact_size())
                );
                for failure in &report.failures {
                    println!("     {} {}", "⚠️ ".yellow(), failure);
                }
            }
            FileOutcome::Analyzed {
                bank,
                export_records,
                statistics,
                ..
            } => println!(
                "   • {} [{}]: {} of {} data lines would be retained, {} export record(s)",
                name.bold(),
                bank,
                statistics.retained_lines,
                statistics.total_lines,
                export_records
            ),
            FileOutcome::Skipped { reason } => {
                println!("   • {}: {} ({})", name, "skipped".yellow(), reason)
            }
            FileOutcome::Failed { reason } => {
                println!("   • {}: {} ({})", name, "failed".bright_red(), reason)
            }
        }
    }
    println!();
}

fn describe_export(status: &ExportStatus) -> String {
    match status {
        ExportStatus::Written { records } => format!("{} advance record(s) exported", records),
        ExportStatus::NoRecords => "no advance records".to_string(),
        ExportStatus::Failed { message } => format!("export failed: {}", message),
    }
}
