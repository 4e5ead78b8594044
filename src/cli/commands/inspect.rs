//! Inspect command implementation
//!
//! Loads one file, reports its encoding and detected bank, and runs the
//! pipeline in memory when the bank's settings allow it. Nothing is written.

use super::shared::{CommandOutcome, display_name, load_configuration, print_json, setup_logging};
use crate::app::services::file_runner::{FileAnalysis, FileRunner, LoadedFile};
use crate::app::services::report::{ExportStatus, ReportContext, aggregate, render_text};
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::constants::LEDGER_TIMESTAMP_FORMAT;
use anyhow::Context;
use chrono::Local;
use colored::*;

/// Inspect a single file
pub async fn run_inspect(args: InspectArgs) -> anyhow::Result<CommandOutcome> {
    setup_logging(&args.common)?;
    let config = load_configuration(&args.common)?;
    let runner = FileRunner::new(config);

    let loaded = runner
        .load(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let analysis = match runner.analyze_loaded(loaded.clone()) {
        Ok(analysis) => Ok(analysis),
        Err(e) if e.is_skip() => Err(e.to_string()),
        Err(e) => return Err(e).context("Pipeline failed"),
    };

    match args.common.output_format {
        OutputFormat::Human => print_human(&loaded, &analysis, args.preview),
        OutputFormat::Json => print_json(&json_view(&loaded, &analysis, args.preview))?,
    }

    Ok(CommandOutcome::default())
}

fn json_view(
    loaded: &LoadedFile,
    analysis: &Result<FileAnalysis, String>,
    preview: usize,
) -> serde_json::Value {
    let mut value = serde_json::json!({
        "file": loaded.path,
        "encoding": loaded.decoded.encoding,
        "line_ending": format!("{:?}", loaded.decoded.line_ending),
        "lines": loaded.decoded.lines.len(),
        "bank": loaded.bank,
    });

    match analysis {
        Ok(analysis) => {
            value["bank_config"] = serde_json::json!(analysis.bank_config);
            value["statistics"] = serde_json::json!(analysis.outcome.statistics);
            value["export_records"] = serde_json::json!(analysis.export_records.len());
            value["export_preview"] = serde_json::json!(
                analysis
                    .export_records
                    .iter()
                    .take(preview)
                    .collect::<Vec<_>>()
            );
        }
        Err(reason) => value["skipped"] = serde_json::json!(reason),
    }
    value
}

fn print_human(loaded: &LoadedFile, analysis: &Result<FileAnalysis, String>, preview: usize) {
    println!(
        "\n🔍 {}",
        display_name(&loaded.path).bright_green().bold()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Encoding: {}", loaded.decoded.encoding);
    println!("   • Lines: {}", loaded.decoded.lines.len());
    println!("   • Bank: {}", loaded.bank.to_string().bright_white().bold());

    let analysis = match analysis {
        Ok(analysis) => analysis,
        Err(reason) => {
            println!("   • {} {}", "Would be skipped:".yellow(), reason);
            println!();
            return;
        }
    };

    let export = if analysis.export_records.is_empty() {
        ExportStatus::NoRecords
    } else {
        ExportStatus::Written {
            records: analysis.export_records.len(),
        }
    };
    let context = ReportContext {
        source_file: loaded.file_name.clone(),
        bank: loaded.bank,
        allowed_operations: analysis
            .bank_config
            .allowed_operations
            .iter()
            .cloned()
            .collect(),
        split_enabled: analysis.outcome.split_enabled,
        encoding: loaded.decoded.encoding.to_string(),
        processed_at: Local::now().format(LEDGER_TIMESTAMP_FORMAT).to_string(),
    };
    let report = aggregate(&context, &analysis.outcome.statistics, &[], export);
    println!();
    print!("{}", render_text(&report));

    if !analysis.export_records.is_empty() && preview > 0 {
        println!("\n📄 Export preview:");
        for record in analysis.export_records.iter().take(preview) {
            println!(
                "   • {:<15} {:>14}  {}",
                record.document_id, record.amount, record.due_date
            );
        }
    }
    println!();
}
